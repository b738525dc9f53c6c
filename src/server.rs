use axum::{Json, Router, http::HeaderName, routing::get};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::OpenApi;

use tracing::warn;

use crate::{app_state::AppState, entities::EventRecord, health, items};

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(OpenApi)]
#[openapi(
    info(title = "quake-ingest", description = "Earthquake events extracted from news coverage"),
    paths(items::handlers::list_items, health::health_check),
    components(schemas(EventRecord, health::HealthResponse)),
    tags(
        (name = "items", description = "Stored events"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

/// Read API router. Unknown paths fall back to files under `static_dir`.
pub fn router(state: AppState, static_dir: &str) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/items", get(items::handlers::list_items))
        .route("/healthz", get(health::health_check))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}

/// Serve `app` until `shutdown` fires.
///
/// The token is cancelled whenever the returned future finishes or is dropped,
/// so an early server exit also stops the ingest loop.
pub fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: CancellationToken,
) -> impl Future<Output = std::io::Result<()>> + Send + 'static {
    let stop_ingest = shutdown.clone().drop_guard();
    async move {
        let _stop_ingest = stop_ingest;
        let signal = shutdown.clone();
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move { signal.cancelled().await })
            .await;
        if !shutdown.is_cancelled() {
            warn!("Read API stopped before shutdown was requested");
        }
        result
    }
}
