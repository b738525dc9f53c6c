use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::app_state::AppState;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    store: String,
}

#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses(
        (status = 200, description = "Health check successful", body = HealthResponse),
        (status = 503, description = "Event store unavailable")
    )
)]
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, StatusCode> {
    match state.store.ping().await {
        Ok(()) => {
            debug!("Health check passed");
            Ok(Json(HealthResponse {
                status: "OK".to_string(),
                store: "healthy".to_string(),
            }))
        }
        Err(e) => {
            error!(error = %e, "Event store health check failed");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
