use axum::{Json, extract::State};

use crate::{app_state::AppState, entities::EventRecord};

/// All stored events, most recently updated first.
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    responses(
        (status = 200, description = "Stored earthquake events", body = [EventRecord])
    )
)]
pub async fn list_items(State(state): State<AppState>) -> Json<Vec<EventRecord>> {
    Json(state.snapshot.load().as_ref().clone())
}
