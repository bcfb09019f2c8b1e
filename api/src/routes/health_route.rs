use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub context_loaded: bool,
}

/// Liveness probe. Also reports whether any policy text is resident.
pub async fn health_route(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        context_loaded: state.store.is_loaded(),
    })
}
