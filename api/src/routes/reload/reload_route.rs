use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use contextor::{LoadOutcome, load_policy_into};
use tracing::{info, instrument};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::reload::reload_response::ReloadResponse,
};

/// Re-probes the policy candidates and swaps the new text in.
///
/// On any failure the previously loaded text keeps serving.
#[instrument(name = "reload_route", skip_all)]
pub async fn reload_route(State(state): State<Arc<AppState>>) -> AppResult<Json<ReloadResponse>> {
    match load_policy_into(&state.store, &state.candidates).await {
        LoadOutcome::Loaded {
            path,
            format,
            chars,
        } => {
            info!(path = %path.display(), chars, "policy reloaded");
            Ok(Json(ReloadResponse {
                reloaded: true,
                path: path.display().to_string(),
                format: format.to_string(),
                context_chars: chars,
            }))
        }
        LoadOutcome::Missing => Err(AppError::Http {
            status: StatusCode::NOT_FOUND,
            code: "POLICY_NOT_FOUND",
            message: format!(
                "no {}.{{pdf,md,txt}} in {}",
                state.candidates.file_stem(),
                state.candidates.data_dir().display()
            ),
        }),
        LoadOutcome::Failed(err) => Err(err.into()),
    }
}
