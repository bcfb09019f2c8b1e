use std::sync::Arc;

use axum::extract::{Json, State, rejection::JsonRejection};
use tracing::{debug, instrument};

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::chat::chat_request::{ChatRequest, ChatResponse},
};

/// HTTP endpoint answering one question from the loaded policy text.
///
/// The context is snapshotted once per request, so a concurrent reload never
/// mixes two documents into one prompt. Generation failures still produce a
/// 200 with the failure described in `answer`; only malformed bodies are
/// rejected with a 4xx.
#[instrument(name = "chat_route", skip_all)]
pub async fn chat_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let Json(body) = payload?;

    let context = state.store.snapshot();
    debug!(
        query_len = body.query.len(),
        context_bytes = context.len(),
        "chat request accepted"
    );

    let answer = state.generator.generate(&body.query, &context).await;
    Ok(Json(answer.into()))
}
