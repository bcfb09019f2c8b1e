//! Provider-agnostic completion seam.
//!
//! The answer generator depends only on [`CompletionService`]; concrete HTTP
//! clients live in [`crate::services`]. Build one instance at startup,
//! wrap it in `Arc`, and share it across requests.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    services::{gemini_service::GeminiService, open_ai_service::OpenAiService},
};

/// One prompt in, one text completion out. Non-streaming.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Sends `prompt` as a single user turn and returns the model's text.
    async fn complete(&self, prompt: &str) -> Result<String, AiLlmError>;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;
}

/// Builds the client selected by `cfg.provider`.
///
/// Returns `Ok(None)` when no API key is configured; callers answer with a
/// configuration error instead of contacting the network.
///
/// # Errors
/// Propagates client construction failures (invalid endpoint, header value,
/// TLS backend initialisation).
pub fn build_completion_service(
    cfg: &LlmModelConfig,
) -> Result<Option<Arc<dyn CompletionService>>, AiLlmError> {
    if !cfg.has_api_key() {
        warn!(
            provider = %cfg.provider,
            key_var = cfg.provider.api_key_var(),
            "API key not configured; chat requests will return a configuration error"
        );
        return Ok(None);
    }

    let svc: Arc<dyn CompletionService> = match cfg.provider {
        LlmProvider::Gemini => Arc::new(GeminiService::new(cfg.clone())?),
        LlmProvider::OpenAI => Arc::new(OpenAiService::new(cfg.clone())?),
    };

    info!(provider = %cfg.provider, model = svc.model(), "completion service ready");
    Ok(Some(svc))
}
