use std::time::Duration;

use crate::config::llm_provider::LlmProvider;

/// Configuration for the completion model.
///
/// # Fields
///
/// - `provider`: Which backend to call.
/// - `model`: Model identifier (e.g. `"gemini-3-flash-preview"`).
/// - `endpoint`: API base URL, without the versioned path.
/// - `api_key`: Credential. `None` puts the service in configuration-error mode.
/// - `max_tokens`: Maximum number of tokens to generate (if supported).
/// - `temperature`: Sampling temperature.
/// - `top_p`: Nucleus sampling cutoff.
/// - `timeout_secs`: Whole-request timeout.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::Gemini,
///     model: "gemini-3-flash-preview".to_string(),
///     endpoint: "https://generativelanguage.googleapis.com".to_string(),
///     api_key: Some("AIza...".to_string()),
///     max_tokens: None,
///     temperature: None,
///     top_p: None,
///     timeout_secs: Some(60),
/// };
/// assert!(cfg.has_api_key());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Timeout applied when `timeout_secs` is unset.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(Self::DEFAULT_TIMEOUT_SECS))
    }

    /// True when a non-blank API key is present.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}
