//! LLM config loaded from environment variables.
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_PROVIDER`     = `gemini` (default) or `openai`
//! - `LLM_TIMEOUT_SECS` = request timeout, default 60
//! - `LLM_MAX_TOKENS`   = optional output token cap (u32)
//! - `LLM_TEMPERATURE`  = optional, `0.0..=2.0`
//! - `LLM_TOP_P`        = optional, `0.0..=1.0`
//!
//! Gemini:
//! - `GEMINI_API_KEY`  = credential (absent → configuration-error answers)
//! - `GEMINI_MODEL`    = default `gemini-3-flash-preview`
//! - `GEMINI_ENDPOINT` = default `https://generativelanguage.googleapis.com`
//!
//! OpenAI:
//! - `OPENAI_API_KEY`, `OPENAI_MODEL` (default `gpt-4o-mini`),
//!   `OPENAI_ENDPOINT` (default `https://api.openai.com`)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        ConfigError, Result, opt_f32, opt_u32, opt_u64, opt_var, validate_http_endpoint,
        validate_range_f32,
    },
};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com";

/// Builds the completion config from the process environment.
///
/// A missing API key is **not** an error: the returned config has
/// `api_key: None` and callers decide how to degrade.
///
/// # Errors
/// [`ConfigError`] for an unknown provider, malformed numbers, an
/// out-of-range temperature or top_p, or an endpoint without an http(s) scheme.
pub fn config_from_env() -> Result<LlmModelConfig> {
    config_from_lookup(|k| std::env::var(k).ok())
}

/// Same as [`config_from_env`], reading values through `lookup`.
pub fn config_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<LlmModelConfig> {
    let provider = match opt_var(&lookup, "LLM_PROVIDER") {
        Some(raw) => raw.parse::<LlmProvider>()?,
        None => LlmProvider::default(),
    };

    let (model_var, endpoint_var, default_model, default_endpoint) = match provider {
        LlmProvider::Gemini => (
            "GEMINI_MODEL",
            "GEMINI_ENDPOINT",
            DEFAULT_GEMINI_MODEL,
            DEFAULT_GEMINI_ENDPOINT,
        ),
        LlmProvider::OpenAI => (
            "OPENAI_MODEL",
            "OPENAI_ENDPOINT",
            DEFAULT_OPENAI_MODEL,
            DEFAULT_OPENAI_ENDPOINT,
        ),
    };

    let model = opt_var(&lookup, model_var).unwrap_or_else(|| default_model.to_string());
    if model.trim().is_empty() {
        return Err(ConfigError::EmptyModel.into());
    }

    let endpoint = opt_var(&lookup, endpoint_var).unwrap_or_else(|| default_endpoint.to_string());
    validate_http_endpoint(endpoint_var, endpoint.trim())?;

    let temperature = opt_f32(&lookup, "LLM_TEMPERATURE")?;
    if let Some(t) = temperature {
        validate_range_f32("temperature", t, 0.0, 2.0)?;
    }

    let top_p = opt_f32(&lookup, "LLM_TOP_P")?;
    if let Some(p) = top_p {
        validate_range_f32("top_p", p, 0.0, 1.0)?;
    }

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint: endpoint.trim().to_string(),
        api_key: opt_var(&lookup, provider.api_key_var()).map(|k| k.trim().to_string()),
        max_tokens: opt_u32(&lookup, "LLM_MAX_TOKENS")?,
        temperature,
        top_p,
        timeout_secs: Some(
            opt_u64(&lookup, "LLM_TIMEOUT_SECS")?.unwrap_or(LlmModelConfig::DEFAULT_TIMEOUT_SECS),
        ),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error_handler::AiLlmError;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_to_gemini_without_key() {
        let cfg = config_from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.provider, LlmProvider::Gemini);
        assert_eq!(cfg.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(cfg.endpoint, DEFAULT_GEMINI_ENDPOINT);
        assert_eq!(cfg.timeout_secs, Some(60));
        assert!(!cfg.has_api_key());
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let cfg = config_from_lookup(lookup(&[("GEMINI_API_KEY", "   ")])).unwrap();
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn openai_reads_its_own_variables() {
        let cfg = config_from_lookup(lookup(&[
            ("LLM_PROVIDER", "openai"),
            ("OPENAI_API_KEY", "sk-test"),
            ("GEMINI_API_KEY", "ignored"),
            ("OPENAI_ENDPOINT", "http://localhost:9000"),
            ("LLM_TIMEOUT_SECS", "15"),
            ("LLM_MAX_TOKENS", "512"),
            ("LLM_TOP_P", "0.9"),
        ]))
        .unwrap();

        assert_eq!(cfg.provider, LlmProvider::OpenAI);
        assert_eq!(cfg.api_key.as_deref(), Some("sk-test"));
        assert_eq!(cfg.model, DEFAULT_OPENAI_MODEL);
        assert_eq!(cfg.endpoint, "http://localhost:9000");
        assert_eq!(cfg.timeout_secs, Some(15));
        assert_eq!(cfg.max_tokens, Some(512));
        assert_eq!(cfg.top_p, Some(0.9));
    }

    #[test]
    fn rejects_bad_values() {
        let bad_endpoint = config_from_lookup(lookup(&[("GEMINI_ENDPOINT", "ftp://x")]));
        assert!(matches!(
            bad_endpoint,
            Err(AiLlmError::Config(ConfigError::InvalidFormat { .. }))
        ));

        let bad_temp = config_from_lookup(lookup(&[("LLM_TEMPERATURE", "3.5")]));
        assert!(matches!(
            bad_temp,
            Err(AiLlmError::Config(ConfigError::OutOfRange { .. }))
        ));

        let bad_provider = config_from_lookup(lookup(&[("LLM_PROVIDER", "ollama")]));
        assert!(matches!(
            bad_provider,
            Err(AiLlmError::Config(ConfigError::UnsupportedProvider(_)))
        ));

        let bad_top_p = config_from_lookup(lookup(&[("LLM_TOP_P", "1.5")]));
        assert!(matches!(
            bad_top_p,
            Err(AiLlmError::Config(ConfigError::OutOfRange { .. }))
        ));

        let bad_timeout = config_from_lookup(lookup(&[("LLM_TIMEOUT_SECS", "soon")]));
        assert!(bad_timeout.is_err());
    }
}
