//! Unified error handling for `ai-llm-service`.
//!
//! This module exposes a single top-level error type [`AiLlmError`] for the whole
//! library, and groups domain-specific errors in nested types ([`ConfigError`],
//! [`ProviderError`]). Small helpers for reading/validating configuration values
//! are provided and return the unified [`Result<T>`] alias.
//!
//! All messages include the suffix `[AI LLM Service]` to simplify attribution in logs.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::llm_provider::LlmProvider;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiLlmError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `ai-llm-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    /// Configuration/validation errors (startup).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Provider-side failures: bad status, undecodable payload, empty answer.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Underlying HTTP transport error (connect, TLS, body read).
    #[error("[AI LLM Service] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),

    /// Request exceeded the configured timeout.
    #[error("[AI LLM Service] operation timed out after {0:?}")]
    Timeout(Duration),
}

impl AiLlmError {
    /// Maps a `reqwest` error, singling out client timeouts.
    pub fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            AiLlmError::Timeout(timeout)
        } else {
            AiLlmError::HttpTransport(err)
        }
    }
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Errors raised while building an [`LlmModelConfig`](crate::config::llm_model_config::LlmModelConfig).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A number failed to parse (timeouts, token limits, temperature).
    #[error("[AI LLM Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },

    /// Unsupported provider in `LLM_PROVIDER`.
    #[error("[AI LLM Service] unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[AI LLM Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        var: &'static str,
        reason: &'static str,
    },

    /// A numeric field was outside of the allowed range.
    #[error("[AI LLM Service] {field} is out of range: {detail}")]
    OutOfRange {
        field: &'static str,
        detail: &'static str,
    },

    /// Model name was empty.
    #[error("[AI LLM Service] model name must not be empty")]
    EmptyModel,
}

/* ------------------------------------------------------------------------- */
/* Provider errors                                                           */
/* ------------------------------------------------------------------------- */

/// Non-success HTTP response captured with a short body excerpt.
#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub url: String,
    pub snippet: String,
}

/// What went wrong talking to a provider.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderErrorKind {
    #[error("config is for a different provider")]
    InvalidProvider,

    #[error("API key is missing")]
    MissingApiKey,

    /// The key cannot be sent as a header value (control characters etc.).
    #[error("API key is not a valid header value: {0}")]
    InvalidApiKey(String),

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("HTTP {} from {}: {}", .0.status, .0.url, .0.snippet)]
    HttpStatus(HttpError),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("response contained no candidates")]
    EmptyCandidates,

    /// Gemini rejected the prompt itself (`promptFeedback.blockReason`).
    #[error("prompt blocked: {0}")]
    Blocked(String),
}

/// Provider-tagged failure.
#[derive(Debug, Error)]
#[error("[AI LLM Service] {provider:?}: {kind}")]
pub struct ProviderError {
    pub provider: LlmProvider,
    pub kind: ProviderErrorKind,
}

impl ProviderError {
    pub fn new(provider: LlmProvider, kind: ProviderErrorKind) -> Self {
        Self { provider, kind }
    }
}

/// Compacts a response body to a single-line excerpt of at most 300 chars.
pub fn make_snippet(body: &str) -> String {
    const MAX: usize = 300;
    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= MAX {
        flat
    } else {
        let mut s: String = flat.chars().take(MAX).collect();
        s.push('…');
        s
    }
}

/* ------------------------------------------------------------------------- */
/* Lookup helpers (return unified `Result<T>`)                               */
/* ------------------------------------------------------------------------- */

/// Reads an optional, non-empty value (`None` if unset or blank).
pub fn opt_var(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).filter(|v| !v.trim().is_empty())
}

/// Parses an optional `u32` (`Ok(None)` if unset/empty).
///
/// # Errors
/// [`ConfigError::InvalidNumber`] if set but not a valid `u32`.
pub fn opt_u32(lookup: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<Option<u32>> {
    opt_var(lookup, name)
        .map(|v| {
            v.trim().parse::<u32>().map_err(|_| {
                AiLlmError::from(ConfigError::InvalidNumber {
                    var: name,
                    reason: "expected u32",
                })
            })
        })
        .transpose()
}

/// Parses an optional `u64` (`Ok(None)` if unset/empty).
pub fn opt_u64(lookup: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<Option<u64>> {
    opt_var(lookup, name)
        .map(|v| {
            v.trim().parse::<u64>().map_err(|_| {
                AiLlmError::from(ConfigError::InvalidNumber {
                    var: name,
                    reason: "expected u64",
                })
            })
        })
        .transpose()
}

/// Parses an optional `f32` (`Ok(None)` if unset/empty).
pub fn opt_f32(lookup: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<Option<f32>> {
    opt_var(lookup, name)
        .map(|v| {
            v.trim().parse::<f32>().map_err(|_| {
                AiLlmError::from(ConfigError::InvalidNumber {
                    var: name,
                    reason: "expected a decimal number",
                })
            })
        })
        .transpose()
}

/* ------------------------------------------------------------------------- */
/* Validation helpers                                                        */
/* ------------------------------------------------------------------------- */

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

/// Validates that a floating-point value lies within an inclusive range.
pub fn validate_range_f32(field: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            detail: "expected value in inclusive range",
        }
        .into())
    }
}
