use std::{fmt, str::FromStr};

use crate::error_handler::ConfigError;

/// Hosted completion backend.
///
/// Selected by `LLM_PROVIDER` (`gemini` or `openai`, case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LlmProvider {
    /// Google Gemini `generateContent` API.
    #[default]
    Gemini,
    /// OpenAI-compatible `/v1/chat/completions` API.
    OpenAI,
}

impl LlmProvider {
    /// Environment variable holding this provider's API key.
    pub fn api_key_var(self) -> &'static str {
        match self {
            LlmProvider::Gemini => "GEMINI_API_KEY",
            LlmProvider::OpenAI => "OPENAI_API_KEY",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(LlmProvider::Gemini),
            "openai" | "chatgpt" => Ok(LlmProvider::OpenAI),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::Gemini => f.write_str("gemini"),
            LlmProvider::OpenAI => f.write_str("openai"),
        }
    }
}
