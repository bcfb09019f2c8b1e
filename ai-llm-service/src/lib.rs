//! Hosted LLM completion clients behind one trait.
//!
//! - [`completion::CompletionService`]: the seam used by answer generation.
//! - [`services`]: Gemini and OpenAI-compatible HTTP clients.
//! - [`config`]: model/provider configuration, read from the environment.
//! - [`error_handler`]: unified [`AiLlmError`](error_handler::AiLlmError).

pub mod completion;
pub mod error_handler;

pub mod config {
    pub mod default_config;
    pub mod llm_model_config;
    pub mod llm_provider;
}

pub mod services {
    pub mod gemini_service;
    pub mod open_ai_service;
}

pub use completion::{CompletionService, build_completion_service};
pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::AiLlmError;
