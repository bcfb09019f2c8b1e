use std::sync::Arc;

use ai_llm_service::{LlmModelConfig, build_completion_service};
use contextor::{AnswerGenerator, ContextStore, ContextorConfig, load_policy_into};
use policy_ingest::PolicyCandidates;
use tracing::info;

use crate::error_handler::AppResult;

/// Listener settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind address, e.g. `0.0.0.0:8000`.
    pub address: String,
    /// Mount `POST /admin/reload`.
    pub reload_enabled: bool,
}

impl ServerConfig {
    /// Reads `API_ADDRESS` (default `0.0.0.0:8000`) and
    /// `POLICY_RELOAD_ENABLED` (default `false`).
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            address: lookup("API_ADDRESS")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "0.0.0.0:8000".into()),
            reload_enabled: lookup("POLICY_RELOAD_ENABLED")
                .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")),
        }
    }
}

/// Shared state for all HTTP handlers.
///
/// Everything is built before the listener opens; handlers only read.
pub struct AppState {
    /// Resident policy text.
    pub store: Arc<ContextStore>,
    /// Prompt assembly + completion client.
    pub generator: Arc<AnswerGenerator>,
    /// Files probed on startup and on reload.
    pub candidates: PolicyCandidates,
}

impl AppState {
    pub fn new(
        store: Arc<ContextStore>,
        generator: Arc<AnswerGenerator>,
        candidates: PolicyCandidates,
    ) -> Self {
        Self {
            store,
            generator,
            candidates,
        }
    }

    /// Builds the completion client and performs the startup document load.
    ///
    /// A missing API key or policy file does not fail startup; both degrade
    /// at request time.
    ///
    /// # Errors
    /// Completion client construction failures.
    pub async fn bootstrap(ctx: &ContextorConfig, llm: &LlmModelConfig) -> AppResult<Self> {
        let completion = build_completion_service(llm)?;
        let generator = Arc::new(AnswerGenerator::new(completion, ctx.prompt_template()));

        let store = Arc::new(ContextStore::empty());
        let candidates = ctx.candidates();
        let outcome = load_policy_into(&store, &candidates).await;

        info!(
            context_loaded = outcome.is_loaded(),
            completion_configured = generator.is_configured(),
            organization = ctx.organization.as_str(),
            "application state ready"
        );

        Ok(Self::new(store, generator, candidates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_defaults_and_flags() {
        let cfg = ServerConfig::from_lookup(|_| None);
        assert_eq!(cfg.address, "0.0.0.0:8000");
        assert!(!cfg.reload_enabled);

        let cfg = ServerConfig::from_lookup(|k| match k {
            "API_ADDRESS" => Some("127.0.0.1:9000".into()),
            "POLICY_RELOAD_ENABLED" => Some("TRUE".into()),
            _ => None,
        });
        assert_eq!(cfg.address, "127.0.0.1:9000");
        assert!(cfg.reload_enabled);
    }
}
