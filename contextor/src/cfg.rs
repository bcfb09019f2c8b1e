//! Runtime configuration loaded from environment variables.

use std::path::PathBuf;

use policy_ingest::PolicyCandidates;

use crate::prompt::{DEFAULT_ORGANIZATION, PromptTemplate};

/// Where the policy lives and whom the assistant speaks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextorConfig {
    pub data_dir: PathBuf,
    pub file_stem: String,
    pub organization: String,
}

impl Default for ContextorConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ContextorConfig {
    /// Build from environment variables with defaults.
    ///
    /// - `POLICY_DATA_DIR`  (default `data`)
    /// - `POLICY_FILE_STEM` (default `rutgers_policy`)
    /// - `POLICY_ORG_NAME`  (default: Rutgers UFA)
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading values through `lookup`.
    ///
    /// # Example
    /// ```
    /// # use contextor::ContextorConfig;
    /// let cfg = ContextorConfig::from_lookup(|k| (k == "POLICY_FILE_STEM").then(|| "handbook".into()));
    /// assert_eq!(cfg.file_stem, "handbook");
    /// assert_eq!(cfg.data_dir, std::path::PathBuf::from("data"));
    /// ```
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let env = |k: &str, dflt: &str| {
            lookup(k)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| dflt.to_string())
        };

        Self {
            data_dir: PathBuf::from(env("POLICY_DATA_DIR", "data")),
            file_stem: env("POLICY_FILE_STEM", "rutgers_policy"),
            organization: env("POLICY_ORG_NAME", DEFAULT_ORGANIZATION),
        }
    }

    pub fn candidates(&self) -> PolicyCandidates {
        PolicyCandidates::new(&self.data_dir, &self.file_stem)
    }

    pub fn prompt_template(&self) -> PromptTemplate {
        PromptTemplate::new(&self.organization)
    }
}
