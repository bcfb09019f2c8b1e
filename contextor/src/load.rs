//! Startup (and reload) population of the [`ContextStore`].

use std::path::PathBuf;

use policy_ingest::{DocumentFormat, PolicyCandidates, load_document};
use tracing::{error, info, warn};

use crate::{error::ContextorError, store::ContextStore};

/// Result of one probe-and-load pass.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The first candidate found was loaded and swapped in.
    Loaded {
        path: PathBuf,
        format: DocumentFormat,
        chars: usize,
    },
    /// No candidate file exists; the store was left untouched.
    Missing,
    /// A candidate exists but could not be loaded; the store was left untouched.
    Failed(ContextorError),
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded { .. })
    }
}

/// Probes `candidates` and loads the first file found into `store`.
///
/// Loading runs on the blocking pool. The store changes only on success, in
/// one swap, so readers see either the previous text or the complete new
/// one. This never fails: problems are logged and reported in the outcome.
pub async fn load_policy_into(store: &ContextStore, candidates: &PolicyCandidates) -> LoadOutcome {
    let probe = candidates.clone();
    let loaded = tokio::task::spawn_blocking(move || {
        probe
            .locate()
            .map(|(path, format)| load_document(&path, format).map(|text| (path, format, text)))
    })
    .await;

    match loaded {
        Ok(Some(Ok((path, format, text)))) => {
            let chars = text.chars().count();
            store.replace(text);
            info!(path = %path.display(), %format, chars, "policy document loaded");
            LoadOutcome::Loaded {
                path,
                format,
                chars,
            }
        }
        Ok(None) => {
            warn!(
                data_dir = %candidates.data_dir().display(),
                stem = candidates.file_stem(),
                "no policy file found; answers will not be grounded until one is added"
            );
            LoadOutcome::Missing
        }
        Ok(Some(Err(err))) => {
            error!(path = %err.path().display(), error = %err, "failed to load policy");
            LoadOutcome::Failed(err.into())
        }
        Err(join) => {
            error!(error = %join, "policy load task failed");
            LoadOutcome::Failed(join.into())
        }
    }
}
