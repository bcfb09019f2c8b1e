//! Typed error for the contextor crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextorError {
    /// Document probing/loading failed.
    #[error("ingest error: {0}")]
    Ingest(#[from] policy_ingest::IngestError),

    /// The blocking load task panicked or was cancelled.
    #[error("background load task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
