//! Typed errors for document loading.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while turning a policy file into text.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The path did not exist when probed, before any open attempt.
    #[error("policy file not found at {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but could not be read or decoded.
    #[error("failed to load policy file {}: {source}", path.display())]
    LoadFailure {
        path: PathBuf,
        #[source]
        source: LoadCause,
    },
}

/// Underlying cause of an [`IngestError::LoadFailure`].
#[derive(Debug, Error)]
pub enum LoadCause {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// PDFium binding, open or page-text failure. PDFium errors are not
    /// `std::error::Error`, so they are carried as text.
    #[error("pdf error: {0}")]
    Pdf(String),
}

impl IngestError {
    pub(crate) fn load(path: impl Into<PathBuf>, source: impl Into<LoadCause>) -> Self {
        IngestError::LoadFailure {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Path the error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            IngestError::NotFound(p) => p,
            IngestError::LoadFailure { path, .. } => path,
        }
    }
}
