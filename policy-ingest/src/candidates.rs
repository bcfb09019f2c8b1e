//! Candidate policy file locations.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::loader::DocumentFormat;

/// The files probed in `data_dir`: `<stem>.pdf`, `<stem>.md`, `<stem>.txt`,
/// in that order. Only the first one found is ever loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyCandidates {
    data_dir: PathBuf,
    file_stem: String,
}

impl PolicyCandidates {
    pub fn new(data_dir: impl Into<PathBuf>, file_stem: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            file_stem: file_stem.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn file_stem(&self) -> &str {
        &self.file_stem
    }

    /// All candidate paths in priority order.
    pub fn paths(&self) -> Vec<(PathBuf, DocumentFormat)> {
        DocumentFormat::PRIORITY
            .into_iter()
            .map(|format| {
                let name = format!("{}.{}", self.file_stem, format.extension());
                (self.data_dir.join(name), format)
            })
            .collect()
    }

    /// First candidate that exists on disk, if any.
    pub fn locate(&self) -> Option<(PathBuf, DocumentFormat)> {
        self.paths().into_iter().find(|(path, format)| {
            let found = path.is_file();
            debug!(path = %path.display(), %format, found, "probing policy candidate");
            found
        })
    }
}
