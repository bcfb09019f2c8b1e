use serde::Serialize;

/// Response body returned after a successful policy reload.
#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub reloaded: bool,
    /// File that was loaded.
    pub path: String,
    /// `pdf`, `md` or `txt`.
    pub format: String,
    /// Size of the new context in characters.
    pub context_chars: usize,
}
