//! Format-specific policy loaders.
//!
//! The caller picks the format (usually through
//! [`PolicyCandidates::locate`](crate::PolicyCandidates::locate)); loaders
//! never sniff content. Every loader checks existence first so that a
//! missing file is always [`IngestError::NotFound`] rather than an I/O error.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Mutex,
};

use pdfium_render::prelude::{Pdfium, PdfiumLibraryBindings};
use tracing::{debug, info};

use crate::error::{IngestError, LoadCause};

/// Supported policy document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Pdf,
    Markdown,
    PlainText,
}

impl DocumentFormat {
    /// Probe order used when several files could be present.
    pub const PRIORITY: [DocumentFormat; 3] = [
        DocumentFormat::Pdf,
        DocumentFormat::Markdown,
        DocumentFormat::PlainText,
    ];

    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Markdown => "md",
            DocumentFormat::PlainText => "txt",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Loads a document with the loader matching `format`.
///
/// Markdown is read as plain text; no markup is stripped.
///
/// # Errors
/// [`IngestError::NotFound`] when `path` does not exist,
/// [`IngestError::LoadFailure`] for read/decode problems.
pub fn load_document(path: &Path, format: DocumentFormat) -> Result<String, IngestError> {
    match format {
        DocumentFormat::Pdf => load_pdf_text(path),
        DocumentFormat::Markdown | DocumentFormat::PlainText => load_txt_text(path),
    }
}

/// Extracts the text of every page, each followed by a newline.
///
/// PDFium is bound on first use: from `PDFIUM_DYNAMIC_LIB_PATH` when set
/// (either the library file or its directory), otherwise from the system
/// library search path.
pub fn load_pdf_text(path: &Path) -> Result<String, IngestError> {
    ensure_exists(path)?;

    with_pdfium(|pdfium| {
        let document = pdfium.load_pdf_from_file(path, None).map_err(|e| {
            IngestError::load(path, LoadCause::Pdf(format!("open failed: {e}")))
        })?;

        let pages = document
            .pages()
            .iter()
            .enumerate()
            .map(|(i, page)| {
                page.text().map(|t| t.all()).map_err(|e| {
                    IngestError::load(path, LoadCause::Pdf(format!("page {i}: {e}")))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let page_count = pages.len();
        let text = join_pages(pages);

        debug!(path = %path.display(), pages = page_count, chars = text.chars().count(), "pdf text extracted");
        Ok(text)
    })
    .map_err(|e| match e {
        PdfiumAccess::Bind(cause) => IngestError::load(path, cause),
        PdfiumAccess::Load(err) => err,
    })
}

/// Concatenates page texts, each followed by `\n`. No pages gives `""`.
fn join_pages(pages: impl IntoIterator<Item = String>) -> String {
    pages.into_iter().fold(String::new(), |mut text, page| {
        text.push_str(&page);
        text.push('\n');
        text
    })
}

/// Reads the whole file as UTF-8.
pub fn load_txt_text(path: &Path) -> Result<String, IngestError> {
    ensure_exists(path)?;

    let bytes = std::fs::read(path).map_err(|e| IngestError::load(path, e))?;
    let text = String::from_utf8(bytes).map_err(|e| IngestError::load(path, e))?;

    debug!(path = %path.display(), bytes = text.len(), "text file read");
    Ok(text)
}

fn ensure_exists(path: &Path) -> Result<(), IngestError> {
    match path.try_exists() {
        Ok(true) => Ok(()),
        Ok(false) => Err(IngestError::NotFound(path.to_path_buf())),
        Err(e) => Err(IngestError::load(path, e)),
    }
}

enum PdfiumAccess {
    Bind(LoadCause),
    Load(IngestError),
}

/// Runs `f` against the process-wide PDFium handle.
///
/// PDFium refuses to be bound twice and is not reentrant, so the first
/// successful bind is kept for the process lifetime and all extraction is
/// serialized behind one lock.
fn with_pdfium<R>(
    f: impl FnOnce(&Pdfium) -> Result<R, IngestError>,
) -> Result<R, PdfiumAccess> {
    static PDFIUM: Mutex<Option<Pdfium>> = Mutex::new(None);

    let mut slot = PDFIUM
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    if slot.is_none() {
        *slot = Some(Pdfium::new(bind_pdfium().map_err(PdfiumAccess::Bind)?));
    }

    match slot.as_ref() {
        Some(pdfium) => f(pdfium).map_err(PdfiumAccess::Load),
        None => Err(PdfiumAccess::Bind(LoadCause::Pdf(
            "PDFium handle unavailable".into(),
        ))),
    }
}

fn bind_pdfium() -> Result<Box<dyn PdfiumLibraryBindings>, LoadCause> {
    match std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        Ok(raw) if !raw.trim().is_empty() => {
            let lib = PathBuf::from(raw.trim());
            let lib = if lib.is_dir() {
                Pdfium::pdfium_platform_library_name_at_path(&lib)
            } else {
                lib
            };
            info!(library = %lib.display(), "binding PDFium");
            Pdfium::bind_to_library(&lib)
        }
        _ => {
            info!("binding PDFium from system library path");
            Pdfium::bind_to_system_library()
        }
    }
    .map_err(|e| LoadCause::Pdf(format!("failed to bind PDFium: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn txt_loader_returns_exact_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.txt");
        let body = "Section 1\n\n  indented line\r\nüñí ✓ trailing   \n";
        std::fs::File::create(&path)
            .unwrap()
            .write_all(body.as_bytes())
            .unwrap();

        assert_eq!(load_txt_text(&path).unwrap(), body);
        assert_eq!(
            load_document(&path, DocumentFormat::PlainText).unwrap(),
            body
        );
    }

    #[test]
    fn markdown_is_read_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.md");
        std::fs::write(&path, "# Travel\n\n**Approval** required.").unwrap();

        let text = load_document(&path, DocumentFormat::Markdown).unwrap();
        assert_eq!(text, "# Travel\n\n**Approval** required.");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");

        match load_txt_text(&path) {
            Err(IngestError::NotFound(p)) => assert_eq!(p, path),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn missing_pdf_is_not_found_without_binding_pdfium() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.pdf");

        assert!(matches!(
            load_pdf_text(&path),
            Err(IngestError::NotFound(_))
        ));
    }

    #[test]
    fn invalid_utf8_is_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.txt");
        std::fs::write(&path, [0x66, 0x6f, 0xff, 0xfe]).unwrap();

        let err = load_txt_text(&path).unwrap_err();
        assert!(matches!(
            err,
            IngestError::LoadFailure {
                source: LoadCause::Utf8(_),
                ..
            }
        ));
        assert_eq!(err.path(), path.as_path());
    }

    #[test]
    fn pages_are_each_followed_by_newline() {
        let text = join_pages(["a".to_string(), "b".to_string()]);
        assert_eq!(text, "a\nb\n");

        let with_blank = join_pages(["Page 1".to_string(), String::new(), "Page 3\n".to_string()]);
        assert_eq!(with_blank, "Page 1\n\nPage 3\n\n");
    }

    #[test]
    fn shared_pdfium_handle_can_live_in_a_static() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Mutex<Option<Pdfium>>>();
    }

    #[test]
    fn no_pages_yield_empty_text() {
        assert_eq!(join_pages(Vec::<String>::new()), "");
    }
}
