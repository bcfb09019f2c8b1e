//! Policy document ingestion.
//!
//! Turns a single policy file on disk into one text blob that can be used as
//! model context. Three pieces:
//!
//! - [`loader`]: format-specific readers (PDF via PDFium, UTF-8 text for
//!   markdown and `.txt`), all returning [`IngestError`] on failure.
//! - [`candidates`]: the ordered list of file names probed in the data
//!   directory (`.pdf`, then `.md`, then `.txt`).
//! - [`chunker`]: a lazy fixed-width character splitter. It is not used on
//!   the request path; callers that need bounded contexts invoke it directly.

pub mod candidates;
pub mod chunker;
pub mod error;
pub mod loader;

pub use candidates::PolicyCandidates;
pub use chunker::{DEFAULT_CHUNK_SIZE, TextChunks, chunk_text, chunk_text_default};
pub use error::{IngestError, LoadCause};
pub use loader::{DocumentFormat, load_document, load_pdf_text, load_txt_text};
