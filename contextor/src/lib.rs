//! Single-document context and answer generation.
//!
//! The whole policy text is the context for every question: no retrieval,
//! no ranking. This crate owns
//!
//! - [`ContextStore`]: the resident document, swapped atomically on reload;
//! - [`load_policy_into`]: probe the data directory and fill the store;
//! - [`PromptTemplate`]: the fixed instruction block around context + question;
//! - [`AnswerGenerator`]: one completion call per question, failures mapped
//!   to in-band answers.

mod cfg;
mod error;
mod generator;
mod load;
mod prompt;
mod store;

pub use cfg::ContextorConfig;
pub use error::ContextorError;
pub use generator::{
    Answer, AnswerGenerator, AnswerStatus, CONFIG_ERROR_ANSWER, GENERATION_ERROR_PREFIX,
};
pub use load::{LoadOutcome, load_policy_into};
pub use prompt::{DEFAULT_ORGANIZATION, NOT_FOUND_REPLY, PromptTemplate};
pub use store::ContextStore;
