//! Plagiarism Error Types
//!
//! Every failure in this crate is deterministic: the same inputs always produce the same
//! error, so callers should treat these as input or programming errors and not retry.

use thiserror::Error;

/// Represents all error types that can occur while building or querying a corpus.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessingError {
    /// A scoring call referenced a document the index does not hold.
    #[error("document index {index} is outside a corpus of {len} documents")]
    DocumentOutOfRange { index: usize, len: usize },
    /// A TF-IDF index was requested over zero documents.
    #[error("cannot build a tf-idf index over an empty corpus")]
    EmptyCorpus,
    /// The plagiarism threshold must lie in `[0, 1]`.
    #[error("similarity threshold {0} is outside [0, 1]")]
    InvalidThreshold(f64),
}
