//! # Plagiarism Library
//!
//! Deterministic overlap detection between a student submission and a corpus of other
//! submissions. Everything in this crate is a pure function of its inputs: no I/O, no
//! caching across calls, no shared mutable state.
//!
//! ## Key Concepts
//! - **Tokenizer**: turns raw text into a normalized [`tokenizer::TokenSet`].
//! - **Similarity**: Jaccard overlap between token sets and TF-IDF scoring over a corpus.
//! - **PlagiarismDetector**: runs both measures for one submission against many others and
//!   flags pairs above the configured threshold.
//! - **CodeStructureAnalyzer**: structural metrics used as an auxiliary signal only.

pub mod detector;
pub mod error;
pub mod similarity;
pub mod structure;
pub mod tokenizer;

pub use detector::{
    CorpusDocument, DetectionReport, DetectorConfig, PlagiarismDetector, SimilarityResult,
};
pub use error::ProcessingError;
pub use structure::{CodeStructureAnalyzer, StructureMetrics};
pub use tokenizer::{TokenSet, Tokenizer};
