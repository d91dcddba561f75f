//! # Marker Library
//!
//! This crate grades a student submission by comparing it with the instructor's model
//! solutions through an external generative model, then turns the model's free-text
//! answers into a structured grade and feedback.
//!
//! ## Key Concepts
//! - **LlmClient**: one request/response call to the model endpoint, with a per-call
//!   timeout and an injectable retry policy, plus task helpers (SQL analysis, solution
//!   comparison, feedback).
//! - **GradeParser**: extracts a grade out of 20 from a comparison answer, preferring a
//!   strict JSON object and falling back to the `Note sur 20: <n>` line.
//! - **AutoGrader**: fans out one comparison per model solution, averages the grades and
//!   requests feedback.
//! - **GradeReport**: the final grade, feedback and per-comparison extraction status.

pub mod error;
pub mod grader;
pub mod llm;
pub mod parsers;
pub mod report;
pub mod scorer;
pub mod types;

pub use error::MarkerError;
pub use grader::AutoGrader;
pub use llm::{GenerateOptions, LanguageModel, LlmClient, OllamaModel, RetryPolicy};
pub use report::GradeReport;

/// Round a float to two decimal places in an efficient manner.
///
/// Uses the common multiply / round / divide trick.
#[inline]
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
