//! Marker Error Types
//!
//! This module defines the [`MarkerError`] enum, which covers every way automated grading
//! can fail. Transient failures of the external model endpoint are distinguished from
//! precondition violations so callers can decide what is worth retrying.
//!
//! # Example
//!
//! ```rust
//! use marker::error::MarkerError;
//!
//! fn first_solution(solutions: &[String]) -> Result<&String, MarkerError> {
//!     solutions.first().ok_or(MarkerError::NoModelSolution)
//! }
//!
//! assert!(first_solution(&[]).is_err());
//! ```

use std::time::Duration;
use thiserror::Error;

/// Represents all error types that can occur in the marker system.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarkerError {
    /// The model endpoint could not be reached or answered with an error status.
    #[error("language model unavailable: {0}")]
    LlmUnavailable(String),
    /// A single model call took longer than the configured timeout.
    #[error("language model call timed out after {0:?}")]
    LlmTimeout(Duration),
    /// The endpoint answered, but not with the expected JSON body.
    #[error("language model returned an invalid response: {0}")]
    InvalidResponse(String),
    /// Grading was requested for an exercise without model solutions.
    #[error("no model solution available for this exercise")]
    NoModelSolution,
}

impl MarkerError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MarkerError::LlmUnavailable(_)
                | MarkerError::LlmTimeout(_)
                | MarkerError::InvalidResponse(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(MarkerError::LlmUnavailable("connection refused".into()).is_retryable());
        assert!(MarkerError::LlmTimeout(Duration::from_secs(30)).is_retryable());
        assert!(MarkerError::InvalidResponse("missing field".into()).is_retryable());
        assert!(!MarkerError::NoModelSolution.is_retryable());
    }
}
