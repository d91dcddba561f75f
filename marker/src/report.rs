//! # Grade Report Module
//!
//! Defines [`GradeReport`], the final output of auto-grading. Ownership passes to the
//! caller as soon as it is returned; the marker keeps nothing.
//!
//! ## JSON Output Example
//!
//! ```json
//! {
//!   "grade": 16.0,
//!   "feedback": "Your join is correct, but ...",
//!   "comparisons": [
//!     { "status": "parsed", "grade": 14.0, "source": "json", "rationale": "..." },
//!     { "status": "parsed", "grade": 18.0, "source": "pattern" }
//!   ],
//!   "unparsed": 0
//! }
//! ```

use crate::scorer::mean_grade;
use crate::types::GradeExtraction;
use serde::Serialize;

/// The result of grading one submission against every model solution of its exercise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeReport {
    /// Mean of the extracted grades, in `[0, 20]`.
    pub grade: f64,
    pub feedback: String,
    /// One entry per model solution, in model solution order.
    pub comparisons: Vec<GradeExtraction>,
    /// How many comparisons had no extractable grade and were counted as `0`.
    pub unparsed: usize,
}

impl GradeReport {
    pub fn new(comparisons: Vec<GradeExtraction>, feedback: String) -> Self {
        let unparsed = comparisons.iter().filter(|c| !c.is_parsed()).count();
        Self {
            grade: mean_grade(&comparisons),
            feedback,
            comparisons,
            unparsed,
        }
    }

    /// True when at least one comparison fell back to a zero grade.
    pub fn is_degraded(&self) -> bool {
        self.unparsed > 0
    }
}
