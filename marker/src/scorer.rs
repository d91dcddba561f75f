//! # Scorer Module
//!
//! Aggregates the grades extracted from each comparison into the final grade.

use crate::round2;
use crate::types::GradeExtraction;

/// Highest grade a submission can receive.
pub const MAX_GRADE: f64 = 20.0;

/// Computes the mean grade over all comparisons, rounded to two decimals.
///
/// Unparsed comparisons count as `0`. An empty slice yields `0.0`.
///
/// # Example
///
/// ```
/// use marker::scorer::mean_grade;
/// use marker::types::{GradeExtraction, GradeSource};
///
/// let parsed = |grade| GradeExtraction::Parsed { grade, source: GradeSource::Pattern, rationale: None };
/// assert_eq!(mean_grade(&[parsed(14.0), parsed(18.0)]), 16.0);
/// assert_eq!(mean_grade(&[parsed(14.0), GradeExtraction::Unparsed]), 7.0);
/// ```
pub fn mean_grade(extractions: &[GradeExtraction]) -> f64 {
    if extractions.is_empty() {
        return 0.0;
    }
    let total: f64 = extractions.iter().map(GradeExtraction::contribution).sum();
    round2(total / extractions.len() as f64)
}

/// Clamps a raw grade into `[0, MAX_GRADE]`.
pub fn clamp_grade(raw: f64) -> f64 {
    raw.clamp(0.0, MAX_GRADE)
}
