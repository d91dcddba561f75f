//! # Types Module
//!
//! Core data structures shared by the grade parser, the scorer and the auto grader.

use serde::Serialize;

/// Where a parsed grade was found in the model's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeSource {
    /// The strict `{"grade": .., "rationale": ..}` object.
    Json,
    /// The `Note sur 20: <n>` line, used when no JSON object is present.
    Pattern,
}

/// The grade extracted from one comparison response.
///
/// `Unparsed` still contributes `0` to the mean grade, but stays visible in the report so
/// a degraded zero is never confused with a real one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GradeExtraction {
    Parsed {
        grade: f64,
        source: GradeSource,
        #[serde(skip_serializing_if = "Option::is_none")]
        rationale: Option<String>,
    },
    Unparsed,
}

impl GradeExtraction {
    pub fn grade(&self) -> Option<f64> {
        match self {
            GradeExtraction::Parsed { grade, .. } => Some(*grade),
            GradeExtraction::Unparsed => None,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, GradeExtraction::Parsed { .. })
    }

    /// Value counted towards the mean grade.
    pub fn contribution(&self) -> f64 {
        self.grade().unwrap_or(0.0)
    }
}

/// Lifecycle of one auto-grading request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradingState {
    Pending,
    Comparing,
    Scored,
    Failed,
}

/// The model's free-text comparison of a submission with one model solution.
///
/// Lives only for the duration of a grading request.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    /// Position of the model solution in the exercise's list.
    pub model_solution: usize,
    pub response: String,
    pub extraction: GradeExtraction,
}
