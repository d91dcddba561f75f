use crate::response::{ApiResponse, error_response};
use crate::state::AppState;
use crate::store::Submission;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use marker::MarkerError;
use plagiarism::{CodeStructureAnalyzer, CorpusDocument, SimilarityResult, StructureMetrics};
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct StructureComparison {
    pub comparison_id: String,
    /// Structural closeness in `[0, 1]`, auxiliary to the similarity results.
    pub similarity: f64,
}

#[derive(Debug, Serialize)]
pub struct PlagiarismCheckResponse {
    pub submission_id: i64,
    pub results: Vec<SimilarityResult>,
    pub max_similarity: f64,
    pub flagged: bool,
    pub metrics: StructureMetrics,
    pub structure: Vec<StructureComparison>,
}

async fn load_submission(state: &AppState, submission_id: i64) -> Result<Submission, Response> {
    match state.store().submission(submission_id).await {
        Ok(Some(submission)) => Ok(submission),
        Ok(None) => Err(error_response(
            StatusCode::NOT_FOUND,
            "Submission not found",
        )),
        Err(e) => {
            error!(submission_id, error = %e, "failed to load submission");
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load submission",
            ))
        }
    }
}

/// POST /api/submissions/{submission_id}/check-plagiarism
///
/// Compares the submission with every other submission of the same exercise and records
/// the maximum similarity.
///
/// ### Responses
///
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": {
///     "submission_id": 12,
///     "results": [
///       { "comparison_id": "13", "jaccard_similarity": 1.0, "tfidf_score": 2.41, "is_plagiarized": true }
///     ],
///     "max_similarity": 1.0,
///     "flagged": true,
///     "metrics": { "line_count": 1, "token_count": 4, "unique_token_count": 4, "complexity": 0 },
///     "structure": [ { "comparison_id": "13", "similarity": 1.0 } ]
///   },
///   "message": "Plagiarism check completed"
/// }
/// ```
/// - `404 Not Found` if the submission does not exist
/// - `500 Internal Server Error` on storage or processing failure
pub async fn check_plagiarism(
    State(state): State<AppState>,
    Path(submission_id): Path<i64>,
) -> Response {
    let submission = match load_submission(&state, submission_id).await {
        Ok(submission) => submission,
        Err(response) => return response,
    };

    let others = match state.store().other_submissions(&submission).await {
        Ok(others) => others,
        Err(e) => {
            error!(submission_id, error = %e, "failed to load comparison submissions");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load submissions",
            );
        }
    };

    let corpus: Vec<CorpusDocument> = others
        .iter()
        .map(|other| CorpusDocument::new(other.id.to_string(), other.text.clone()))
        .collect();

    let report = match state.detector().report(&submission.text, &corpus) {
        Ok(report) => report,
        Err(e) => {
            error!(submission_id, error = %e, "plagiarism check failed");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to check plagiarism",
            );
        }
    };

    if let Err(e) = state
        .store()
        .record_max_similarity(submission_id, report.max_similarity)
        .await
    {
        error!(submission_id, error = %e, "failed to record max similarity");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to record plagiarism result",
        );
    }

    let metrics = CodeStructureAnalyzer::analyze(&submission.text);
    let structure = others
        .iter()
        .map(|other| StructureComparison {
            comparison_id: other.id.to_string(),
            similarity: metrics.similarity(&CodeStructureAnalyzer::analyze(&other.text)),
        })
        .collect();

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            PlagiarismCheckResponse {
                submission_id,
                results: report.results,
                max_similarity: report.max_similarity,
                flagged: report.flagged,
                metrics,
                structure,
            },
            "Plagiarism check completed",
        )),
    )
        .into_response()
}

/// POST /api/submissions/{submission_id}/auto-grade
///
/// Grades the submission against the model solutions of its exercise.
///
/// ### Responses
///
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": {
///     "grade": 16.0,
///     "feedback": "Strengths: ...",
///     "comparisons": [
///       { "status": "parsed", "grade": 14.0, "source": "json", "rationale": "..." },
///       { "status": "parsed", "grade": 18.0, "source": "pattern" }
///     ],
///     "unparsed": 0
///   },
///   "message": "Submission graded"
/// }
/// ```
/// - `400 Bad Request` if the exercise has no model solution
/// - `404 Not Found` if the submission does not exist
/// - `500 Internal Server Error` if the model endpoint fails or times out
pub async fn auto_grade(
    State(state): State<AppState>,
    Path(submission_id): Path<i64>,
) -> Response {
    let submission = match load_submission(&state, submission_id).await {
        Ok(submission) => submission,
        Err(response) => return response,
    };

    let model_solutions: Vec<String> = match state
        .store()
        .model_solutions(submission.exercise_id)
        .await
    {
        Ok(solutions) => solutions.into_iter().map(|s| s.content).collect(),
        Err(e) => {
            error!(submission_id, error = %e, "failed to load model solutions");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load model solutions",
            );
        }
    };

    match state
        .grader()
        .auto_grade(&submission.text, &model_solutions)
        .await
    {
        Ok(report) => (
            StatusCode::OK,
            Json(ApiResponse::success(report, "Submission graded")),
        )
            .into_response(),
        Err(MarkerError::NoModelSolution) => error_response(
            StatusCode::BAD_REQUEST,
            "No model solution available for this exercise",
        ),
        Err(e) => {
            error!(submission_id, error = %e, "auto-grade failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to auto-grade submission",
            )
        }
    }
}
