//! Routes for `/api/submissions/{submission_id}/...`.
//!
//! - `POST /{submission_id}/check-plagiarism` → [`post::check_plagiarism`]
//! - `POST /{submission_id}/auto-grade` → [`post::auto_grade`]

use crate::state::AppState;
use axum::{Router, routing::post};

pub mod post;

pub fn submission_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{submission_id}/check-plagiarism",
            post(post::check_plagiarism),
        )
        .route("/{submission_id}/auto-grade", post(post::auto_grade))
}
