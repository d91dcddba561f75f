//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → Health check endpoint
//! - `/submissions` → Plagiarism check and auto-grading of a stored submission

use crate::routes::{health::health_routes, submissions::submission_routes};
use crate::state::AppState;
use axum::Router;

pub mod health;
pub mod submissions;

/// Builds the router for every endpoint under `/api`, with `app_state` applied.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/submissions", submission_routes())
        .with_state(app_state)
}
