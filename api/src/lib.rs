//! HTTP surface of the assessment core.
//!
//! Exposes plagiarism checking and auto-grading of stored submissions under `/api`.

pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;
pub mod store;
