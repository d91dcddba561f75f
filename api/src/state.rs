//! Application state shared across Axum route handlers.
//!
//! Holds the submission store and the two assessment components. Everything is behind
//! `Arc`, so cloning the state per request is cheap and no component holds per-request
//! data.

use crate::store::SubmissionStore;
use marker::AutoGrader;
use plagiarism::{DetectorConfig, PlagiarismDetector};
use std::sync::Arc;
use util::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn SubmissionStore>,
    detector: Arc<PlagiarismDetector>,
    grader: Arc<AutoGrader>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn SubmissionStore>,
        detector: PlagiarismDetector,
        grader: AutoGrader,
    ) -> Self {
        Self {
            store,
            detector: Arc::new(detector),
            grader: Arc::new(grader),
        }
    }

    /// Builds the detector and grader from configuration.
    ///
    /// An out-of-range plagiarism threshold falls back to the default with a warning.
    pub fn from_config(config: &AppConfig, store: Arc<dyn SubmissionStore>) -> Self {
        let detector_config = DetectorConfig::new(config.plagiarism.threshold).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default plagiarism threshold");
            DetectorConfig::default()
        });
        Self::new(
            store,
            PlagiarismDetector::new(detector_config),
            AutoGrader::from_settings(&config.llm),
        )
    }

    pub fn store(&self) -> &dyn SubmissionStore {
        self.store.as_ref()
    }

    pub fn detector(&self) -> &PlagiarismDetector {
        &self.detector
    }

    pub fn grader(&self) -> &AutoGrader {
        &self.grader
    }
}
