//! # Auto Grader
//!
//! Grades a submission against every model solution of its exercise.
//!
//! ## Lifecycle
//!
//! ```text
//! pending ──► comparing ──► scored
//!    │            │
//!    └────────────┴──────► failed
//! ```
//!
//! 1. Without model solutions the request fails immediately with
//!    [`MarkerError::NoModelSolution`]; no model call is made.
//! 2. One comparison per model solution runs concurrently, at most `max_concurrency` in
//!    flight. The first failure aborts the request and drops the calls still running.
//! 3. A grade is extracted from each answer; answers without one count as `0` and are
//!    reported as unparsed.
//! 4. The final grade is the mean of the extracted grades.
//! 5. Feedback is generated once, against the first model solution.

use crate::error::MarkerError;
use crate::llm::LlmClient;
use crate::parsers::grade_parser::GradeParser;
use crate::report::GradeReport;
use crate::types::{ComparisonReport, GradeExtraction, GradingState};
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, warn};
use util::config::LlmSettings;

pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

#[derive(Clone)]
pub struct AutoGrader {
    client: LlmClient,
    parser: GradeParser,
    max_concurrency: usize,
}

impl AutoGrader {
    pub fn new(client: LlmClient) -> Self {
        Self {
            client,
            parser: GradeParser::default(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    pub fn from_settings(settings: &LlmSettings) -> Self {
        Self::new(LlmClient::from_settings(settings))
            .with_max_concurrency(settings.max_concurrency)
    }

    /// Caps the number of comparison calls in flight. Zero is treated as one.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn with_parser(mut self, parser: GradeParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn client(&self) -> &LlmClient {
        &self.client
    }

    /// Grades `submission` against `model_solutions`.
    ///
    /// # Errors
    /// - [`MarkerError::NoModelSolution`] when `model_solutions` is empty.
    /// - Any error of a comparison or of the feedback call.
    pub async fn auto_grade(
        &self,
        submission: &str,
        model_solutions: &[String],
    ) -> Result<GradeReport, MarkerError> {
        let mut state = GradingState::Pending;

        let Some(first_solution) = model_solutions.first() else {
            transition(&mut state, GradingState::Failed);
            warn!("auto-grade requested without model solutions");
            return Err(MarkerError::NoModelSolution);
        };

        transition(&mut state, GradingState::Comparing);
        let result = self
            .grade_and_explain(submission, first_solution, model_solutions)
            .await;

        match result {
            Ok(report) => {
                transition(&mut state, GradingState::Scored);
                info!(
                    grade = report.grade,
                    comparisons = report.comparisons.len(),
                    unparsed = report.unparsed,
                    "submission graded"
                );
                Ok(report)
            }
            Err(err) => {
                transition(&mut state, GradingState::Failed);
                warn!(error = %err, "auto-grade failed");
                Err(err)
            }
        }
    }

    async fn grade_and_explain(
        &self,
        submission: &str,
        first_solution: &str,
        model_solutions: &[String],
    ) -> Result<GradeReport, MarkerError> {
        let comparisons = self.compare_all(submission, model_solutions).await?;

        let extractions: Vec<GradeExtraction> = comparisons
            .into_iter()
            .map(|comparison| {
                if !comparison.extraction.is_parsed() {
                    warn!(
                        model_solution = comparison.model_solution,
                        "no grade found in comparison answer, counting it as 0"
                    );
                }
                comparison.extraction
            })
            .collect();

        let feedback = self
            .client
            .generate_feedback(submission, first_solution)
            .await?;

        Ok(GradeReport::new(extractions, feedback))
    }

    /// Runs every comparison with bounded concurrency, results in model solution order.
    async fn compare_all(
        &self,
        submission: &str,
        model_solutions: &[String],
    ) -> Result<Vec<ComparisonReport>, MarkerError> {
        let submission = submission.to_owned();
        stream::iter(model_solutions.iter().cloned().enumerate())
            .map(|(index, model)| {
                // Each future owns its inputs so `auto_grade` stays `Send` for spawned callers.
                let client = self.client.clone();
                let parser = self.parser;
                let submission = submission.clone();
                async move {
                    let response = client.compare_solutions(&submission, &model).await?;
                    let extraction = parser.parse(&response);
                    debug!(
                        model_solution = index,
                        grade = ?extraction.grade(),
                        "comparison finished"
                    );
                    Ok::<_, MarkerError>(ComparisonReport {
                        model_solution: index,
                        response,
                        extraction,
                    })
                }
            })
            .buffered(self.max_concurrency)
            .try_collect()
            .await
    }
}

fn transition(state: &mut GradingState, next: GradingState) {
    debug!(from = ?*state, to = ?next, "grading state change");
    *state = next;
}
