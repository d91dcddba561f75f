//! Submission storage contract.
//!
//! The assessment core never touches storage itself: route handlers read submission and
//! model-solution texts through [`SubmissionStore`] and hand them to the detector or the
//! grader. [`MemoryStore`] is the bundled implementation, optionally seeded from a JSON
//! file:
//!
//! ```json
//! {
//!   "submissions": [ { "id": 1, "exercise_id": 7, "text": "SELECT ..." } ],
//!   "model_solutions": [ { "exercise_id": 7, "content": "SELECT ..." } ]
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("invalid seed data: {0}")]
    InvalidSeed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub exercise_id: i64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSolution {
    pub exercise_id: i64,
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub submissions: Vec<Submission>,
    #[serde(default)]
    pub model_solutions: Vec<ModelSolution>,
}

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn submission(&self, id: i64) -> Result<Option<Submission>, StoreError>;

    /// Every other submission of the same exercise, in ascending id order.
    async fn other_submissions(&self, submission: &Submission)
    -> Result<Vec<Submission>, StoreError>;

    /// Model solutions of an exercise, in insertion order.
    async fn model_solutions(&self, exercise_id: i64) -> Result<Vec<ModelSolution>, StoreError>;

    async fn record_max_similarity(&self, id: i64, max_similarity: f64)
    -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct Inner {
    submissions: HashMap<i64, Submission>,
    model_solutions: Vec<ModelSolution>,
    max_similarity: HashMap<i64, f64>,
}

/// In-process store backed by a `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn from_seed(seed: SeedData) -> Self {
        let submissions = seed
            .submissions
            .into_iter()
            .map(|s| (s.id, s))
            .collect();
        Self {
            inner: RwLock::new(Inner {
                submissions,
                model_solutions: seed.model_solutions,
                max_similarity: HashMap::new(),
            }),
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| StoreError::InvalidSeed(format!("cannot read {}: {e}", path.display())))?;
        let seed: SeedData = serde_json::from_str(&raw)
            .map_err(|e| StoreError::InvalidSeed(format!("{}: {e}", path.display())))?;
        Ok(Self::from_seed(seed))
    }

    pub async fn insert_submission(&self, submission: Submission) {
        self.inner
            .write()
            .await
            .submissions
            .insert(submission.id, submission);
    }

    pub async fn insert_model_solution(&self, solution: ModelSolution) {
        self.inner.write().await.model_solutions.push(solution);
    }

    /// Last maximum similarity recorded for a submission.
    pub async fn max_similarity(&self, id: i64) -> Option<f64> {
        self.inner.read().await.max_similarity.get(&id).copied()
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn submission(&self, id: i64) -> Result<Option<Submission>, StoreError> {
        Ok(self.inner.read().await.submissions.get(&id).cloned())
    }

    async fn other_submissions(
        &self,
        submission: &Submission,
    ) -> Result<Vec<Submission>, StoreError> {
        let inner = self.inner.read().await;
        let mut others: Vec<Submission> = inner
            .submissions
            .values()
            .filter(|s| s.exercise_id == submission.exercise_id && s.id != submission.id)
            .cloned()
            .collect();
        others.sort_by_key(|s| s.id);
        Ok(others)
    }

    async fn model_solutions(&self, exercise_id: i64) -> Result<Vec<ModelSolution>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .model_solutions
            .iter()
            .filter(|m| m.exercise_id == exercise_id)
            .cloned()
            .collect())
    }

    async fn record_max_similarity(
        &self,
        id: i64,
        max_similarity: f64,
    ) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .max_similarity
            .insert(id, max_similarity);
        Ok(())
    }
}
