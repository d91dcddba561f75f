//! # Plagiarism Detector
//!
//! Compares one submission against a corpus of other submissions.
//!
//! ## Algorithm
//! 1. Tokenize the submission once.
//! 2. For every other document: tokenize, compute Jaccard, and flag the pair when the
//!    similarity is strictly above the configured threshold.
//! 3. Build one TF-IDF index over `[submission, others...]` with the submission at `0`.
//! 4. Score the submission against every other document by its corpus position (`1..=N`).
//! 5. Return results in the order the others were given.
//!
//! A failure while building or querying the index fails the whole call; no partial
//! results are returned.

use crate::error::ProcessingError;
use crate::similarity::{jaccard, TfIdfIndex};
use crate::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info};

/// A comparison document: an identifier supplied by the caller plus its raw text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusDocument {
    pub id: String,
    pub text: String,
}

impl CorpusDocument {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// The outcome of comparing the submission with one corpus document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityResult {
    pub comparison_id: String,
    /// Jaccard overlap of the two token sets, in `[0, 1]`.
    pub jaccard_similarity: f64,
    /// TF-IDF weighted similarity of the submission against this document.
    pub tfidf_score: f64,
    pub is_plagiarized: bool,
}

/// Tunables for [`PlagiarismDetector`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    threshold: f64,
}

impl DetectorConfig {
    pub const DEFAULT_THRESHOLD: f64 = 0.8;

    /// # Errors
    /// Returns [`ProcessingError::InvalidThreshold`] unless `threshold` lies in `[0, 1]`.
    pub fn new(threshold: f64) -> Result<Self, ProcessingError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ProcessingError::InvalidThreshold(threshold));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }
}

/// Results of one detection run plus the aggregate values the caller persists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionReport {
    /// In the same order as the comparison documents were supplied.
    pub results: Vec<SimilarityResult>,
    /// Highest Jaccard similarity over all results, `0.0` when there are none.
    pub max_similarity: f64,
    /// True when at least one pair is flagged.
    pub flagged: bool,
}

impl DetectionReport {
    fn from_results(results: Vec<SimilarityResult>) -> Self {
        let max_similarity = results
            .iter()
            .map(|r| r.jaccard_similarity)
            .fold(0.0, f64::max);
        let flagged = results.iter().any(|r| r.is_plagiarized);
        Self {
            results,
            max_similarity,
            flagged,
        }
    }

    /// Results ordered from most to least similar.
    ///
    /// Ties on Jaccard fall back to the TF-IDF score, then to the comparison id.
    pub fn ranked(&self) -> Vec<SimilarityResult> {
        let mut ranked = self.results.clone();
        ranked.sort_by(|a, b| {
            b.jaccard_similarity
                .total_cmp(&a.jaccard_similarity)
                .then_with(|| b.tfidf_score.total_cmp(&a.tfidf_score))
                .then_with(|| a.comparison_id.cmp(&b.comparison_id))
        });
        ranked
    }
}

/// Runs the Jaccard and TF-IDF measures for a submission against a corpus.
#[derive(Debug, Clone, Default)]
pub struct PlagiarismDetector {
    config: DetectorConfig,
}

impl PlagiarismDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> DetectorConfig {
        self.config
    }

    /// Whether a Jaccard similarity is above the configured threshold.
    pub fn is_plagiarized(&self, jaccard_similarity: f64) -> bool {
        jaccard_similarity.partial_cmp(&self.config.threshold) == Some(Ordering::Greater)
    }

    /// Compares `submission` with every document in `others`.
    ///
    /// # Errors
    /// Propagates any [`ProcessingError`] from building or querying the TF-IDF index.
    pub fn detect(
        &self,
        submission: &str,
        others: &[CorpusDocument],
    ) -> Result<Vec<SimilarityResult>, ProcessingError> {
        if others.is_empty() {
            debug!("no comparison documents, skipping tf-idf index");
            return Ok(Vec::new());
        }

        let submission_tokens = Tokenizer::tokenize(submission);

        let mut corpus = Vec::with_capacity(others.len() + 1);
        corpus.push(submission);
        corpus.extend(others.iter().map(|doc| doc.text.as_str()));
        let index = TfIdfIndex::build(&corpus)?;

        let results = others
            .iter()
            .enumerate()
            .map(|(position, other)| -> Result<SimilarityResult, ProcessingError> {
                let other_tokens = Tokenizer::tokenize(&other.text);
                let jaccard_similarity = jaccard(&submission_tokens, &other_tokens);
                let tfidf_score = index.score(submission, position + 1)?;
                Ok(SimilarityResult {
                    comparison_id: other.id.clone(),
                    jaccard_similarity,
                    tfidf_score,
                    is_plagiarized: self.is_plagiarized(jaccard_similarity),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let flagged = results.iter().filter(|r| r.is_plagiarized).count();
        if flagged > 0 {
            info!(
                compared = results.len(),
                flagged,
                threshold = self.config.threshold,
                "plagiarism detected"
            );
        } else {
            debug!(compared = results.len(), "no pair above threshold");
        }

        Ok(results)
    }

    /// Like [`detect`](Self::detect) but also computes the maximum similarity and flag.
    pub fn report(
        &self,
        submission: &str,
        others: &[CorpusDocument],
    ) -> Result<DetectionReport, ProcessingError> {
        self.detect(submission, others)
            .map(DetectionReport::from_results)
    }
}
