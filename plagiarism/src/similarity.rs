//! # Similarity Module
//!
//! Two measures are provided:
//!
//! - [`jaccard`]: set overlap `|a ∩ b| / |a ∪ b|` between two token sets.
//! - [`TfIdfIndex`]: a TF-IDF model over an ordered corpus. Scoring is done by document
//!   position, so the caller must keep the corpus order stable between [`build_tfidf_index`]
//!   and [`tfidf_score`]. By convention position `0` holds the target submission.
//!
//! Weighting follows the classic formulation:
//!
//! ```text
//! tf(t, d)  = occurrences of t in d
//! idf(t)    = 1 + ln(N / (1 + df(t)))
//! score     = Σ tf(t, d) · idf(t)   over every term t of the query text
//! ```

use crate::error::ProcessingError;
use crate::tokenizer::{TokenSet, Tokenizer};
use std::collections::HashMap;

/// Jaccard similarity of two token sets, `0.0` when both are empty.
pub fn jaccard(a: &TokenSet, b: &TokenSet) -> f64 {
    let union = a.union_len(b);
    if union == 0 {
        return 0.0;
    }
    a.intersection_len(b) as f64 / union as f64
}

/// A TF-IDF model built once over an ordered corpus.
#[derive(Debug, Clone)]
pub struct TfIdfIndex {
    term_counts: Vec<HashMap<String, usize>>,
    document_frequency: HashMap<String, usize>,
}

impl TfIdfIndex {
    /// Builds the index. Document order is preserved and defines scoring positions.
    ///
    /// # Errors
    /// Returns [`ProcessingError::EmptyCorpus`] when `documents` is empty.
    pub fn build<S: AsRef<str>>(documents: &[S]) -> Result<Self, ProcessingError> {
        if documents.is_empty() {
            return Err(ProcessingError::EmptyCorpus);
        }

        let mut term_counts = Vec::with_capacity(documents.len());
        let mut document_frequency: HashMap<String, usize> = HashMap::new();

        for document in documents {
            let mut counts: HashMap<String, usize> = HashMap::new();
            for term in Tokenizer::terms(document.as_ref()) {
                *counts.entry(term).or_default() += 1;
            }
            for term in counts.keys() {
                *document_frequency.entry(term.clone()).or_default() += 1;
            }
            term_counts.push(counts);
        }

        Ok(Self {
            term_counts,
            document_frequency,
        })
    }

    /// Number of documents in the corpus.
    pub fn len(&self) -> usize {
        self.term_counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.term_counts.is_empty()
    }

    /// Raw occurrences of `term` in the document at `document_index`.
    pub fn tf(&self, term: &str, document_index: usize) -> Result<usize, ProcessingError> {
        let counts = self.document(document_index)?;
        Ok(counts.get(term).copied().unwrap_or(0))
    }

    /// Inverse document frequency of `term` over the whole corpus.
    pub fn idf(&self, term: &str) -> f64 {
        let df = self.document_frequency.get(term).copied().unwrap_or(0);
        1.0 + (self.len() as f64 / (1.0 + df as f64)).ln()
    }

    /// TF-IDF weighted similarity of `text` against the document at `document_index`.
    ///
    /// # Errors
    /// Returns [`ProcessingError::DocumentOutOfRange`] for an index outside the corpus.
    pub fn score(&self, text: &str, document_index: usize) -> Result<f64, ProcessingError> {
        let counts = self.document(document_index)?;
        Ok(Tokenizer::terms(text)
            .iter()
            .map(|term| counts.get(term).copied().unwrap_or(0) as f64 * self.idf(term))
            .sum())
    }

    fn document(&self, index: usize) -> Result<&HashMap<String, usize>, ProcessingError> {
        self.term_counts
            .get(index)
            .ok_or(ProcessingError::DocumentOutOfRange {
                index,
                len: self.len(),
            })
    }
}

/// Builds one TF-IDF model over the full ordered corpus.
pub fn build_tfidf_index<S: AsRef<str>>(documents: &[S]) -> Result<TfIdfIndex, ProcessingError> {
    TfIdfIndex::build(documents)
}

/// Scores `text` against the document at `document_index` of `index`.
pub fn tfidf_score(
    index: &TfIdfIndex,
    text: &str,
    document_index: usize,
) -> Result<f64, ProcessingError> {
    index.score(text, document_index)
}
