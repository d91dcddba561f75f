//! Code Structure Analyzer
//!
//! Computes simple structural metrics for a document. These are an auxiliary signal shown
//! next to the similarity results; they never decide plagiarism or a grade on their own.
//!
//! Tokens here are raw word runs with case preserved, unlike the [`crate::tokenizer`]
//! tokens, because keywords and identifiers in code are case-sensitive.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

/// Control-flow keywords counted by [`StructureMetrics::complexity`].
pub const CONTROL_KEYWORDS: [&str; 10] = [
    "if", "else", "for", "while", "do", "switch", "case", "break", "continue", "return",
];

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("word pattern is valid"));

static CONTROL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b(?:{})\b", CONTROL_KEYWORDS.join("|")))
        .expect("keyword pattern is valid")
});

/// Structural metrics of one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StructureMetrics {
    pub line_count: usize,
    pub token_count: usize,
    pub unique_token_count: usize,
    /// Whole-word, case-sensitive occurrences of [`CONTROL_KEYWORDS`].
    pub complexity: usize,
}

impl StructureMetrics {
    /// Structural closeness of two documents in `[0, 1]`.
    ///
    /// Mean of `min / max` over the four metrics; a metric that is zero on both sides
    /// counts as identical.
    pub fn similarity(&self, other: &StructureMetrics) -> f64 {
        let pairs = [
            (self.line_count, other.line_count),
            (self.token_count, other.token_count),
            (self.unique_token_count, other.unique_token_count),
            (self.complexity, other.complexity),
        ];
        let total: f64 = pairs
            .iter()
            .map(|&(a, b)| match a.max(b) {
                0 => 1.0,
                max => a.min(b) as f64 / max as f64,
            })
            .sum();
        total / pairs.len() as f64
    }
}

pub struct CodeStructureAnalyzer;

impl CodeStructureAnalyzer {
    /// Computes [`StructureMetrics`] for `text`. Pure and deterministic.
    pub fn analyze(text: &str) -> StructureMetrics {
        let tokens: Vec<&str> = WORD.find_iter(text).map(|m| m.as_str()).collect();
        let unique: HashSet<&str> = tokens.iter().copied().collect();

        StructureMetrics {
            line_count: text.lines().count(),
            token_count: tokens.len(),
            unique_token_count: unique.len(),
            complexity: CONTROL.find_iter(text).count(),
        }
    }
}
