//! Tokenizer
//!
//! Splits raw text into lower-cased word tokens and drops anything two characters or
//! shorter. Any string is valid input; empty or whitespace-only text yields no tokens.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("word pattern is valid"));

/// Tokens of this many characters or fewer are discarded.
const MIN_TOKEN_EXCLUSIVE: usize = 2;

/// An immutable set of normalized tokens derived from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenSet(BTreeSet<String>);

impl TokenSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of tokens present in both sets.
    pub fn intersection_len(&self, other: &TokenSet) -> usize {
        self.0.intersection(&other.0).count()
    }

    /// Number of distinct tokens present in either set.
    pub fn union_len(&self, other: &TokenSet) -> usize {
        self.len() + other.len() - self.intersection_len(other)
    }
}

impl FromIterator<String> for TokenSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        TokenSet(iter.into_iter().collect())
    }
}

/// Text tokenizer shared by the Jaccard and TF-IDF measures.
pub struct Tokenizer;

impl Tokenizer {
    /// Normalized terms of `text` in document order, duplicates kept.
    ///
    /// TF-IDF needs term frequencies, so this is the primitive both measures build on.
    pub fn terms(text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        WORD.find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|word| word.chars().count() > MIN_TOKEN_EXCLUSIVE)
            .map(str::to_string)
            .collect()
    }

    /// Tokenize `text` into a deduplicated [`TokenSet`].
    pub fn tokenize(text: &str) -> TokenSet {
        Self::terms(text).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_deduplicates() {
        let tokens = Tokenizer::tokenize("SELECT name FROM users; select NAME from Users");
        let collected: Vec<&str> = tokens.iter().collect();
        assert_eq!(collected, vec!["from", "name", "select", "users"]);
    }

    #[test]
    fn drops_short_tokens() {
        let tokens = Tokenizer::tokenize("a an the x = y; id at foo");
        assert!(tokens.contains("the"));
        assert!(tokens.contains("foo"));
        assert!(!tokens.contains("an"));
        assert!(!tokens.contains("id"));
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn empty_and_whitespace_input() {
        assert!(Tokenizer::tokenize("").is_empty());
        assert!(Tokenizer::tokenize("   \n\t  ").is_empty());
        assert!(Tokenizer::tokenize("*** ;; ()").is_empty());
    }

    #[test]
    fn splits_on_punctuation() {
        let tokens = Tokenizer::tokenize("users.name,orders.total(price)");
        for expected in ["users", "name", "orders", "total", "price"] {
            assert!(tokens.contains(expected), "missing {expected}");
        }
    }

    #[test]
    fn terms_keep_order_and_repeats() {
        assert_eq!(
            Tokenizer::terms("Join orders JOIN users"),
            vec!["join", "orders", "join", "users"]
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // "été" is three characters but six bytes.
        assert!(Tokenizer::tokenize("été").contains("été"));
        assert!(Tokenizer::tokenize("où").is_empty());
    }
}
