//! Term-count text encoder.
//!
//! Lowercases text, splits it into word tokens of at least two characters and
//! maps each token of a fitted vocabulary to a fixed column.

use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use super::classifier::ClassifierError;

// NOTE: expect() is acceptable here, the pattern is a compile-time constant
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("Invalid regex: token pattern"));

/// Bag-of-words encoder producing dense count vectors.
#[derive(Debug, Clone)]
pub struct CountEncoder {
    vocabulary: HashMap<String, usize>,
    terms: Vec<String>,
}

impl CountEncoder {
    /// Splits `text` into lowercase tokens.
    pub fn tokenize(text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        TOKEN_PATTERN
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Learns the vocabulary of `texts`. Columns follow the sorted term order.
    pub fn fit<'a, I>(texts: I) -> Result<Self, ClassifierError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let terms: BTreeSet<String> = texts.into_iter().flat_map(Self::tokenize).collect();
        if terms.is_empty() {
            return Err(ClassifierError::EmptyVocabulary);
        }

        let terms: Vec<String> = terms.into_iter().collect();
        let vocabulary = terms
            .iter()
            .enumerate()
            .map(|(column, term)| (term.clone(), column))
            .collect();

        Ok(Self { vocabulary, terms })
    }

    /// Encodes `text` as per-term counts. Unknown terms are dropped.
    pub fn transform(&self, text: &str) -> Vec<f64> {
        let mut counts = vec![0.0; self.terms.len()];
        for token in Self::tokenize(text) {
            if let Some(&column) = self.vocabulary.get(&token) {
                counts[column] += 1.0;
            }
        }
        counts
    }

    pub fn transform_all<'a, I>(&self, texts: I) -> Vec<Vec<f64>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        texts.into_iter().map(|text| self.transform(text)).collect()
    }

    /// Number of columns produced by [`CountEncoder::transform`].
    pub fn dimension(&self) -> usize {
        self.terms.len()
    }

    /// Vocabulary terms in column order.
    #[cfg(test)]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    #[cfg(test)]
    pub fn contains(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }
}
