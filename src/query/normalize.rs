use std::collections::HashSet;

use super::stopwords::{StopwordError, StopwordStore};
use crate::lang::Lang;

/// Replaces everything except word characters and whitespace with a space, then lowercases.
pub fn strip_punctuation(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .to_lowercase()
}

/// Produces the cleaned query used both for the engine request and for lexical re-scoring.
/// Returns an empty string when nothing meaningful is left.
pub fn normalize_query(raw: &str, stopwords: &HashSet<String>) -> String {
    strip_punctuation(raw)
        .split_whitespace()
        .filter(|token| !stopwords.contains(*token))
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug)]
pub struct QueryNormalizer {
    stopwords: StopwordStore,
}

impl QueryNormalizer {
    pub fn new(stopwords: StopwordStore) -> Self {
        Self { stopwords }
    }

    pub fn normalize(&self, raw: &str, lang: Lang) -> Result<String, StopwordError> {
        let stopwords = self.stopwords.load(lang)?;
        Ok(normalize_query(raw, &stopwords))
    }
}
