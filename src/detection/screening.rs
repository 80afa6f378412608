// Noise screening for single tokens that did not match a known phrase

use std::collections::HashSet;

use crate::text::normalize;

/// Default minimum length, in characters, of a candidate term
pub const DEFAULT_MIN_TOKEN_LENGTH: usize = 3;

/// Built-in Spanish stop words (normalized when the rules are built)
pub const SPANISH_STOP_WORDS: &[&str] = &[
    "el", "la", "los", "las", "de", "del", "y", "o", "que", "en", "es", "un", "una", "por", "con",
    "al", "se", "lo", "su", "para", "a", "como", "más", "menos", "ya", "pero", "sin", "sobre",
    "esto", "esta", "ese", "esa", "esas", "estos", "sí", "no",
];

/// Why a token was not considered a term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Empty,
    TooShort,
    Numeric,
    StopWord,
}

/// Deterministic filters applied to canonical single-token forms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreeningRules {
    min_token_length: usize,
    stop_words: HashSet<String>,
}

impl Default for ScreeningRules {
    fn default() -> Self {
        Self::spanish()
    }
}

impl ScreeningRules {
    pub fn new<I, S>(min_token_length: usize, stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stop_words = stop_words
            .into_iter()
            .map(|word| normalize(word.as_ref()))
            .filter(|word| !word.is_empty())
            .collect();
        Self {
            min_token_length,
            stop_words,
        }
    }

    /// Built-in Spanish stop words with the default minimum length
    pub fn spanish() -> Self {
        Self::new(DEFAULT_MIN_TOKEN_LENGTH, SPANISH_STOP_WORDS)
    }

    pub fn with_min_token_length(mut self, min_token_length: usize) -> Self {
        self.min_token_length = min_token_length;
        self
    }

    /// Add stop words on top of the current list
    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stop_words.extend(
            words
                .into_iter()
                .map(|word| normalize(word.as_ref()))
                .filter(|word| !word.is_empty()),
        );
        self
    }

    /// Stop treating these words as stop words
    pub fn without_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            self.stop_words.remove(&normalize(word.as_ref()));
        }
        self
    }

    pub fn min_token_length(&self) -> usize {
        self.min_token_length
    }

    pub fn is_stop_word(&self, canonical: &str) -> bool {
        self.stop_words.contains(canonical)
    }

    /// Decide whether a canonical form is noise. `None` means it survives.
    pub fn screen(&self, canonical: &str) -> Option<SkipReason> {
        if canonical.is_empty() {
            Some(SkipReason::Empty)
        } else if canonical.chars().count() < self.min_token_length {
            Some(SkipReason::TooShort)
        } else if !canonical.chars().any(char::is_alphabetic) {
            Some(SkipReason::Numeric)
        } else if self.is_stop_word(canonical) {
            Some(SkipReason::StopWord)
        } else {
            None
        }
    }
}

#[cfg(test)]
#[path = "screening_test.rs"]
mod tests;
