use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static SENTENCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?।]+").unwrap_or_else(|err| panic!("invalid sentence pattern: {err}")));

/// Simple length statistics for a piece of ticket text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct TextStats {
    pub char_count: usize,
    pub word_count: usize,
    pub sentence_count: usize,
    pub avg_word_length: f64,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }
        let words: Vec<&str> = text.split_whitespace().collect();
        let sentence_count = SENTENCE_BREAK
            .split(text)
            .filter(|s| !s.trim().is_empty())
            .count();
        let avg_word_length = if words.is_empty() {
            0.0
        } else {
            words.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / words.len() as f64
        };
        Self {
            char_count: text.chars().count(),
            word_count: words.len(),
            sentence_count,
            avg_word_length,
        }
    }
}

/// Shorthand for [`TextStats::of`].
pub fn text_stats(text: &str) -> TextStats {
    TextStats::of(text)
}
