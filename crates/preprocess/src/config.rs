//! Configuration for the detector and the cleaner.
//!
//! Both structs are cheap to clone and deserialize from the `language` and
//! `cleaner` sections of the service config.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where a language's stopword list comes from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StopwordSource {
    /// The list compiled into the crate.
    #[default]
    Builtin,
    /// A newline-separated word file, read once when the cleaner is built.
    File(PathBuf),
    /// No list. Stopword removal for this language falls back to the
    /// un-filtered text.
    Disabled,
}

/// Controls [`TextCleaner`](crate::TextCleaner).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CleanerConfig {
    /// Lowercase after whitespace normalization.
    pub lowercase: bool,
    /// Drop stopwords for the detected language.
    pub remove_stopwords: bool,
    /// Inputs longer than this (in chars) are rejected with
    /// [`CleanError::InputTooLarge`](crate::CleanError::InputTooLarge).
    pub max_input_chars: usize,
    pub english_stopwords: StopwordSource,
    pub hindi_stopwords: StopwordSource,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            remove_stopwords: true,
            max_input_chars: 5000,
            english_stopwords: StopwordSource::Builtin,
            hindi_stopwords: StopwordSource::Builtin,
        }
    }
}

/// Controls [`LanguageDetector`](crate::LanguageDetector).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DetectorConfig {
    /// Trimmed inputs shorter than this many chars are reported as English
    /// without running identification.
    pub min_chars: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self { min_chars: 3 }
    }
}
