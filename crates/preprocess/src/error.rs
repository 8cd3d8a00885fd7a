use thiserror::Error;

use crate::language::Language;

/// Errors that can occur while cleaning ticket text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CleanError {
    #[error("input of {len} chars exceeds the configured limit of {max}")]
    InputTooLarge { len: usize, max: usize },
    #[error("no stopword lexicon loaded for language '{0}'")]
    LexiconUnavailable(Language),
    #[error("invalid cleaner configuration: {0}")]
    InvalidConfig(String),
}

/// Errors surfaced by a [`LanguageIdentifier`](crate::LanguageIdentifier).
///
/// The detector never lets these escape; they only reach the logs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DetectionError {
    #[error("no features in text")]
    NoFeatures,
    #[error("language identification failed: {0}")]
    Identifier(String),
}
