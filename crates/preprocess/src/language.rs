//! Language detection for ticket text.
//!
//! The detector only ever answers [`Language::En`] or [`Language::Hi`].
//! Identification itself is delegated to a [`LanguageIdentifier`] so the
//! classifier can be swapped without touching the fallback rules, which are:
//!
//! - trimmed input shorter than `min_chars` is English,
//! - input with nothing left after URL/email/symbol stripping is English,
//! - any identified code other than `en`/`hi` is English,
//! - an identifier error is logged and answered with English.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::DetectorConfig;
use crate::error::DetectionError;
use crate::patterns::{AT_TOKEN, NON_WORD, URL};
use crate::whitespace::collapse_whitespace;

/// Languages the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Hi];

    pub fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::En => "english",
            Language::Hi => "hindi",
        }
    }

    /// Maps an ISO 639-1 code to a supported language.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Language::En),
            "hi" => Some(Language::Hi),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = DetectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(s)
            .ok_or_else(|| DetectionError::Identifier(format!("unsupported language code '{s}'")))
    }
}

/// One candidate produced by an identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageGuess {
    /// ISO 639-1 code, or `"und"` when the script gives no hint.
    pub code: String,
    pub probability: f64,
}

/// Classifies pre-cleaned text. Candidates come back best first.
pub trait LanguageIdentifier: Send + Sync {
    fn identify(&self, text: &str) -> Result<Vec<LanguageGuess>, DetectionError>;
}

/// Deterministic classifier that votes by Unicode script.
///
/// Devanagari letters vote for `hi`, Latin letters for `en`, a few other
/// scripts for their most common language, and anything else for `und`.
/// Text without a single letter has no features and is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptIdentifier;

impl ScriptIdentifier {
    fn script_code(ch: char) -> Option<&'static str> {
        match ch as u32 {
            0x0900..=0x097F | 0xA8E0..=0xA8FF => Some("hi"),
            0x0400..=0x04FF => Some("ru"),
            0x0600..=0x06FF => Some("ar"),
            0x0980..=0x09FF => Some("bn"),
            0x0B80..=0x0BFF => Some("ta"),
            0x4E00..=0x9FFF => Some("zh"),
            _ if ch.is_ascii_alphabetic() => Some("en"),
            0x00C0..=0x024F if ch.is_alphabetic() => Some("en"),
            _ if ch.is_alphabetic() => Some("und"),
            _ => None,
        }
    }
}

impl LanguageIdentifier for ScriptIdentifier {
    fn identify(&self, text: &str) -> Result<Vec<LanguageGuess>, DetectionError> {
        let mut votes: BTreeMap<&'static str, usize> = BTreeMap::new();
        let mut total = 0usize;
        for code in text.chars().filter_map(Self::script_code) {
            *votes.entry(code).or_default() += 1;
            total += 1;
        }
        if total == 0 {
            return Err(DetectionError::NoFeatures);
        }

        let mut guesses: Vec<LanguageGuess> = votes
            .into_iter()
            .map(|(code, count)| LanguageGuess {
                code: code.to_string(),
                probability: count as f64 / total as f64,
            })
            .collect();
        // BTreeMap order breaks ties, so the ranking is stable.
        guesses.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        Ok(guesses)
    }
}

/// Per-language probabilities restricted to the supported set.
pub type LanguageScores = BTreeMap<Language, f64>;

/// Resolves ticket text to English or Hindi.
#[derive(Clone)]
pub struct LanguageDetector {
    cfg: DetectorConfig,
    identifier: Arc<dyn LanguageIdentifier>,
}

impl fmt::Debug for LanguageDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageDetector")
            .field("cfg", &self.cfg)
            .finish_non_exhaustive()
    }
}

impl Default for LanguageDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

impl LanguageDetector {
    pub fn new(cfg: DetectorConfig) -> Self {
        Self::with_identifier(cfg, Arc::new(ScriptIdentifier))
    }

    pub fn with_identifier(cfg: DetectorConfig, identifier: Arc<dyn LanguageIdentifier>) -> Self {
        Self { cfg, identifier }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.cfg
    }

    /// Returns the language of `text`. Never fails.
    pub fn detect_language(&self, text: &str) -> Language {
        if text.trim().chars().count() < self.cfg.min_chars {
            debug!("text too short for reliable language detection, assuming en");
            return Language::En;
        }

        let prepared = prepare_for_detection(text);
        if prepared.is_empty() {
            return Language::En;
        }

        match self.identifier.identify(&prepared) {
            Ok(guesses) => {
                let Some(best) = guesses.first() else {
                    return Language::En;
                };
                match Language::from_code(&best.code) {
                    Some(lang) => {
                        debug!(language = lang.name(), "detected language");
                        lang
                    }
                    None => {
                        debug!(code = %best.code, "unsupported language detected, defaulting to en");
                        Language::En
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "language detection failed, defaulting to en");
                Language::En
            }
        }
    }

    /// Probabilities for the supported languages only.
    ///
    /// Falls back to `{en: 1.0}` when nothing supported was identified or the
    /// identifier failed.
    pub fn language_confidence(&self, text: &str) -> LanguageScores {
        let english_only = || LanguageScores::from([(Language::En, 1.0)]);

        let prepared = prepare_for_detection(text);
        if prepared.is_empty() {
            return english_only();
        }

        match self.identifier.identify(&prepared) {
            Ok(guesses) => {
                let scores: LanguageScores = guesses
                    .iter()
                    .filter_map(|g| Language::from_code(&g.code).map(|lang| (lang, g.probability)))
                    .collect();
                if scores.is_empty() {
                    english_only()
                } else {
                    scores
                }
            }
            Err(err) => {
                warn!(error = %err, "language confidence detection failed");
                english_only()
            }
        }
    }

    pub fn is_hindi(&self, text: &str) -> bool {
        self.detect_language(text) == Language::Hi
    }

    pub fn is_english(&self, text: &str) -> bool {
        self.detect_language(text) == Language::En
    }
}

/// Drops URLs, `@` tokens and symbols so they do not sway the vote.
fn prepare_for_detection(text: &str) -> String {
    let text = URL.replace_all(text, "");
    let text = AT_TOKEN.replace_all(&text, "");
    let text = NON_WORD.replace_all(&text, " ");
    collapse_whitespace(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingIdentifier;

    impl LanguageIdentifier for FailingIdentifier {
        fn identify(&self, _text: &str) -> Result<Vec<LanguageGuess>, DetectionError> {
            Err(DetectionError::Identifier("model not loaded".into()))
        }
    }

    struct FixedIdentifier(&'static str);

    impl LanguageIdentifier for FixedIdentifier {
        fn identify(&self, _text: &str) -> Result<Vec<LanguageGuess>, DetectionError> {
            Ok(vec![LanguageGuess {
                code: self.0.into(),
                probability: 0.99,
            }])
        }
    }

    #[test]
    fn english_sentence() {
        let detector = LanguageDetector::default();
        assert_eq!(detector.detect_language("Server is down"), Language::En);
        assert_eq!(
            detector.detect_language("The server is down and users cannot access email"),
            Language::En
        );
    }

    #[test]
    fn hindi_sentence() {
        let detector = LanguageDetector::default();
        assert_eq!(detector.detect_language("सर्वर डाउन है"), Language::Hi);
        assert_eq!(
            detector.detect_language("सर्वर डाउन है और कोई भी ईमेल एक्सेस नहीं कर सकता"),
            Language::Hi
        );
    }

    #[test]
    fn short_and_empty_text_is_english() {
        let detector = LanguageDetector::with_identifier(
            DetectorConfig::default(),
            Arc::new(FixedIdentifier("hi")),
        );
        // Below the floor the identifier is never consulted.
        assert_eq!(detector.detect_language("hi"), Language::En);
        assert_eq!(detector.detect_language("  है "), Language::En);
        assert_eq!(detector.detect_language(""), Language::En);
    }

    #[test]
    fn unsupported_codes_coerce_to_english() {
        let detector = LanguageDetector::with_identifier(
            DetectorConfig::default(),
            Arc::new(FixedIdentifier("fr")),
        );
        assert_eq!(detector.detect_language("le serveur est en panne"), Language::En);

        let detector = LanguageDetector::default();
        assert_eq!(detector.detect_language("сервер не работает"), Language::En);
    }

    #[test]
    fn identifier_failure_defaults_to_english() {
        let detector = LanguageDetector::with_identifier(
            DetectorConfig::default(),
            Arc::new(FailingIdentifier),
        );
        assert_eq!(detector.detect_language("सर्वर डाउन है"), Language::En);
    }

    #[test]
    fn digits_only_has_no_features() {
        assert_eq!(
            ScriptIdentifier.identify("404 500"),
            Err(DetectionError::NoFeatures)
        );
        assert_eq!(LanguageDetector::default().detect_language("404 500"), Language::En);
    }

    #[test]
    fn symbols_only_is_english() {
        assert_eq!(LanguageDetector::default().detect_language("!!! ??? ..."), Language::En);
    }

    #[test]
    fn urls_and_emails_do_not_vote() {
        let detector = LanguageDetector::default();
        let text = "https://intranet.example.com/status admin@example.com सर्वर डाउन है";
        assert_eq!(detector.detect_language(text), Language::Hi);
    }

    #[test]
    fn mixed_script_follows_majority() {
        let detector = LanguageDetector::default();
        assert_eq!(detector.detect_language("VPN नहीं चल रहा है"), Language::Hi);
        assert_eq!(
            detector.detect_language("VPN connection keeps dropping, बहुत"),
            Language::En
        );
    }

    #[test]
    fn confidence_map_is_restricted_to_supported() {
        let detector = LanguageDetector::default();
        let scores = detector.language_confidence("VPN नहीं");
        assert!(scores.contains_key(&Language::Hi));
        assert!(scores.contains_key(&Language::En));
        let total: f64 = scores.values().sum();
        assert!((total - 1.0).abs() < 1e-9);

        let fallback = detector.language_confidence("сервер");
        assert_eq!(fallback, LanguageScores::from([(Language::En, 1.0)]));
    }

    #[test]
    fn helpers_agree_with_detection() {
        let detector = LanguageDetector::default();
        assert!(detector.is_hindi("पासवर्ड रीसेट चाहिए"));
        assert!(detector.is_english("Need password reset"));
    }

    #[test]
    fn language_codes_round_trip() {
        for lang in Language::ALL {
            assert_eq!(Language::from_code(lang.as_str()), Some(lang));
            assert_eq!(lang.to_string().parse::<Language>().unwrap(), lang);
        }
        assert_eq!(serde_json::to_string(&Language::Hi).unwrap(), "\"hi\"");
        assert!("fr".parse::<Language>().is_err());
    }
}
