//! Ticket text preprocessing.
//!
//! Two stages sit in front of the embedding step:
//!
//! - [`LanguageDetector`] decides whether a ticket is English or Hindi,
//!   falling back to English whenever it is unsure
//! - [`TextCleaner`] strips markup, URLs and emails, rewrites IT jargon,
//!   normalizes whitespace and case, then drops stopwords for the detected
//!   language
//!
//! ## Guarantees
//!
//! - Detection never fails; every failure path answers [`Language::En`]
//! - Cleaning is idempotent: `clean(clean(x)) == clean(x)`
//! - Both stages are pure apart from optional stopword file reads at
//!   construction, so they are safe to share across threads

mod cleaner;
mod config;
mod error;
mod language;
mod lexicon;
mod patterns;
mod stats;
mod whitespace;

pub use crate::cleaner::TextCleaner;
pub use crate::config::{CleanerConfig, DetectorConfig, StopwordSource};
pub use crate::error::{CleanError, DetectionError};
pub use crate::language::{
    Language, LanguageDetector, LanguageGuess, LanguageIdentifier, LanguageScores,
    ScriptIdentifier,
};
pub use crate::stats::{text_stats, TextStats};
pub use crate::whitespace::collapse_whitespace;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_then_clean_hindi_ticket() {
        let detector = LanguageDetector::default();
        let cleaner = TextCleaner::default();
        let text = "सर्वर डाउन है और कोई भी काम नहीं कर सकता";

        let lang = detector.detect_language(text);
        assert_eq!(lang, Language::Hi);
        let cleaned = cleaner.clean_text(text, lang).expect("clean hindi");
        assert!(!cleaned.split(' ').any(|t| t == "है" || t == "और"));
        assert!(cleaned.starts_with("सर्वर डाउन"));
    }

    #[test]
    fn detect_then_clean_english_ticket() {
        let detector = LanguageDetector::default();
        let cleaner = TextCleaner::default();
        let text = "URGENT!!! The email server is down and nobody can send mail";

        let lang = detector.detect_language(text);
        assert_eq!(lang, Language::En);
        let cleaned = cleaner.clean_text(text, lang).expect("clean english");
        assert_eq!(cleaned, "urgent email server down nobody send mail");
    }

    #[test]
    fn configs_round_trip_through_serde() {
        let cfg: CleanerConfig =
            serde_json::from_str(r#"{"hindi_stopwords":"disabled","max_input_chars":200}"#)
                .expect("parse cleaner config");
        assert_eq!(cfg.hindi_stopwords, StopwordSource::Disabled);
        assert_eq!(cfg.max_input_chars, 200);
        assert!(cfg.lowercase);

        let cfg: CleanerConfig =
            serde_json::from_str(r#"{"english_stopwords":{"file":"/etc/stop.txt"}}"#)
                .expect("parse file source");
        assert_eq!(
            cfg.english_stopwords,
            StopwordSource::File("/etc/stop.txt".into())
        );
    }
}
