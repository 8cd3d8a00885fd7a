use std::borrow::Cow;
use std::collections::HashSet;

use tracing::warn;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::{CleanerConfig, StopwordSource};
use crate::error::CleanError;
use crate::language::Language;
use crate::lexicon::{
    builtin_set, read_word_file, ENGLISH_STOPWORDS, HINDI_STOPWORDS, PRESERVE_TERMS,
    SHORT_WHITELIST,
};
use crate::patterns::{
    CURLY_DOUBLE_QUOTE, CURLY_SINGLE_QUOTE, ELLIPSIS_RUN, EMAIL, EXCLAMATION_RUN, HTML_TAG,
    IT_TERMS, QUESTION_RUN, URL, WWW_URL,
};
use crate::stats::TextStats;
use crate::whitespace::collapse_whitespace;

/// Normalizes raw ticket text before embedding.
///
/// Stages run in a fixed order: markup/punctuation cleanup, URL and email
/// removal, IT jargon rewrites, whitespace collapse, lowercasing, stopword
/// removal, and a final filter on punctuation-only and one-char tokens.
/// The jargon table runs once more on the filtered tokens, since dropping
/// tokens can bring the words of a multi-word term together. Cleaning
/// already-cleaned text is a no-op.
#[derive(Debug, Clone)]
pub struct TextCleaner {
    cfg: CleanerConfig,
    english_stopwords: Option<HashSet<String>>,
    hindi_stopwords: Option<HashSet<String>>,
    preserve: HashSet<&'static str>,
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self {
            cfg: CleanerConfig::default(),
            english_stopwords: Some(builtin_set(ENGLISH_STOPWORDS)),
            hindi_stopwords: Some(builtin_set(HINDI_STOPWORDS)),
            preserve: PRESERVE_TERMS.iter().copied().collect(),
        }
    }
}

impl TextCleaner {
    /// Builds a cleaner, loading any file-backed stopword lists.
    ///
    /// A list that fails to load is logged and left unavailable; cleaning in
    /// that language then skips stopword removal instead of failing.
    pub fn new(cfg: CleanerConfig) -> Result<Self, CleanError> {
        if cfg.max_input_chars == 0 {
            return Err(CleanError::InvalidConfig(
                "max_input_chars must be >= 1".into(),
            ));
        }
        let english_stopwords = load_lexicon(Language::En, &cfg.english_stopwords, ENGLISH_STOPWORDS);
        let hindi_stopwords = load_lexicon(Language::Hi, &cfg.hindi_stopwords, HINDI_STOPWORDS);
        Ok(Self {
            cfg,
            english_stopwords,
            hindi_stopwords,
            preserve: PRESERVE_TERMS.iter().copied().collect(),
        })
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.cfg
    }

    /// Runs the full cleaning pipeline.
    ///
    /// Only oversized input is an error; a missing stopword lexicon degrades
    /// to the pre-stopword text with a warning.
    pub fn clean_text(&self, text: &str, language: Language) -> Result<String, CleanError> {
        let len = text.chars().count();
        if len > self.cfg.max_input_chars {
            return Err(CleanError::InputTooLarge {
                len,
                max: self.cfg.max_input_chars,
            });
        }
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let text = basic_clean(text);
        let text = remove_urls_emails(&text);
        let text = normalize_it_terms(&text);
        let mut text = collapse_whitespace(&text);
        if self.cfg.lowercase {
            text = text.to_lowercase();
        }

        if self.cfg.remove_stopwords {
            match self.remove_stopwords(&text, language) {
                Ok(filtered) => text = filtered,
                Err(err) => {
                    warn!(error = %err, "stopword removal failed, returning unfiltered text");
                    return Ok(text);
                }
            }
        }

        Ok(normalize_it_terms(&final_cleanup(&text)))
    }

    /// Cleans every text with the same language. Oversized entries come back
    /// as empty strings.
    pub fn batch_clean<S: AsRef<str>>(&self, texts: &[S], language: Language) -> Vec<String> {
        texts
            .iter()
            .map(|t| {
                self.clean_text(t.as_ref(), language).unwrap_or_else(|err| {
                    warn!(error = %err, "skipping text in batch clean");
                    String::new()
                })
            })
            .collect()
    }

    pub fn text_stats(&self, text: &str) -> TextStats {
        TextStats::of(text)
    }

    /// Tokenizes on Unicode word boundaries and drops stopwords that are not
    /// IT terms. Punctuation survives as separate tokens for the final pass.
    pub fn remove_stopwords(&self, text: &str, language: Language) -> Result<String, CleanError> {
        let stopwords = match language {
            Language::En => self.english_stopwords.as_ref(),
            Language::Hi => self.hindi_stopwords.as_ref(),
        }
        .ok_or(CleanError::LexiconUnavailable(language))?;

        let kept: Vec<&str> = text
            .split_word_bounds()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .filter(|token| {
                let lower: Cow<str> = if token.chars().any(char::is_uppercase) {
                    Cow::Owned(token.to_lowercase())
                } else {
                    Cow::Borrowed(*token)
                };
                !stopwords.contains(lower.as_ref()) || self.preserve.contains(lower.as_ref())
            })
            .collect();
        Ok(kept.join(" "))
    }
}

fn load_lexicon(
    language: Language,
    source: &StopwordSource,
    builtin: &[&str],
) -> Option<HashSet<String>> {
    match source {
        StopwordSource::Builtin => Some(builtin_set(builtin)),
        StopwordSource::Disabled => None,
        StopwordSource::File(path) => match read_word_file(path) {
            Ok(words) => Some(words),
            Err(err) => {
                warn!(
                    language = language.as_str(),
                    path = %path.display(),
                    error = %err,
                    "failed to load stopword list"
                );
                None
            }
        },
    }
}

fn basic_clean(text: &str) -> String {
    let text = HTML_TAG.replace_all(text, "");
    let text = EXCLAMATION_RUN.replace_all(&text, "!");
    let text = QUESTION_RUN.replace_all(&text, "?");
    let text = ELLIPSIS_RUN.replace_all(&text, "...");
    let text = CURLY_DOUBLE_QUOTE.replace_all(&text, "\"");
    CURLY_SINGLE_QUOTE.replace_all(&text, "'").into_owned()
}

fn remove_urls_emails(text: &str) -> String {
    let text = URL.replace_all(text, "");
    let text = WWW_URL.replace_all(&text, "");
    EMAIL.replace_all(&text, "").into_owned()
}

fn normalize_it_terms(text: &str) -> String {
    let mut out = text.to_string();
    for (pattern, replacement) in IT_TERMS.iter() {
        if pattern.is_match(&out) {
            out = pattern.replace_all(&out, *replacement).into_owned();
        }
    }
    out
}

/// Drops punctuation-only tokens and tokens shorter than two chars that are
/// not whitelisted.
fn final_cleanup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for token in text.split_whitespace() {
        if !token.chars().any(char::is_alphanumeric) {
            continue;
        }
        if token.chars().count() < 2 && !SHORT_WHITELIST.contains(&token.to_lowercase().as_str()) {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn clean(text: &str) -> String {
        TextCleaner::default().clean_text(text, Language::En).unwrap()
    }

    #[test]
    fn strips_html_tags() {
        let out = clean("<p>Server is down</p>");
        assert!(!out.contains("<p>"));
        assert!(!out.contains("</p>"));
        assert_eq!(out, "server down");
    }

    #[test]
    fn removes_urls_and_emails() {
        let out = clean("Check http://example.com/status and www.example.org, or mail admin@company.com for help");
        assert!(!out.contains("example"));
        assert!(!out.contains("admin@company.com"));
        assert_eq!(out, "check mail help");
    }

    #[test]
    fn collapses_whitespace_and_drops_stopwords() {
        assert_eq!(clean("Server    is     down"), "server down");
    }

    #[test]
    fn empty_and_whitespace_give_empty() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("   \t\n"), "");
    }

    #[test]
    fn jargon_is_rewritten_case_insensitively() {
        assert_eq!(clean("My PC has an ISSUE"), "computer problem");
        assert_eq!(clean("cannot sign in, pwd expired"), "cannot login password expired");
        assert_eq!(clean("wifi keeps dropping"), "wireless keeps dropping");
    }

    #[test]
    fn jargon_respects_word_boundaries() {
        assert_eq!(clean("application crashed"), "application crashed");
        assert_eq!(clean("happy problems"), "happy problems");
    }

    #[test]
    fn repeated_punctuation_and_quotes() {
        let cleaner = TextCleaner::new(CleanerConfig {
            remove_stopwords: false,
            ..CleanerConfig::default()
        })
        .unwrap();
        let out = cleaner
            .clean_text("Help!!! Why?? \u{201C}urgent\u{201D} \u{2018}now\u{2019}....", Language::En)
            .unwrap();
        assert_eq!(out, "help! why? \"urgent\" 'now'...");
    }

    #[test]
    fn preserve_terms_survive_stopword_removal() {
        // "down" is an NLTK stopword.
        let out = clean("the database is down again");
        assert_eq!(out, "database down");
    }

    #[test]
    fn standalone_punctuation_and_short_tokens_are_dropped() {
        let cleaner = TextCleaner::new(CleanerConfig {
            remove_stopwords: false,
            ..CleanerConfig::default()
        })
        .unwrap();
        let out = cleaner
            .clean_text("x - printer , is on fire : y", Language::En)
            .unwrap();
        assert_eq!(out, "printer is on fire");
    }

    #[test]
    fn hindi_stopwords_removed() {
        let out = TextCleaner::default()
            .clean_text("सर्वर डाउन है और कोई भी काम नहीं कर सकता", Language::Hi)
            .unwrap();
        assert_eq!(out, "सर्वर डाउन भी काम नहीं कर सकता");
    }

    #[test]
    fn lowercase_can_be_disabled() {
        let cleaner = TextCleaner::new(CleanerConfig {
            lowercase: false,
            ..CleanerConfig::default()
        })
        .unwrap();
        assert_eq!(cleaner.clean_text("The VPN is Down", Language::En).unwrap(), "VPN Down");
    }

    #[test]
    fn oversized_input_is_rejected() {
        let cleaner = TextCleaner::new(CleanerConfig {
            max_input_chars: 10,
            ..CleanerConfig::default()
        })
        .unwrap();
        assert_eq!(
            cleaner.clean_text("printer jammed again", Language::En),
            Err(CleanError::InputTooLarge { len: 20, max: 10 })
        );
    }

    #[test]
    fn zero_input_limit_is_invalid() {
        let res = TextCleaner::new(CleanerConfig {
            max_input_chars: 0,
            ..CleanerConfig::default()
        });
        assert!(matches!(res, Err(CleanError::InvalidConfig(_))));
    }

    #[test]
    fn missing_lexicon_returns_pre_stopword_text() {
        let cleaner = TextCleaner::new(CleanerConfig {
            hindi_stopwords: StopwordSource::Disabled,
            ..CleanerConfig::default()
        })
        .unwrap();
        assert_eq!(
            cleaner.remove_stopwords("सर्वर डाउन है", Language::Hi),
            Err(CleanError::LexiconUnavailable(Language::Hi))
        );
        // Stopwords and short tokens stay because the pipeline stops before them.
        let out = cleaner.clean_text("सर्वर   डाउन है !", Language::Hi).unwrap();
        assert_eq!(out, "सर्वर डाउन है !");
    }

    #[test]
    fn unreadable_stopword_file_disables_language() {
        let cleaner = TextCleaner::new(CleanerConfig {
            english_stopwords: StopwordSource::File("./missing/english.txt".into()),
            ..CleanerConfig::default()
        })
        .unwrap();
        assert_eq!(
            cleaner.clean_text("The server is down", Language::En).unwrap(),
            "the server is down"
        );
    }

    #[test]
    fn stopword_file_replaces_builtin_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "kindly").unwrap();
        writeln!(file, "please").unwrap();
        let cleaner = TextCleaner::new(CleanerConfig {
            english_stopwords: StopwordSource::File(file.path().to_path_buf()),
            ..CleanerConfig::default()
        })
        .unwrap();
        assert_eq!(
            cleaner.clean_text("Please kindly restart the server", Language::En).unwrap(),
            "restart the server"
        );
    }

    #[test]
    fn batch_clean_keeps_positions() {
        let cleaner = TextCleaner::new(CleanerConfig {
            max_input_chars: 30,
            ..CleanerConfig::default()
        })
        .unwrap();
        let out = cleaner.batch_clean(
            &["Server is down", "x".repeat(40).as_str(), "Printer not working"],
            Language::En,
        );
        assert_eq!(out, vec!["server down", "", "printer working"]);
    }

    #[test]
    fn separated_sign_in_forms_are_rewritten() {
        let cleaner = TextCleaner::default();
        assert_eq!(
            cleaner.clean_text("VPN sign-in नहीं हो रहा है", Language::Hi).unwrap(),
            "vpn login नहीं हो रहा"
        );
        assert_eq!(clean("Single sign-on portal rejects me"), "single login portal rejects");
    }

    #[test]
    fn terms_joined_by_dropped_tokens_are_rewritten() {
        let cleaner = TextCleaner::default();
        // Hindi stopwords keep "in"; the length filter drops "x".
        assert_eq!(
            cleaner.clean_text("sign x in नहीं हो रहा", Language::Hi).unwrap(),
            "login नहीं हो रहा"
        );
        let no_english = TextCleaner::new(CleanerConfig {
            remove_stopwords: false,
            ..CleanerConfig::default()
        })
        .unwrap();
        assert_eq!(
            no_english.clean_text("cannot sign - on today", Language::En).unwrap(),
            "cannot login today"
        );
    }

    #[test]
    fn cleaning_is_idempotent() {
        let cleaner = TextCleaner::default();
        let inputs = [
            "<b>URGENT!!!</b> The e-mail server's down... see https://status.example.com",
            "Can't login to the VPN -- pwd reset didn't help (ticket #4521)",
            "सर्वर डाउन है और कोई भी काम नहीं कर सकता।",
            "printer , , jammed ; ; again",
            "VPN sign-in नहीं हो रहा है",
            "sign x in again, sign ; on later",
        ];
        for input in inputs {
            for language in Language::ALL {
                let once = cleaner.clean_text(input, language).unwrap();
                let twice = cleaner.clean_text(&once, language).unwrap();
                assert_eq!(once, twice, "not idempotent for {input:?} as {language}");
            }
        }
    }
}
