//! Compiled regexes shared by the detector and the cleaner.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::lexicon::IT_TERM_REWRITES;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid built-in pattern {pattern:?}: {err}"))
}

pub(crate) static HTML_TAG: Lazy<Regex> = Lazy::new(|| compile(r"<[^>]+>"));
pub(crate) static EXCLAMATION_RUN: Lazy<Regex> = Lazy::new(|| compile(r"!{2,}"));
pub(crate) static QUESTION_RUN: Lazy<Regex> = Lazy::new(|| compile(r"\?{2,}"));
pub(crate) static ELLIPSIS_RUN: Lazy<Regex> = Lazy::new(|| compile(r"\.{3,}"));
pub(crate) static CURLY_DOUBLE_QUOTE: Lazy<Regex> =
    Lazy::new(|| compile("[\u{201C}\u{201D}\u{201E}\u{201F}\u{2033}]"));
pub(crate) static CURLY_SINGLE_QUOTE: Lazy<Regex> =
    Lazy::new(|| compile("[\u{2018}\u{2019}\u{201A}\u{201B}\u{2032}]"));

pub(crate) static URL: Lazy<Regex> = Lazy::new(|| compile(r"(?i)https?://\S+"));
pub(crate) static WWW_URL: Lazy<Regex> = Lazy::new(|| compile(r"(?i)www\.\S+"));
/// Address with a dotted domain; the cleaner's stricter form.
pub(crate) static EMAIL: Lazy<Regex> = Lazy::new(|| compile(r"\S+@\S+\.\S+"));
/// Anything around an `@`; the detector drops these before classifying.
pub(crate) static AT_TOKEN: Lazy<Regex> = Lazy::new(|| compile(r"\S+@\S+"));
/// Characters that are neither word, whitespace, nor Devanagari.
pub(crate) static NON_WORD: Lazy<Regex> =
    Lazy::new(|| compile(r"[^\w\s\x{0900}-\x{097F}]"));

/// Whole-word jargon patterns. Words of a multi-word term may be separated
/// by any run of whitespace or punctuation, so "sign-in" matches "sign in".
pub(crate) static IT_TERMS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    IT_TERM_REWRITES
        .iter()
        .map(|(term, replacement)| {
            let body = term
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"[\s\p{P}]+");
            (compile(&format!(r"(?i)\b{body}\b")), *replacement)
        })
        .collect()
});
