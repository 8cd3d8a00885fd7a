//! Word lists used by the cleaner.
//!
//! The English list is the NLTK English stopword corpus. The Hindi list is a
//! small curated set of function words. Both are overridable through
//! [`StopwordSource`](crate::StopwordSource).

use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub(crate) const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're",
    "you've", "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he",
    "him", "his", "himself", "she", "she's", "her", "hers", "herself", "it", "it's",
    "its", "itself", "they", "them", "their", "theirs", "themselves", "what",
    "which", "who", "whom", "this", "that", "that'll", "these", "those", "am", "is",
    "are", "was", "were", "be", "been", "being", "have", "has", "had", "having",
    "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about",
    "against", "between", "into", "through", "during", "before", "after", "above",
    "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
    "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some",
    "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too", "very",
    "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn",
    "couldn't", "didn", "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn",
    "hasn't", "haven", "haven't", "isn", "isn't", "ma", "mightn", "mightn't",
    "mustn", "mustn't", "needn", "needn't", "shan", "shan't", "shouldn",
    "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

pub(crate) const HINDI_STOPWORDS: &[&str] = &[
    "और", "का", "के", "की", "को", "से", "में", "पर", "है", "हैं", "था", "थे", "थी",
    "होगा", "होगी", "होंगे", "कि", "जो", "यह", "वह", "इस", "उस", "एक", "दो", "तीन",
    "कुछ", "सब", "कोई", "कहा", "कहे", "कहते", "बहुत", "अधिक", "कम", "ज्यादा",
];

/// IT-domain words that survive stopword removal even when listed.
pub(crate) const PRESERVE_TERMS: &[&str] = &[
    "server", "database", "network", "email", "password", "login", "error", "bug",
    "crash", "slow", "down", "offline", "online", "backup", "restore", "update",
    "install", "uninstall", "virus", "malware", "firewall", "vpn", "wifi",
    "internet", "browser", "application", "software", "hardware", "printer",
    "scanner", "monitor",
];

/// Short words kept by the final length filter.
pub(crate) const SHORT_WHITELIST: &[&str] = &["it", "is", "in", "on", "at", "to", "of", "or", "no"];

/// Whole-word, case-insensitive jargon rewrites applied in order.
pub(crate) const IT_TERM_REWRITES: &[(&str, &str)] = &[
    ("pc", "computer"),
    ("laptop", "computer"),
    ("desktop", "computer"),
    ("wifi", "wireless"),
    ("internet", "network"),
    ("app", "application"),
    ("pwd", "password"),
    ("login", "login"),
    ("logon", "login"),
    ("sign in", "login"),
    ("sign on", "login"),
    ("err", "error"),
    ("bug", "error"),
    ("issue", "problem"),
    ("prob", "problem"),
];

pub(crate) fn builtin_set(words: &[&str]) -> HashSet<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

/// Reads a stopword file: one word per line, `#` starts a comment.
pub(crate) fn read_word_file(path: &Path) -> std::io::Result<HashSet<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect())
}
