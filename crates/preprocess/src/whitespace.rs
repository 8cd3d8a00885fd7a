//! Whitespace normalization.

/// Collapses runs of Unicode whitespace into single ASCII spaces and trims
/// both ends.
///
/// ```rust
/// use preprocess::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  server \t\n down  "), "server down");
/// assert_eq!(collapse_whitespace("   "), "");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(segment);
    }
    normalized
}
