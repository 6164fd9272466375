//! Tracking the word being typed and rewriting it on selection.

/// Last whitespace-delimited token of `text`, or `""` when the text has no
/// non-whitespace content.
pub fn last_token(text: &str) -> &str {
    text.split_whitespace().next_back().unwrap_or("")
}

/// Whether a tracked word is long enough to look up. Single characters never are.
pub fn should_suggest(token: &str) -> bool {
    token.chars().count() > 1
}

/// Replace the last token of `text` with `suggestion`.
///
/// The whole document is rebuilt: whitespace runs collapse to single spaces
/// and leading/trailing whitespace is dropped.
pub fn replace_last_token(text: &str, suggestion: &str) -> String {
    let mut words: Vec<&str> = text.split_whitespace().collect();
    words.pop();
    words.push(suggestion);
    words.join(" ")
}
