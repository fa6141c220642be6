//! Word-level helpers used to report how much a correction stage changed.
//!
//! Tokens here are only ever compared, never corrected: a token is a maximal
//! run of ASCII letters and apostrophes, everything else is a separator.

use once_cell::sync::Lazy;
use regex::Regex;

static WORD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z']+").expect("word pattern is a valid regex"));

/// Word token regex shared with the spelling corrector.
pub(crate) fn word_pattern() -> &'static Regex {
    &WORD_PATTERN
}

/// Extract word tokens from `text`, left to right, case preserved.
pub fn tokenize_words(text: &str) -> Vec<&str> {
    WORD_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
}

/// Positional changed-word count between two token sequences.
///
/// Tokens are compared pairwise up to the shorter length and the length
/// difference is added on top. This is not an alignment: a word inserted at
/// the front shifts every later position and each of them counts as changed.
/// Both terms are symmetric, so swapping `before` and `after` never changes
/// the result.
pub fn count_changes<S: AsRef<str>>(before: &[S], after: &[S]) -> usize {
    let substituted = before
        .iter()
        .zip(after.iter())
        .filter(|(a, b)| a.as_ref() != b.as_ref())
        .count();

    substituted + before.len().abs_diff(after.len())
}

/// Tokenize both texts and count the words that differ.
pub fn count_word_changes(before: &str, after: &str) -> usize {
    count_changes(&tokenize_words(before), &tokenize_words(after))
}

/// First `max_chars` characters of `text` for log lines, `...` when cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
