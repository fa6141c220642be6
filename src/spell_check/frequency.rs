use std::cmp::Ordering;
use std::path::Path;

use tracing::debug;

use super::{FrequencyDictionary, SpellError, SpellingService};
use crate::text::word_pattern;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Longer words are left alone; the edit-distance-2 search grows with the
/// square of the word length.
pub const MAX_CORRECTABLE_LEN: usize = 20;

/// Statistical spelling corrector over a word frequency table.
///
/// For every word the most frequent known candidate wins: the word itself,
/// then anything one edit away, then anything two edits away.
#[derive(Debug, Clone)]
pub struct FrequencySpeller {
    dictionary: FrequencyDictionary,
}

impl FrequencySpeller {
    pub fn new(dictionary: FrequencyDictionary) -> Self {
        Self { dictionary }
    }

    pub fn from_file(path: &Path) -> Result<Self, SpellError> {
        Ok(Self::new(FrequencyDictionary::from_file(path)?))
    }

    pub fn dictionary(&self) -> &FrequencyDictionary {
        &self.dictionary
    }

    /// Correct a single word token, keeping its capitalization and any
    /// surrounding quote apostrophes.
    pub fn correct_word(&self, token: &str) -> String {
        let core = token.trim_matches('\'');
        if core.len() <= 1 || core.len() > MAX_CORRECTABLE_LEN || core.contains('\'') {
            return token.to_string();
        }

        let lower = core.to_ascii_lowercase();
        let Some(candidate) = self.best_candidate(&lower) else {
            return token.to_string();
        };
        if candidate == lower {
            return token.to_string();
        }

        debug!("Spelling: '{}' -> '{}'", core, candidate);
        let start = token.len() - token.trim_start_matches('\'').len();
        let end = start + core.len();
        format!("{}{}{}", &token[..start], restore_case(core, &candidate), &token[end..])
    }

    fn best_candidate(&self, word: &str) -> Option<String> {
        if self.dictionary.contains(word) {
            return Some(word.to_string());
        }

        let first = edits1(word);
        if let Some(best) = self.most_frequent(first.iter().map(String::as_str)) {
            return Some(best.to_string());
        }

        // Second-order edits are generated one batch at a time and never collected.
        self.most_frequent(first.iter().flat_map(|e| edits1(e)))
    }

    /// Highest frequency known word; ties go to the alphabetically first.
    fn most_frequent<S: AsRef<str>>(&self, candidates: impl Iterator<Item = S>) -> Option<S> {
        candidates
            .filter(|c| self.dictionary.contains(c.as_ref()))
            .max_by(|a, b| {
                let (a, b) = (a.as_ref(), b.as_ref());
                match self.dictionary.frequency(a).cmp(&self.dictionary.frequency(b)) {
                    Ordering::Equal => b.cmp(a),
                    other => other,
                }
            })
    }
}

impl SpellingService for FrequencySpeller {
    fn correct(&self, text: &str) -> String {
        let mut corrected = String::with_capacity(text.len());
        let mut last = 0;

        for token in word_pattern().find_iter(text) {
            corrected.push_str(&text[last..token.start()]);
            corrected.push_str(&self.correct_word(token.as_str()));
            last = token.end();
        }
        corrected.push_str(&text[last..]);

        corrected
    }
}

/// All strings one delete, transpose, replace or insert away from `word`.
/// `word` must be ASCII.
fn edits1(word: &str) -> Vec<String> {
    let mut edits = Vec::with_capacity(54 * word.len() + 25);

    for i in 0..=word.len() {
        let (left, right) = word.split_at(i);

        if !right.is_empty() {
            edits.push(format!("{}{}", left, &right[1..]));
        }
        if right.len() > 1 {
            let bytes = right.as_bytes();
            edits.push(format!(
                "{}{}{}{}",
                left,
                bytes[1] as char,
                bytes[0] as char,
                &right[2..]
            ));
        }
        for &c in ALPHABET {
            let c = c as char;
            if !right.is_empty() {
                edits.push(format!("{}{}{}", left, c, &right[1..]));
            }
            edits.push(format!("{}{}{}", left, c, right));
        }
    }

    edits
}

fn restore_case(original: &str, candidate: &str) -> String {
    if original.chars().all(|c| c.is_ascii_uppercase()) {
        return candidate.to_ascii_uppercase();
    }

    let mut chars = original.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {
            let mut capitalized = candidate[..1].to_ascii_uppercase();
            capitalized.push_str(&candidate[1..]);
            capitalized
        }
        _ => candidate.to_string(),
    }
}
