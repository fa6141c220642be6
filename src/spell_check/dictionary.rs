use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use super::SpellError;
use crate::text::tokenize_words;

/// Lowercase word -> occurrence count.
#[derive(Debug, Clone, Default)]
pub struct FrequencyDictionary {
    counts: HashMap<String, u64>,
}

impl FrequencyDictionary {
    /// Load a dictionary file.
    ///
    /// Lines of the form `word count` are frequency entries; any other line
    /// is corpus text and each of its words adds one occurrence.
    pub fn from_file(path: &Path) -> Result<Self, SpellError> {
        if !path.is_file() {
            return Err(SpellError::DictionaryNotFound {
                path: path.display().to_string(),
            });
        }

        let contents = fs::read_to_string(path)?;
        let dictionary = Self::parse(&contents);
        if dictionary.is_empty() {
            return Err(SpellError::EmptyDictionary {
                path: path.display().to_string(),
            });
        }

        Ok(dictionary)
    }

    pub fn parse(contents: &str) -> Self {
        let mut dictionary = Self::default();

        for line in contents.lines() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if let [word, count] = fields.as_slice() {
                let has_letters = word.chars().any(|c| c.is_ascii_alphabetic());
                if let (true, Ok(count)) = (has_letters, count.parse::<u64>()) {
                    dictionary.add(word, count);
                    continue;
                }
            }
            for word in tokenize_words(line) {
                dictionary.add(word, 1);
            }
        }

        debug!("Parsed frequency dictionary with {} entries", dictionary.len());
        dictionary
    }

    pub fn from_counts<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let mut dictionary = Self::default();
        for (word, count) in entries {
            dictionary.add(word.as_ref(), count);
        }
        dictionary
    }

    fn add(&mut self, word: &str, count: u64) {
        let word = word.trim_matches('\'').to_lowercase();
        if word.is_empty() {
            return;
        }
        *self.counts.entry(word).or_insert(0) += count;
    }

    /// Occurrence count of an already lowercased word, 0 when unknown.
    pub fn frequency(&self, word: &str) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.counts.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_frequency_lines() {
        let dictionary = FrequencyDictionary::parse("the 23135851162\nof 13151942776\n");
        assert_eq!(dictionary.len(), 2);
        assert_eq!(dictionary.frequency("the"), 23135851162);
    }

    #[test]
    fn test_parse_corpus_lines() {
        let dictionary = FrequencyDictionary::parse("The cat saw the dog.\nI have 3 cats");
        assert_eq!(dictionary.frequency("the"), 2);
        assert_eq!(dictionary.frequency("cats"), 1);
        assert!(!dictionary.contains("3"));
    }

    #[test]
    fn test_parse_mixed_and_repeated_entries() {
        let dictionary = FrequencyDictionary::parse("Apple 5\napple 2\n'quoted' words\n");
        assert_eq!(dictionary.frequency("apple"), 7);
        assert_eq!(dictionary.frequency("quoted"), 1);
    }

    #[test]
    fn test_unknown_word_frequency_is_zero() {
        let dictionary = FrequencyDictionary::from_counts([("known", 3)]);
        assert_eq!(dictionary.frequency("unknown"), 0);
        assert!(dictionary.contains("known"));
    }

    #[test]
    fn test_from_file_missing() {
        let temp_dir = TempDir::new().unwrap();
        let result = FrequencyDictionary::from_file(&temp_dir.path().join("nope.txt"));
        match result {
            Err(SpellError::DictionaryNotFound { path }) => assert!(path.contains("nope.txt")),
            other => panic!("Expected DictionaryNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_from_file_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.txt");
        fs::write(&path, "123 456\n...\n").unwrap();

        let result = FrequencyDictionary::from_file(&path);
        assert!(matches!(result, Err(SpellError::EmptyDictionary { .. })));
    }
}
