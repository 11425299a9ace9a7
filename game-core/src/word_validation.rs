use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use rand::seq::IndexedRandom;

/// Where answers come from and which guesses count as words.
pub trait WordSource: Send + Sync {
    /// Pick an answer for a new round.
    fn random_word(&self) -> String;

    /// Whether `word` is in the dictionary. Callers normalize first.
    fn is_valid_word(&self, word: &str) -> bool;

    fn word_length(&self) -> usize;
}

/// Dictionary loaded from a plain text list, one word per line.
pub struct WordList {
    words: Vec<String>,
    lookup: HashSet<String>,
    length: usize,
}

impl WordList {
    /// Build a list from text. Blank lines and `#` comments are skipped,
    /// words are lowercased, and only alphabetic words of `length` letters
    /// are kept.
    pub fn from_word_list(word_list: &str, length: usize) -> Result<Self> {
        let mut words = Vec::new();
        let mut lookup = HashSet::new();

        for line in word_list.lines() {
            let word = line.trim();
            if word.is_empty() || word.starts_with('#') {
                continue;
            }

            let word = word.to_lowercase();
            if word.chars().count() != length || !word.chars().all(char::is_alphabetic) {
                continue;
            }

            if lookup.insert(word.clone()) {
                words.push(word);
            }
        }

        if words.is_empty() {
            return Err(anyhow!("No words available of length {}", length));
        }

        Ok(Self {
            words,
            lookup,
            length,
        })
    }

    pub fn from_file(path: impl AsRef<Path>, length: usize) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read word list {}", path.display()))?;
        Self::from_word_list(&contents, length)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl WordSource for WordList {
    fn random_word(&self) -> String {
        // The list is never empty once constructed
        self.words
            .choose(&mut rand::rng())
            .cloned()
            .unwrap_or_default()
    }

    fn is_valid_word(&self, word: &str) -> bool {
        self.lookup.contains(word)
    }

    fn word_length(&self) -> usize {
        self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_list() {
        let list = WordList::from_word_list("apple\nangle\ncherry\n# comment\n\nhouse", 5).unwrap();

        assert_eq!(list.len(), 3);
        assert_eq!(list.word_length(), 5);
        assert!(list.is_valid_word("apple"));
        assert!(list.is_valid_word("house"));
        // Wrong length
        assert!(!list.is_valid_word("cherry"));
        assert!(!list.is_valid_word("zzzzz"));
    }

    #[test]
    fn test_words_are_normalized() {
        let list = WordList::from_word_list("  APPLE \n\tMiXeD\napple", 5).unwrap();

        assert_eq!(list.len(), 2);
        assert!(list.is_valid_word("apple"));
        assert!(list.is_valid_word("mixed"));
        // Lookups expect normalized input
        assert!(!list.is_valid_word("APPLE"));
    }

    #[test]
    fn test_non_alphabetic_words_are_skipped() {
        let list = WordList::from_word_list("apple\nte5ts\nab-cd\nhi_yo\nhouse", 5).unwrap();

        assert_eq!(list.len(), 2);
        assert!(!list.is_valid_word("te5ts"));
        assert!(!list.is_valid_word("ab-cd"));
    }

    #[test]
    fn test_empty_word_list() {
        let result = WordList::from_word_list("", 5);
        assert!(result.is_err());

        let result = WordList::from_word_list("# only comments\ncherry\n", 5);
        assert!(
            result
                .err()
                .map(|e| e.to_string().contains("No words available"))
                .unwrap_or(false)
        );
    }

    #[test]
    fn test_random_word_comes_from_list() {
        let list = WordList::from_word_list("apple\nangle\nhouse", 5).unwrap();

        for _ in 0..20 {
            let word = list.random_word();
            assert!(list.is_valid_word(&word));
            assert_eq!(word.len(), 5);
        }
    }

    #[test]
    fn test_missing_file() {
        let result = WordList::from_file("/nonexistent/words.txt", 5);
        assert!(result.is_err());
    }
}
