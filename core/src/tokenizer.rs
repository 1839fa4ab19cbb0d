use crate::error::{Error, Result};
use std::collections::BTreeSet;

/// Split text into words on runs of the space character. Other whitespace is
/// part of a word.
pub fn split_into_words(text: &str) -> Vec<&str> {
    text.split(' ').filter(|word| !word.is_empty()).collect()
}

/// A word is valid when it holds no control characters (bytes 0x00..=0x1F).
pub fn is_valid_word(word: &str) -> bool {
    !word.bytes().any(|b| b < 0x20)
}

/// Words excluded from both indexing and querying.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWords {
    words: BTreeSet<String>,
}

impl StopWords {
    /// Build the set from a space-separated list.
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_words(split_into_words(text))
    }

    /// Build the set from any collection of words. Empty words are skipped.
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for word in words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if !is_valid_word(word) {
                return Err(Error::InvalidStopWord(word.to_owned()));
            }
            set.insert(word.to_owned());
        }
        Ok(Self { words: set })
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.words.iter().map(String::as_str)
    }

    /// Tokenize `text`, dropping stop words.
    pub fn filter<'t>(&self, text: &'t str) -> Vec<&'t str> {
        split_into_words(text)
            .into_iter()
            .filter(|word| !self.contains(word))
            .collect()
    }
}
