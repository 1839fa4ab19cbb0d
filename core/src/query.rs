use crate::error::{Error, Result};
use crate::tokenizer::{is_valid_word, split_into_words, StopWords};
use std::collections::BTreeSet;

/// Prefix that turns a query word into an excluded word.
pub const EXCLUSION_MARKER: char = '-';

/// Parsed query. Both sets are ordered, so iteration is deterministic, and a
/// word never sits in both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query<'q> {
    pub plus_words: BTreeSet<&'q str>,
    pub minus_words: BTreeSet<&'q str>,
}

#[derive(Debug, PartialEq, Eq)]
enum QueryWord<'q> {
    Plus(&'q str),
    Minus(&'q str),
}

impl<'q> Query<'q> {
    pub fn parse(text: &'q str, stop_words: &StopWords) -> Result<Self> {
        let mut query = Query::default();
        for word in split_into_words(text) {
            match parse_word(word)? {
                QueryWord::Plus(word) if !stop_words.contains(word) => {
                    query.plus_words.insert(word);
                }
                QueryWord::Minus(word) if !stop_words.contains(word) => {
                    query.minus_words.insert(word);
                }
                _ => {}
            }
        }
        let minus_words = &query.minus_words;
        query.plus_words.retain(|word| !minus_words.contains(word));
        tracing::trace!(
            plus = query.plus_words.len(),
            minus = query.minus_words.len(),
            "parsed query"
        );
        Ok(query)
    }

    pub fn is_empty(&self) -> bool {
        self.plus_words.is_empty() && self.minus_words.is_empty()
    }
}

fn parse_word(word: &str) -> Result<QueryWord<'_>> {
    if !is_valid_word(word) {
        return Err(Error::InvalidTerm(word.to_owned()));
    }
    match word.strip_prefix(EXCLUSION_MARKER) {
        Some(rest) if rest.is_empty() || rest.starts_with(EXCLUSION_MARKER) => {
            Err(Error::MalformedExclusion(word.to_owned()))
        }
        Some(rest) => Ok(QueryWord::Minus(rest)),
        None => Ok(QueryWord::Plus(word)),
    }
}
