use crate::config::SearchConfig;
use crate::document::{DocumentFilter, DocumentStatus, ExecutionPolicy, ScoredDocument};
use crate::error::{Error, Result};
use crate::index::{DocumentData, Ids, InvertedIndex, TermFrequencies};
use crate::query::Query;
use crate::ranking;
use crate::tokenizer::{is_valid_word, StopWords};
use crate::DocumentId;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// In-memory full-text index with TF-IDF ranking.
///
/// Stop words and configuration are fixed at construction. Mutation goes
/// through `&mut self`, so no query can observe a half-applied add or remove.
#[derive(Debug, Default)]
pub struct SearchServer {
    stop_words: StopWords,
    index: InvertedIndex,
    config: SearchConfig,
}

impl SearchServer {
    /// Server whose stop words are the space-separated words of `stop_words`.
    pub fn new(stop_words: &str) -> Result<Self> {
        Self::with_config(StopWords::parse(stop_words)?, SearchConfig::default())
    }

    pub fn from_stop_words<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_config(StopWords::from_words(stop_words)?, SearchConfig::default())
    }

    pub fn with_config(stop_words: StopWords, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { stop_words, index: InvertedIndex::new(), config })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// Index a document. Validation happens before anything is mutated, so a
    /// failed call leaves the server untouched.
    pub fn add_document(
        &mut self,
        id: DocumentId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        if id < 0 {
            return Err(Error::NegativeId(id));
        }
        if self.index.contains(id) {
            return Err(Error::DuplicateId(id));
        }
        let words = self.stop_words.filter(text);
        if let Some(word) = words.iter().find(|word| !is_valid_word(word)) {
            return Err(Error::InvalidTerm((*word).to_owned()));
        }

        let inv_word_count = 1.0 / words.len() as f64;
        let mut term_frequencies = TermFrequencies::new();
        for word in &words {
            *term_frequencies.entry((*word).to_owned()).or_default() += inv_word_count;
        }

        let data = DocumentData {
            rating: average_rating(ratings),
            status,
            text: text.to_owned(),
            term_frequencies,
        };
        tracing::debug!(id, terms = data.term_frequencies.len(), %status, "adding document");
        self.index.insert(id, data)
    }

    pub fn remove_document(&mut self, id: DocumentId) -> Result<()> {
        self.remove_document_with(ExecutionPolicy::Sequential, id)
    }

    /// Remove a document; unknown ids fail with [`Error::UnknownId`].
    pub fn remove_document_with(&mut self, policy: ExecutionPolicy, id: DocumentId) -> Result<()> {
        let removed = self.index.remove(policy, id)?;
        tracing::debug!(id, terms = removed.term_frequencies.len(), ?policy, "removed document");
        Ok(())
    }

    /// Top documents with status [`DocumentStatus::Actual`].
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<ScoredDocument>> {
        self.find_top_documents_with(ExecutionPolicy::Sequential, raw_query, &DocumentStatus::Actual)
    }

    pub fn find_top_documents_by<F>(&self, raw_query: &str, filter: F) -> Result<Vec<ScoredDocument>>
    where
        F: DocumentFilter,
    {
        self.find_top_documents_with(ExecutionPolicy::Sequential, raw_query, &filter)
    }

    pub fn find_top_documents_with<F>(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        filter: &F,
    ) -> Result<Vec<ScoredDocument>>
    where
        F: DocumentFilter + ?Sized,
    {
        let query = Query::parse(raw_query, &self.stop_words)?;
        let mut documents = ranking::find_all_documents(policy, &self.index, &query, filter, &self.config);
        let matched = documents.len();
        ranking::rank(policy, &mut documents, &self.config);
        tracing::trace!(matched, returned = documents.len(), ?policy, "ranked query");
        Ok(documents)
    }

    pub fn match_document(&self, raw_query: &str, id: DocumentId) -> Result<(Vec<String>, DocumentStatus)> {
        self.match_document_with(ExecutionPolicy::Sequential, raw_query, id)
    }

    /// Plus words of `raw_query` present in document `id`, in ascending order,
    /// together with the document status. The word list is empty when any minus
    /// word occurs in the document.
    pub fn match_document_with(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        id: DocumentId,
    ) -> Result<(Vec<String>, DocumentStatus)> {
        let query = Query::parse(raw_query, &self.stop_words)?;
        let doc = self.index.document(id).ok_or(Error::UnknownId(id))?;
        let has_word = |word: &&str| doc.term_frequencies.contains_key(*word);

        let matched: Vec<String> = match policy {
            ExecutionPolicy::Sequential => {
                if query.minus_words.iter().any(has_word) {
                    Vec::new()
                } else {
                    query.plus_words.iter().filter(|w| has_word(w)).map(|w| (*w).to_owned()).collect()
                }
            }
            ExecutionPolicy::Parallel => {
                if query.minus_words.par_iter().any(has_word) {
                    Vec::new()
                } else {
                    query
                        .plus_words
                        .par_iter()
                        .filter(|w| has_word(w))
                        .map(|w| (*w).to_owned())
                        .collect()
                }
            }
        };
        Ok((matched, doc.status))
    }

    pub fn document_count(&self) -> usize {
        self.index.document_count()
    }

    /// Number of distinct indexed terms.
    pub fn term_count(&self) -> usize {
        self.index.term_count()
    }

    /// Term frequencies of document `id`; empty for unknown ids.
    pub fn get_term_frequencies(&self, id: DocumentId) -> &BTreeMap<String, f64> {
        self.index.term_frequencies(id)
    }

    /// Live document ids in ascending order.
    pub fn iter(&self) -> Ids<'_> {
        self.index.ids()
    }

    /// The id at `position` of [`SearchServer::iter`].
    pub fn document_id_at(&self, position: usize) -> Option<DocumentId> {
        self.index.ids().nth(position)
    }

    pub fn document_text(&self, id: DocumentId) -> Option<&str> {
        self.index.document(id).map(|doc| doc.text.as_str())
    }
}

impl<'a> IntoIterator for &'a SearchServer {
    type Item = DocumentId;
    type IntoIter = Ids<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.index.ids()
    }
}

/// Integer mean truncated toward zero; 0 for no ratings.
pub fn average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    (sum / ratings.len() as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_truncates_toward_zero() {
        assert_eq!(average_rating(&[]), 0);
        assert_eq!(average_rating(&[1, 2, 3, 100, -67, 1, 0, 0, 1999]), 226);
        assert_eq!(average_rating(&[-1, -2]), -1);
        assert_eq!(average_rating(&[i32::MAX, i32::MAX]), i32::MAX);
    }

    #[test]
    fn frequencies_accumulate_per_occurrence() {
        let mut server = SearchServer::new("in the").unwrap();
        server.add_document(7, "cat in the cat dog bird", DocumentStatus::Actual, &[]).unwrap();
        let freqs = server.get_term_frequencies(7);
        assert_eq!(freqs.get("cat"), Some(&0.5));
        assert_eq!(freqs.get("dog"), Some(&0.25));
        assert!(!freqs.contains_key("in"));
        let total: f64 = freqs.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn failed_add_leaves_no_trace() {
        let mut server = SearchServer::default();
        assert_eq!(
            server.add_document(1, "good ba\x02d", DocumentStatus::Actual, &[1]),
            Err(Error::InvalidTerm("ba\x02d".into()))
        );
        assert_eq!(server.document_count(), 0);
        assert!(server.get_term_frequencies(1).is_empty());
        assert!(server.find_top_documents("good").unwrap().is_empty());
    }

    #[test]
    fn document_id_at_follows_iteration_order() {
        let mut server = SearchServer::default();
        for id in [5, 1, 3] {
            server.add_document(id, "x", DocumentStatus::Actual, &[]).unwrap();
        }
        assert_eq!(server.iter().collect::<Vec<_>>(), vec![1, 3, 5]);
        assert_eq!(server.document_id_at(1), Some(3));
        assert_eq!(server.document_id_at(3), None);
        assert_eq!((&server).into_iter().count(), 3);
    }
}
