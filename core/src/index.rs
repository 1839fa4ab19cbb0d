use crate::document::{DocumentStatus, ExecutionPolicy};
use crate::error::{Error, Result};
use crate::DocumentId;
use parking_lot::{RwLock, RwLockReadGuard};
use rayon::prelude::*;
use std::collections::{btree_map, BTreeMap};

/// Term frequencies of one term, keyed by document id.
pub type Postings = BTreeMap<DocumentId, f64>;

/// Term frequencies of one document, keyed by term.
pub type TermFrequencies = BTreeMap<String, f64>;

pub type Ids<'a> = std::iter::Copied<btree_map::Keys<'a, DocumentId, DocumentData>>;

static EMPTY_FREQUENCIES: TermFrequencies = BTreeMap::new();

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentData {
    pub rating: i32,
    pub status: DocumentStatus,
    pub text: String,
    pub term_frequencies: TermFrequencies,
}

/// Document store and inverted index kept in lock-step.
///
/// For every `(term, id)` pair in `postings` the document `id` carries `term`
/// with the same frequency, and the other way round. Terms with no documents
/// are pruned. Each term's postings sit behind their own lock so that the
/// parallel removal path can purge distinct terms from several workers.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: BTreeMap<String, RwLock<Postings>>,
    documents: BTreeMap<DocumentId, DocumentData>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    pub fn contains(&self, id: DocumentId) -> bool {
        self.documents.contains_key(&id)
    }

    pub fn document(&self, id: DocumentId) -> Option<&DocumentData> {
        self.documents.get(&id)
    }

    /// Document ids in ascending order.
    pub fn ids(&self) -> Ids<'_> {
        self.documents.keys().copied()
    }

    /// Postings of `term`, read-locked for as long as the guard lives.
    pub fn postings(&self, term: &str) -> Option<RwLockReadGuard<'_, Postings>> {
        self.postings.get(term).map(|postings| postings.read())
    }

    /// Whether `term` occurs in document `id`.
    pub fn term_frequencies(&self, id: DocumentId) -> &TermFrequencies {
        self.documents
            .get(&id)
            .map_or(&EMPTY_FREQUENCIES, |doc| &doc.term_frequencies)
    }

    /// `ln(document_count / containing)`; `containing` must be positive.
    pub fn inverse_document_freq(&self, containing: usize) -> f64 {
        (self.documents.len() as f64 / containing as f64).ln()
    }

    /// Insert an already validated document into both sides of the index.
    pub(crate) fn insert(&mut self, id: DocumentId, data: DocumentData) -> Result<()> {
        if self.documents.contains_key(&id) {
            return Err(Error::DuplicateId(id));
        }
        for (term, &freq) in &data.term_frequencies {
            self.postings
                .entry(term.clone())
                .or_default()
                .get_mut()
                .insert(id, freq);
        }
        self.documents.insert(id, data);
        Ok(())
    }

    /// Remove a document and purge it from every term it appeared in.
    pub(crate) fn remove(&mut self, policy: ExecutionPolicy, id: DocumentId) -> Result<DocumentData> {
        let data = self.documents.remove(&id).ok_or(Error::UnknownId(id))?;
        match policy {
            ExecutionPolicy::Sequential => {
                for term in data.term_frequencies.keys() {
                    if let Some(postings) = self.postings.get_mut(term) {
                        postings.get_mut().remove(&id);
                    }
                }
            }
            ExecutionPolicy::Parallel => {
                let postings = &self.postings;
                data.term_frequencies.par_iter().for_each(|(term, _)| {
                    if let Some(bucket) = postings.get(term) {
                        bucket.write().remove(&id);
                    }
                });
            }
        }
        for term in data.term_frequencies.keys() {
            let drained = self
                .postings
                .get_mut(term)
                .is_some_and(|postings| postings.get_mut().is_empty());
            if drained {
                self.postings.remove(term);
            }
        }
        Ok(data)
    }
}
