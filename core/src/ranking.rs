//! TF-IDF ranking over an [`InvertedIndex`].
//!
//! Both tiers accumulate every plus word before any minus word is applied, so an
//! excluded word always purges a document no matter which word scored it.

use crate::concurrent_map::ConcurrentMap;
use crate::config::SearchConfig;
use crate::document::{DocumentFilter, ExecutionPolicy, ScoredDocument};
use crate::index::InvertedIndex;
use crate::query::Query;
use crate::DocumentId;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Every document matching `query` and accepted by `filter`, in id order.
pub fn find_all_documents<F>(
    policy: ExecutionPolicy,
    index: &InvertedIndex,
    query: &Query<'_>,
    filter: &F,
    config: &SearchConfig,
) -> Vec<ScoredDocument>
where
    F: DocumentFilter + ?Sized,
{
    let relevance = match policy {
        ExecutionPolicy::Sequential => accumulate_sequential(index, query, filter),
        ExecutionPolicy::Parallel => accumulate_parallel(index, query, filter, config.shard_count),
    };
    relevance
        .into_iter()
        .filter_map(|(id, relevance)| {
            index
                .document(id)
                .map(|doc| ScoredDocument::new(id, relevance, doc.rating))
        })
        .collect()
}

fn accumulate_sequential<F>(index: &InvertedIndex, query: &Query<'_>, filter: &F) -> BTreeMap<DocumentId, f64>
where
    F: DocumentFilter + ?Sized,
{
    let mut relevance: BTreeMap<DocumentId, f64> = BTreeMap::new();
    for word in &query.plus_words {
        let Some(postings) = index.postings(word) else {
            continue;
        };
        let idf = index.inverse_document_freq(postings.len());
        for (&id, &tf) in postings.iter() {
            let Some(doc) = index.document(id) else {
                continue;
            };
            if filter.accepts(id, doc.status, doc.rating) {
                *relevance.entry(id).or_default() += idf * tf;
            }
        }
    }
    for word in &query.minus_words {
        if let Some(postings) = index.postings(word) {
            for id in postings.keys() {
                relevance.remove(id);
            }
        }
    }
    relevance
}

fn accumulate_parallel<F>(
    index: &InvertedIndex,
    query: &Query<'_>,
    filter: &F,
    shard_count: usize,
) -> BTreeMap<DocumentId, f64>
where
    F: DocumentFilter + ?Sized,
{
    // Partial scores are tagged with the word's position and summed in that
    // order afterwards, so every document's total matches the sequential tier.
    let partials: ConcurrentMap<DocumentId, Vec<(usize, f64)>> = ConcurrentMap::new(shard_count);
    let plus_words: Vec<&str> = query.plus_words.iter().copied().collect();
    plus_words.par_iter().enumerate().for_each(|(position, word)| {
        let Some(postings) = index.postings(word) else {
            return;
        };
        let idf = index.inverse_document_freq(postings.len());
        for (&id, &tf) in postings.iter() {
            let Some(doc) = index.document(id) else {
                continue;
            };
            if filter.accepts(id, doc.status, doc.rating) {
                partials.access(id).push((position, idf * tf));
            }
        }
    });
    query.minus_words.par_iter().for_each(|word| {
        if let Some(postings) = index.postings(word) {
            for &id in postings.keys() {
                partials.erase(id);
            }
        }
    });
    partials
        .into_ordinary_map()
        .into_iter()
        .map(|(id, mut parts)| {
            parts.sort_unstable_by_key(|&(position, _)| position);
            (id, parts.into_iter().fold(0.0, |total, (_, score)| total + score))
        })
        .collect()
}

/// Descending relevance bucket, then descending rating, then ascending id.
///
/// Relevances are bucketed by `floor(relevance / epsilon)`, so two hits in the
/// same bucket are never more than `epsilon` apart and the order stays total.
/// An `epsilon` of zero compares raw relevances.
pub fn compare_scored(lhs: &ScoredDocument, rhs: &ScoredDocument, epsilon: f64) -> Ordering {
    relevance_bucket(rhs.relevance, epsilon)
        .total_cmp(&relevance_bucket(lhs.relevance, epsilon))
        .then_with(|| rhs.rating.cmp(&lhs.rating))
        .then_with(|| lhs.id.cmp(&rhs.id))
}

fn relevance_bucket(relevance: f64, epsilon: f64) -> f64 {
    if epsilon > 0.0 {
        (relevance / epsilon).floor()
    } else {
        relevance
    }
}

/// Order `documents` for presentation and cut them to the result cap.
pub fn rank(policy: ExecutionPolicy, documents: &mut Vec<ScoredDocument>, config: &SearchConfig) {
    let epsilon = config.relevance_epsilon;
    match policy {
        ExecutionPolicy::Sequential => documents.sort_by(|lhs, rhs| compare_scored(lhs, rhs, epsilon)),
        ExecutionPolicy::Parallel => documents.par_sort_by(|lhs, rhs| compare_scored(lhs, rhs, epsilon)),
    }
    documents.truncate(config.max_result_count);
}
