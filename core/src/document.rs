use crate::DocumentId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentStatus::Actual => "actual",
            DocumentStatus::Irrelevant => "irrelevant",
            DocumentStatus::Banned => "banned",
            DocumentStatus::Removed => "removed",
        };
        f.write_str(name)
    }
}

impl FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "actual" => Ok(DocumentStatus::Actual),
            "irrelevant" => Ok(DocumentStatus::Irrelevant),
            "banned" => Ok(DocumentStatus::Banned),
            "removed" => Ok(DocumentStatus::Removed),
            other => Err(format!("unknown document status: {other}")),
        }
    }
}

/// A ranked hit: not the document itself, only what ordering needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub id: DocumentId,
    pub relevance: f64,
    pub rating: i32,
}

impl ScoredDocument {
    pub fn new(id: DocumentId, relevance: f64, rating: i32) -> Self {
        Self { id, relevance, rating }
    }
}

impl fmt::Display for ScoredDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ document_id = {}, relevance = {}, rating = {} }}",
            self.id, self.relevance, self.rating
        )
    }
}

/// Decides per document whether it may appear in a result set.
///
/// Any `Fn(DocumentId, DocumentStatus, i32) -> bool` closure is a filter, and so
/// is a bare [`DocumentStatus`], which keeps documents with exactly that status.
pub trait DocumentFilter: Sync {
    fn accepts(&self, id: DocumentId, status: DocumentStatus, rating: i32) -> bool;
}

impl<F> DocumentFilter for F
where
    F: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
{
    fn accepts(&self, id: DocumentId, status: DocumentStatus, rating: i32) -> bool {
        self(id, status, rating)
    }
}

impl DocumentFilter for DocumentStatus {
    fn accepts(&self, _id: DocumentId, status: DocumentStatus, _rating: i32) -> bool {
        *self == status
    }
}

/// Selects between the single-threaded tier and the rayon-backed tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionPolicy {
    #[default]
    Sequential,
    Parallel,
}
