use crate::DocumentId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("document id can't be negative, got {0}")]
    NegativeId(DocumentId),

    #[error("document id {0} already exists")]
    DuplicateId(DocumentId),

    #[error("term {0:?} contains a control character")]
    InvalidTerm(String),

    #[error("malformed exclusion term {0:?}")]
    MalformedExclusion(String),

    #[error("unknown document id {0}")]
    UnknownId(DocumentId),

    #[error("stop word {0:?} contains a control character")]
    InvalidStopWord(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
