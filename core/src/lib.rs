//! In-memory full-text search over short documents.
//!
//! Documents carry an integer id, a [`DocumentStatus`] and a list of ratings.
//! Queries are space-separated words; a word prefixed with `-` excludes every
//! document containing it. Hits are ranked by TF-IDF, ties broken by rating.
//!
//! ## Modules
//! - **`tokenizer`**: word splitting, word validation and the stop-word set.
//! - **`query`**: turns raw query text into plus and minus word sets.
//! - **`index`**: the document store and inverted index, kept consistent.
//! - **`ranking`**: TF-IDF accumulation, sorting and truncation, in a sequential
//!   and a rayon-backed tier.
//! - **`concurrent_map`**: the lock-striped accumulator behind the parallel tier.
//! - **`server`**: [`SearchServer`], the public entry point.
//! - **`paginator`**, **`request_queue`**, **`dedup`**, **`batch`**: helpers built
//!   only on the public [`SearchServer`] API.

pub mod batch;
pub mod concurrent_map;
pub mod config;
pub mod dedup;
pub mod document;
pub mod error;
pub mod index;
pub mod paginator;
pub mod query;
pub mod ranking;
pub mod request_queue;
pub mod server;
pub mod tokenizer;

pub type DocumentId = i32;

pub use batch::{process_queries, process_queries_joined};
pub use concurrent_map::ConcurrentMap;
pub use config::SearchConfig;
pub use dedup::remove_duplicates;
pub use document::{DocumentFilter, DocumentStatus, ExecutionPolicy, ScoredDocument};
pub use error::{Error, Result};
pub use paginator::{paginate, Page, Paginator};
pub use request_queue::RequestQueue;
pub use server::SearchServer;
pub use tokenizer::StopWords;
