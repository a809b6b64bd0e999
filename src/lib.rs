//! spindex — a disk-resident SPIMI inverted index with TF-IDF/cosine ranking.
//!
//! Builds an on-disk, sorted family of postings blocks from a document
//! corpus via single-pass in-memory indexing (SPIMI), then answers
//! free-text queries by block-binary-search lookup and a TF-IDF / cosine
//! similarity ranking over the matching postings.
//!
//! ## Pipeline
//! - [`text`] — normalizes raw document text into index terms.
//! - [`corpus`] — reads a document source into `(DocId, String)` pairs.
//! - [`index`] — accumulates, flushes, merges, and serves postings blocks.
//! - [`engine`] — ties it together: `SearchIndex::build` / `::open` / `::query`.

pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod index;
pub mod storage;
pub mod text;

pub use config::IndexConfig;
pub use engine::{QueryResult, SearchIndex};
pub use error::{Result, SpindexError};
pub use index::DocId;
