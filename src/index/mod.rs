//! The on-disk inverted index: accumulation, block serialization, the
//! SPIMI build, hierarchical merge, block lookup, and the IDF table.

pub mod block;
pub mod builder;
pub mod idf;
pub mod lookup;
pub mod merger;
pub mod posting;

/// Opaque document identifier, drawn verbatim from the corpus.
pub type DocId = u64;

/// Number of occurrences of a term within one document.
pub type TermFrequency = u32;

pub use block::{Block, BlockReader, BlockWriter};
pub use builder::SpimiBuilder;
pub use idf::IdfTable;
pub use lookup::BlockLookup;
pub use merger::Merger;
pub use posting::PostingAccumulator;
