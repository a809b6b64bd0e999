//! The in-memory partial index built by one SPIMI pass.

use std::collections::BTreeMap;

use super::{DocId, TermFrequency};

/// Per-term postings: `doc_id -> frequency`, ascending by `doc_id`.
pub type PostingsEntry = Vec<(DocId, TermFrequency)>;

/// Bounded in-memory `term -> (doc_id -> frequency)` map, cleared on every
/// [`drain_sorted`](Self::drain_sorted) call. Purely in-memory; never
/// persisted directly.
#[derive(Default)]
pub struct PostingAccumulator {
    terms: BTreeMap<String, BTreeMap<DocId, TermFrequency>>,
}

impl PostingAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments `(term, doc_id)`'s frequency by one, creating entries lazily.
    pub fn add(&mut self, term: &str, doc_id: DocId) {
        *self
            .terms
            .entry(term.to_string())
            .or_default()
            .entry(doc_id)
            .or_insert(0) += 1;
    }

    /// Number of distinct terms currently held.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Yields `(term, postings)` pairs in ascending term order, clearing
    /// the accumulator. Postings within each entry are ascending by `doc_id`.
    pub fn drain_sorted(&mut self) -> Vec<(String, PostingsEntry)> {
        std::mem::take(&mut self.terms)
            .into_iter()
            .map(|(term, docs)| (term, docs.into_iter().collect()))
            .collect()
    }
}
