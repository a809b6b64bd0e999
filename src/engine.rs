//! The query engine: ties normalization, block lookup, and the IDF table
//! together behind an explicit `Uninitialized -> Building -> Ready ->
//! Queryable` lifecycle, rather than attaching index state (stop-words,
//! IDF, block count) to an implicit global.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, info_span};

use crate::config::IndexConfig;
use crate::error::{Result, SpindexError};
use crate::index::idf::{idf_path, IdfTable};
use crate::index::{BlockLookup, DocId, Merger, SpimiBuilder};
use crate::storage::ChecksumType;
use crate::text::{Normalizer, StandardNormalizer, StopWords};

/// Lifecycle of a [`SearchIndex`]. The public API (`build`/`open`) only
/// ever hands back a `Ready` index — the earlier states exist so the
/// lifecycle is represented in the type, not implied by convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    Uninitialized,
    Building,
    Ready,
    Queryable,
}

#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub doc_id: DocId,
    pub score: f64,
}

pub type QueryResult = Vec<ScoredDocument>;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedConfig {
    config: IndexConfig,
}

fn config_path(index_dir: &Path) -> PathBuf {
    index_dir.join("config.bin")
}

fn checksum_type(config: &IndexConfig) -> ChecksumType {
    if config.checksum {
        ChecksumType::Crc32
    } else {
        ChecksumType::None
    }
}

fn build_normalizer(config: &IndexConfig) -> Result<StandardNormalizer> {
    let stopwords = match &config.stopwords_path {
        Some(path) => StopWords::from_file(path)?,
        None => StopWords::empty(),
    };
    Ok(StandardNormalizer::new(stopwords, config.stem))
}

/// A built, queryable inverted index over one corpus snapshot.
pub struct SearchIndex {
    index_dir: PathBuf,
    config: IndexConfig,
    idf: IdfTable,
    lookup: BlockLookup,
    state: IndexState,
}

impl SearchIndex {
    /// Runs the full build pipeline — SPIMI pass, hierarchical merge, IDF
    /// derivation — and returns a `Ready` index. `documents` is any source
    /// yielding `(DocId, raw_text)` pairs in a stable order.
    pub fn build<I>(index_dir: impl Into<PathBuf>, config: IndexConfig, documents: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<(DocId, String)>>,
    {
        config.validate()?;
        let index_dir = index_dir.into();
        std::fs::create_dir_all(&index_dir)?;

        let checksum_type = checksum_type(&config);
        let normalizer = build_normalizer(&config)?;

        let build_span = info_span!("build", dir = %index_dir.display());
        let _enter = build_span.enter();

        let builder = SpimiBuilder::new(&index_dir, config.block_limit, checksum_type);
        let stats = builder.build(documents, &normalizer)?;
        info!(?stats, "SPIMI pass finished");

        let merger = Merger::new(&index_dir, checksum_type);
        merger.merge(stats.temp_block_count)?;
        info!("hierarchical merge finished");

        let idf = IdfTable::build_from_blocks(&index_dir, stats.document_count, checksum_type)?;
        idf.save(idf_path(&index_dir))?;

        let persisted = PersistedConfig {
            config: config.clone(),
        };
        std::fs::write(config_path(&index_dir), bincode::serialize(&persisted)?)?;

        let lookup = BlockLookup::new(&index_dir, checksum_type);
        info!("index ready");

        Ok(Self {
            index_dir,
            config,
            idf,
            lookup,
            state: IndexState::Ready,
        })
    }

    /// Opens a previously built index directory.
    pub fn open(index_dir: impl Into<PathBuf>) -> Result<Self> {
        let index_dir = index_dir.into();
        let persisted_bytes = std::fs::read(config_path(&index_dir))?;
        let persisted: PersistedConfig = bincode::deserialize(&persisted_bytes)?;
        let config = persisted.config;

        let checksum_type = checksum_type(&config);
        let idf = IdfTable::load(idf_path(&index_dir))?;
        let lookup = BlockLookup::new(&index_dir, checksum_type);

        Ok(Self {
            index_dir,
            config,
            idf,
            lookup,
            state: IndexState::Ready,
        })
    }

    pub fn state(&self) -> IndexState {
        self.state
    }

    pub fn index_dir(&self) -> &Path {
        &self.index_dir
    }

    /// Normalizes `text`, scores every candidate document by cosine
    /// similarity under the TF-IDF vector space model, and returns the
    /// top `k` by descending score.
    pub fn query(&self, text: &str, k: usize) -> Result<QueryResult> {
        if self.state != IndexState::Ready {
            return Err(SpindexError::NotReady(
                "query issued before index reached the Ready state".into(),
            ));
        }

        let normalizer = build_normalizer(&self.config)?;
        let terms = normalizer.normalize(text);

        let mut qtf: HashMap<String, u32> = HashMap::new();
        for term in terms {
            *qtf.entry(term).or_insert(0) += 1;
        }

        // Terms absent from the IDF table contribute zero and incur no lookup.
        let mut query_weights: HashMap<String, f64> = HashMap::new();
        for (term, count) in &qtf {
            if let Some(idf) = self.idf.get(term) {
                let qw = (1.0 + *count as f64).log10() * idf;
                query_weights.insert(term.clone(), qw);
            }
        }

        let qmag2: f64 = query_weights.values().map(|w| w * w).sum();
        let qmag = qmag2.sqrt();

        let mut score: HashMap<DocId, f64> = HashMap::new();
        let mut dmag2: HashMap<DocId, f64> = HashMap::new();

        for (term, qw) in &query_weights {
            let Some(idf) = self.idf.get(term) else {
                continue;
            };
            let Some(postings) = self.lookup.lookup(term)? else {
                continue;
            };
            for (doc_id, freq) in postings {
                let dw = (1.0 + freq as f64).log10() * idf;
                *score.entry(doc_id).or_insert(0.0) += dw * qw;
                *dmag2.entry(doc_id).or_insert(0.0) += dw * dw;
            }
        }

        let mut ranked: Vec<ScoredDocument> = Vec::new();
        if qmag > 0.0 {
            for (doc_id, raw_score) in score {
                let candidate_dmag2 = dmag2.get(&doc_id).copied().unwrap_or(0.0);
                if candidate_dmag2 <= 0.0 {
                    continue;
                }
                let cos = raw_score / (qmag * candidate_dmag2.sqrt());
                ranked.push(ScoredDocument {
                    doc_id,
                    score: cos,
                });
            }
        }

        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(k);
        Ok(ranked)
    }
}
