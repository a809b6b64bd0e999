//! Build and runtime configuration for the inverted index engine.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, SpindexError};

/// Default number of documents accumulated in memory before a SPIMI flush.
///
/// Named `block_limit` to match the document-count threshold described by
/// the build algorithm: it bounds documents processed, not bytes resident.
pub const DEFAULT_BLOCK_LIMIT: usize = 500;

/// Configuration for one build (and the resulting index's runtime behavior).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Number of documents fed into the in-memory accumulator before a flush.
    pub block_limit: usize,

    /// Apply Snowball English stemming after stop-word filtering.
    pub stem: bool,

    /// Path to a newline-delimited stop-word file. `None` uses only the
    /// fixed punctuation stop-set.
    pub stopwords_path: Option<PathBuf>,

    /// Whether block files carry a CRC32 integrity check on read.
    /// Disabling this is only useful for throughput-sensitive tests.
    pub checksum: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            block_limit: DEFAULT_BLOCK_LIMIT,
            stem: false,
            stopwords_path: None,
            checksum: true,
        }
    }
}

impl IndexConfig {
    /// Config with a custom document-count flush threshold.
    pub fn with_block_limit(block_limit: usize) -> Self {
        Self {
            block_limit,
            ..Self::default()
        }
    }

    /// Config with Snowball stemming enabled.
    pub fn with_stemming(mut self) -> Self {
        self.stem = true;
        self
    }

    /// Config pointing at a stop-word file.
    pub fn with_stopwords(mut self, path: impl Into<PathBuf>) -> Self {
        self.stopwords_path = Some(path.into());
        self
    }

    /// Disable block checksums (tests only; production builds should keep
    /// them on to catch truncated or corrupted block files at query time).
    pub fn without_checksum(mut self) -> Self {
        self.checksum = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.block_limit == 0 {
            return Err(SpindexError::InvalidConfig(
                "block_limit must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
