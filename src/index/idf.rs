//! The IDF table — `term -> log10(N / df(t))`, resident in memory.
//!
//! Derived from the completed final block family (`df(t) = postings(t).len()`)
//! rather than a second independent corpus pass: this keeps IDF and the
//! built index from ever drifting out of sync on `N` or normalization.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::storage::ChecksumType;

use super::block::BlockReader;
use super::lookup::enumerate_final_blocks;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IdfTable {
    idf: HashMap<String, f64>,
    document_count: usize,
}

impl IdfTable {
    /// Builds the table from the final block family already on disk.
    pub fn build_from_blocks(
        index_dir: impl AsRef<Path>,
        document_count: usize,
        checksum_type: ChecksumType,
    ) -> Result<Self> {
        let index_dir = index_dir.as_ref();
        let reader = BlockReader::new(checksum_type);
        let mut idf = HashMap::new();

        for path in enumerate_final_blocks(index_dir)? {
            let block = reader.read(&path)?;
            for (term, postings) in block.entries() {
                let df = postings.len();
                if df == 0 {
                    continue;
                }
                let value = if document_count == 0 {
                    0.0
                } else {
                    (document_count as f64 / df as f64).log10()
                };
                idf.insert(term.clone(), value);
            }
        }

        info!(terms = idf.len(), document_count, "IDF table built");
        Ok(Self {
            idf,
            document_count,
        })
    }

    pub fn get(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    pub fn document_count(&self) -> usize {
        self.document_count
    }

    pub fn len(&self) -> usize {
        self.idf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idf.is_empty()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = bincode::serialize(self)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(bincode::deserialize(&bytes)?)
    }
}

pub fn idf_path(index_dir: &Path) -> PathBuf {
    index_dir.join("idf.bin")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::block::{Block, BlockWriter};

    #[test]
    fn idf_matches_toy_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let writer = BlockWriter::new(ChecksumType::Crc32);
        writer
            .write(
                dir.path().join("block_0.bin"),
                &Block::new(vec![
                    ("hello".to_string(), vec![(1, 2)]),
                    ("peace".to_string(), vec![(2, 1)]),
                    ("world".to_string(), vec![(1, 1), (2, 1)]),
                ]),
            )
            .unwrap();

        let table = IdfTable::build_from_blocks(dir.path(), 2, ChecksumType::Crc32).unwrap();
        assert!((table.get("hello").unwrap() - 2f64.log10()).abs() < 1e-9);
        assert!((table.get("peace").unwrap() - 2f64.log10()).abs() < 1e-9);
        assert_eq!(table.get("world").unwrap(), 0.0);
        assert_eq!(table.get("absent"), None);
    }

    #[test]
    fn save_and_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let writer = BlockWriter::new(ChecksumType::Crc32);
        writer
            .write(
                dir.path().join("block_0.bin"),
                &Block::new(vec![("hello".to_string(), vec![(1, 1)])]),
            )
            .unwrap();
        let table = IdfTable::build_from_blocks(dir.path(), 1, ChecksumType::Crc32).unwrap();

        let path = dir.path().join("idf.bin");
        table.save(&path).unwrap();
        let loaded = IdfTable::load(&path).unwrap();
        assert_eq!(loaded.get("hello"), table.get("hello"));
        assert_eq!(loaded.document_count(), 1);
    }
}
