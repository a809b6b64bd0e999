//! Block serialization — a self-contained binary artifact holding an
//! ordered sequence of `(term, postings)` pairs.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpindexError};
use crate::storage::{Checksum, ChecksumType};

use super::posting::PostingsEntry;

/// An in-memory, term-ordered block. Construction via [`Block::new`]
/// requires the caller to have already sorted `entries` by term; readers
/// may rely on that order for binary search.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Block {
    entries: Vec<(String, PostingsEntry)>,
}

impl Block {
    /// Builds a block from entries the caller guarantees are term-sorted.
    /// Debug builds verify the ordering; release builds trust the caller
    /// per this component's writer contract.
    pub fn new(entries: Vec<(String, PostingsEntry)>) -> Self {
        debug_assert!(
            entries.windows(2).all(|w| w[0].0 < w[1].0),
            "block entries must be strictly ascending by term"
        );
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first_term(&self) -> Option<&str> {
        self.entries.first().map(|(t, _)| t.as_str())
    }

    pub fn last_term(&self) -> Option<&str> {
        self.entries.last().map(|(t, _)| t.as_str())
    }

    pub fn entries(&self) -> &[(String, PostingsEntry)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(String, PostingsEntry)> {
        self.entries
    }

    /// Binary searches this block's sorted term list for an exact match.
    pub fn lookup(&self, term: &str) -> Option<&PostingsEntry> {
        self.entries
            .binary_search_by(|(t, _)| t.as_str().cmp(term))
            .ok()
            .map(|idx| &self.entries[idx].1)
    }
}

/// Writes blocks as `[checksum: u32 LE][bincode payload]`.
pub struct BlockWriter {
    checksum_type: ChecksumType,
}

impl BlockWriter {
    pub fn new(checksum_type: ChecksumType) -> Self {
        Self { checksum_type }
    }

    pub fn write(&self, path: impl AsRef<Path>, block: &Block) -> Result<()> {
        let payload = bincode::serialize(block)?;
        let checksum = Checksum::compute(self.checksum_type, &payload);

        let mut out = Vec::with_capacity(4 + payload.len());
        out.extend_from_slice(&checksum.to_le_bytes());
        out.extend_from_slice(&payload);

        let tmp_path = tmp_sibling(path.as_ref());
        fs::write(&tmp_path, &out)?;
        fs::rename(&tmp_path, path.as_ref())?;
        Ok(())
    }
}

/// Reads blocks written by [`BlockWriter`], verifying the checksum unless
/// the caller passes [`ChecksumType::None`].
pub struct BlockReader {
    checksum_type: ChecksumType,
}

impl BlockReader {
    pub fn new(checksum_type: ChecksumType) -> Self {
        Self { checksum_type }
    }

    pub fn read(&self, path: impl AsRef<Path>) -> Result<Block> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        if bytes.len() < 4 {
            return Err(SpindexError::Corruption(format!(
                "block file too short: {}",
                path.display()
            )));
        }
        let stored_checksum = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let payload = &bytes[4..];

        Checksum::verify(self.checksum_type, payload, stored_checksum).map_err(|e| {
            SpindexError::Corruption(format!("checksum failure in {}: {e}", path.display()))
        })?;

        let block: Block = bincode::deserialize(payload)?;
        if !block.entries.windows(2).all(|w| w[0].0 < w[1].0) {
            return Err(SpindexError::Corruption(format!(
                "block {} violates ascending-term invariant",
                path.display()
            )));
        }
        Ok(block)
    }
}

fn tmp_sibling(path: &Path) -> std::path::PathBuf {
    let mut tmp = path.to_path_buf();
    let file_name = tmp
        .file_name()
        .map(|n| format!("{}.tmp", n.to_string_lossy()))
        .unwrap_or_else(|| "block.tmp".to_string());
    tmp.set_file_name(file_name);
    tmp
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block() -> Block {
        Block::new(vec![
            ("hello".to_string(), vec![(1, 2)]),
            ("world".to_string(), vec![(1, 1), (2, 1)]),
        ])
    }

    #[test]
    fn lookup_hits_and_misses() {
        let block = sample_block();
        assert_eq!(block.lookup("hello"), Some(&vec![(1, 2)]));
        assert_eq!(block.lookup("world"), Some(&vec![(1, 1), (2, 1)]));
        assert_eq!(block.lookup("peace"), None);
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("block_0.bin");
        let block = sample_block();

        BlockWriter::new(ChecksumType::Crc32)
            .write(&path, &block)
            .unwrap();
        let loaded = BlockReader::new(ChecksumType::Crc32).read(&path).unwrap();
        assert_eq!(loaded, block);
    }

    #[test]
    fn detects_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("block_0.bin");
        BlockWriter::new(ChecksumType::Crc32)
            .write(&path, &sample_block())
            .unwrap();

        let mut bytes = fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        fs::write(&path, bytes).unwrap();

        let err = BlockReader::new(ChecksumType::Crc32).read(&path).unwrap_err();
        assert!(matches!(err, SpindexError::Corruption(_)));
    }

    #[test]
    fn first_last_term_on_empty_block() {
        let block = Block::new(vec![]);
        assert_eq!(block.first_term(), None);
        assert_eq!(block.last_term(), None);
        assert!(block.is_empty());
    }
}
