//! Block lookup — classical binary search over the final block family.

use std::path::{Path, PathBuf};

use regex::Regex;
use std::sync::OnceLock;

use crate::error::Result;
use crate::storage::ChecksumType;

use super::block::BlockReader;
use super::posting::PostingsEntry;

fn final_block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^block_(\d+)\.bin$").expect("static pattern"))
}

/// Enumerates `block_*.bin` in `index_dir`, sorted by block index. This is
/// the authoritative source of truth for the final block count `B` — never
/// cache it across calls.
pub fn enumerate_final_blocks(index_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut indexed: Vec<(u64, PathBuf)> = Vec::new();
    if !index_dir.exists() {
        return Ok(Vec::new());
    }
    for entry in std::fs::read_dir(index_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if let Some(caps) = final_block_pattern().captures(&name) {
            let idx: u64 = caps[1].parse().expect("regex guarantees digits");
            indexed.push((idx, entry.path()));
        }
    }
    indexed.sort_by_key(|(idx, _)| *idx);
    Ok(indexed.into_iter().map(|(_, path)| path).collect())
}

pub struct BlockLookup {
    index_dir: PathBuf,
    reader: BlockReader,
}

impl BlockLookup {
    pub fn new(index_dir: impl AsRef<Path>, checksum_type: ChecksumType) -> Self {
        Self {
            index_dir: index_dir.as_ref().to_path_buf(),
            reader: BlockReader::new(checksum_type),
        }
    }

    /// Looks up `term`, returning its postings or `None` if absent from
    /// every final block.
    pub fn lookup(&self, term: &str) -> Result<Option<PostingsEntry>> {
        let blocks = enumerate_final_blocks(&self.index_dir)?;
        if blocks.is_empty() {
            return Ok(None);
        }

        let mut lo: i64 = 0;
        let mut hi: i64 = blocks.len() as i64 - 1;

        while lo <= hi {
            let mid = ((lo + hi) / 2) as usize;
            let block = self.reader.read(&blocks[mid])?;

            // An empty final block has no term range to compare against;
            // fall back to a linear scan of the whole family.
            let (first, last) = match (block.first_term(), block.last_term()) {
                (Some(f), Some(l)) => (f, l),
                _ => return self.linear_scan(&blocks, term),
            };

            if term < first {
                hi = mid as i64 - 1;
            } else if term > last {
                lo = mid as i64 + 1;
            } else {
                return Ok(block.lookup(term).cloned());
            }
        }

        Ok(None)
    }

    fn linear_scan(&self, blocks: &[PathBuf], term: &str) -> Result<Option<PostingsEntry>> {
        for path in blocks {
            let block = self.reader.read(path)?;
            if let Some(postings) = block.lookup(term) {
                return Ok(Some(postings.clone()));
            }
        }
        Ok(None)
    }
}
