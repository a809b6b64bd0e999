//! The hierarchical merger — repeated pairwise merges that combine
//! temp blocks into the final, globally-sorted block family.
//!
//! Each level writes its output under a generation-tagged name and only
//! the last level writes final (`block_{k}.bin`) naming. Every level reads
//! the previous generation's files and deletes them once the whole level
//! has been written, so no intermediate level's work is silently discarded
//! by a later level's write — unlike the naive approach of always reading
//! `temp_block_*` and writing `block_*` at every level, which only lets
//! the last level's merge ever take effect.

use std::collections::BTreeMap;
use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::Result;
use crate::storage::ChecksumType;

use super::block::{Block, BlockReader, BlockWriter};
use super::posting::PostingsEntry;
use super::{DocId, TermFrequency};

pub struct Merger {
    index_dir: PathBuf,
    checksum_type: ChecksumType,
}

impl Merger {
    pub fn new(index_dir: impl AsRef<std::path::Path>, checksum_type: ChecksumType) -> Self {
        Self {
            index_dir: index_dir.as_ref().to_path_buf(),
            checksum_type,
        }
    }

    /// Runs `L = max(ceil(log2(total_blocks)), 1)` levels over `total_blocks`
    /// temp blocks, producing `total_blocks` final blocks whose term ranges
    /// are disjoint, ascending, and evenly balanced. A `total_blocks` of
    /// zero is a no-op (empty corpus).
    pub fn merge(&self, total_blocks: usize) -> Result<()> {
        if total_blocks == 0 {
            return Ok(());
        }

        let levels = levels_for(total_blocks);
        let reader = BlockReader::new(self.checksum_type);
        let writer = BlockWriter::new(self.checksum_type);

        for level in 1..=levels {
            let step = 1usize << level;
            info!(level, levels, step, "merge level starting");

            let mut start = 0usize;
            while start < total_blocks {
                let finish = (start + step - 1).min(total_blocks - 1);
                self.merge_run(level, levels, start, finish, &reader, &writer)?;
                start += step;
            }

            self.delete_generation(level - 1, total_blocks)?;
        }

        Ok(())
    }

    fn merge_run(
        &self,
        level: usize,
        levels: usize,
        start: usize,
        finish: usize,
        reader: &BlockReader,
        writer: &BlockWriter,
    ) -> Result<()> {
        // Loading a run's blocks is the I/O- and decode-bound part of a
        // merge; the blocks themselves are independent until folded below,
        // so read them across rayon's thread pool.
        let blocks: Vec<Block> = (start..=finish)
            .into_par_iter()
            .map(|idx| reader.read(self.generation_path(level - 1, levels, idx)))
            .collect::<Result<Vec<_>>>()?;

        let mut combined: BTreeMap<String, PostingsEntry> = BTreeMap::new();
        for block in blocks {
            for (term, postings) in block.into_entries() {
                merge_postings(combined.entry(term).or_default(), postings);
            }
        }

        let n = combined.len();
        let k = finish - start + 1;
        let chunks = balanced_chunks(combined.into_iter().collect(), k);

        debug!(level, start, finish, n, k, "writing merge run");
        for (offset, chunk) in chunks.into_iter().enumerate() {
            let idx = start + offset;
            let path = self.generation_path(level, levels, idx);
            writer.write(&path, &Block::new(chunk))?;
        }
        Ok(())
    }

    fn delete_generation(&self, generation: usize, total_blocks: usize) -> Result<()> {
        if generation == 0 {
            for idx in 0..total_blocks {
                let path = self.index_dir.join(format!("temp_block_{idx}.bin"));
                if path.exists() {
                    std::fs::remove_file(path)?;
                }
            }
        } else {
            for idx in 0..total_blocks {
                let path = self
                    .index_dir
                    .join(format!("merge_l{generation}_block_{idx}.bin"));
                if path.exists() {
                    std::fs::remove_file(path)?;
                }
            }
        }
        Ok(())
    }

    /// Path for generation `generation` (0 = the builder's temp blocks),
    /// under a merge that runs `levels` total levels.
    fn generation_path(&self, generation: usize, levels: usize, idx: usize) -> PathBuf {
        if generation == 0 {
            self.index_dir.join(format!("temp_block_{idx}.bin"))
        } else if generation == levels {
            self.index_dir.join(format!("block_{idx}.bin"))
        } else {
            self.index_dir
                .join(format!("merge_l{generation}_block_{idx}.bin"))
        }
    }
}

fn merge_postings(into: &mut PostingsEntry, from: PostingsEntry) {
    if into.is_empty() {
        *into = from;
        return;
    }
    let mut merged: BTreeMap<DocId, TermFrequency> = into.drain(..).collect();
    for (doc_id, freq) in from {
        *merged.entry(doc_id).or_insert(0) += freq;
    }
    *into = merged.into_iter().collect();
}

/// Partitions `items` into `k` contiguous chunks: the first `n mod k`
/// chunks have size `ceil(n/k)`, the rest `floor(n/k)`.
fn balanced_chunks<T>(items: Vec<T>, k: usize) -> Vec<Vec<T>> {
    let n = items.len();
    let base = n / k;
    let remainder = n % k;

    let mut chunks = Vec::with_capacity(k);
    let mut iter = items.into_iter();
    for i in 0..k {
        let size = if i < remainder { base + 1 } else { base };
        chunks.push(iter.by_ref().take(size).collect());
    }
    chunks
}

pub fn levels_for(total_blocks: usize) -> usize {
    if total_blocks <= 1 {
        return 1;
    }
    (usize::BITS - (total_blocks - 1).leading_zeros()) as usize
}
