//! The SPIMI builder — streams tokenized documents into a bounded
//! accumulator, flushing sorted temp blocks to disk.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::Result;
use crate::storage::ChecksumType;
use crate::text::Normalizer;

use super::block::{Block, BlockWriter};
use super::posting::PostingAccumulator;
use super::DocId;

/// Result of one SPIMI pass: how many temp blocks were produced and how
/// many documents (including ones with no surviving tokens) were seen.
#[derive(Debug, Clone, Copy)]
pub struct BuildStats {
    pub temp_block_count: usize,
    pub document_count: usize,
}

pub struct SpimiBuilder {
    index_dir: PathBuf,
    block_limit: usize,
    checksum_type: ChecksumType,
}

impl SpimiBuilder {
    pub fn new(index_dir: impl AsRef<Path>, block_limit: usize, checksum_type: ChecksumType) -> Self {
        Self {
            index_dir: index_dir.as_ref().to_path_buf(),
            block_limit,
            checksum_type,
        }
    }

    fn temp_block_path(&self, k: usize) -> PathBuf {
        self.index_dir.join(format!("temp_block_{k}.bin"))
    }

    /// Streams `documents` through `normalizer`, flushing a temp block every
    /// `block_limit` documents, plus a final flush for any remainder.
    pub fn build<I>(&self, documents: I, normalizer: &dyn Normalizer) -> Result<BuildStats>
    where
        I: IntoIterator<Item = Result<(DocId, String)>>,
    {
        std::fs::create_dir_all(&self.index_dir)?;

        let writer = BlockWriter::new(self.checksum_type);
        let mut accumulator = PostingAccumulator::new();
        let mut pending: Vec<(DocId, String)> = Vec::with_capacity(self.block_limit);
        let mut document_count = 0usize;
        let mut temp_block_count = 0usize;

        for doc in documents {
            pending.push(doc?);
            document_count += 1;

            if pending.len() >= self.block_limit {
                self.ingest_batch(&mut pending, normalizer, &mut accumulator);
                self.flush(&writer, &mut accumulator, &mut temp_block_count)?;
            }
        }

        if !pending.is_empty() {
            self.ingest_batch(&mut pending, normalizer, &mut accumulator);
        }
        if !accumulator.is_empty() {
            self.flush(&writer, &mut accumulator, &mut temp_block_count)?;
        }

        info!(
            document_count,
            temp_block_count, "SPIMI pass complete"
        );
        Ok(BuildStats {
            temp_block_count,
            document_count,
        })
    }

    /// Tokenizes a pending batch of documents across rayon's thread pool,
    /// then folds the results into `accumulator` sequentially. Splitting
    /// tokenization from accumulation this way keeps `PostingAccumulator`
    /// single-threaded while still parallelizing the CPU-bound normalizer
    /// pass across a full flush batch.
    fn ingest_batch(
        &self,
        pending: &mut Vec<(DocId, String)>,
        normalizer: &dyn Normalizer,
        accumulator: &mut PostingAccumulator,
    ) {
        let tokenized: Vec<(DocId, Vec<String>)> = pending
            .par_iter()
            .map(|(doc_id, text)| (*doc_id, normalizer.normalize(text)))
            .collect();
        for (doc_id, terms) in tokenized {
            for term in terms {
                accumulator.add(&term, doc_id);
            }
        }
        pending.clear();
    }

    fn flush(
        &self,
        writer: &BlockWriter,
        accumulator: &mut PostingAccumulator,
        temp_block_count: &mut usize,
    ) -> Result<()> {
        let entries = accumulator.drain_sorted();
        let block = Block::new(entries);
        let path = self.temp_block_path(*temp_block_count);
        debug!(path = %path.display(), terms = block.len(), "flushing temp block");
        writer.write(&path, &block)?;
        *temp_block_count += 1;
        Ok(())
    }
}
