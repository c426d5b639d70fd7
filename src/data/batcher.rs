// ============================================================
// Layer 4: Chunk Batcher
// ============================================================
// Stacks chunks into row-major flat arrays for batch model
// input. Every chunk has the same length, so a batch of N
// chunks of length S is simply
//
//   [c1_t1, c1_t2, ..., c1_tS, c2_t1, ..., cN_tS] → shape [N, S]

use anyhow::{bail, Result};

use crate::domain::chunk::ChunkRecord;

/// Flat, row-major arrays of shape `[rows, cols]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChunkBatch {
    pub rows:            usize,
    pub cols:            usize,
    pub token_ids:       Vec<u32>,
    pub attention_masks: Vec<u8>,
    pub labels:          Vec<u8>,
}

impl ChunkBatch {
    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    /// Token ids of row `i`
    pub fn row(&self, i: usize) -> Option<&[u32]> {
        if i >= self.rows {
            return None;
        }
        Some(&self.token_ids[i * self.cols..(i + 1) * self.cols])
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChunkBatcher {
    chunk_len: usize,
}

impl ChunkBatcher {
    pub fn new(chunk_len: usize) -> Self {
        Self { chunk_len }
    }

    /// Stack `items` into one batch. Fails if any chunk has the wrong length.
    pub fn batch<'a>(&self, items: impl IntoIterator<Item = &'a ChunkRecord>) -> Result<ChunkBatch> {
        let mut batch = ChunkBatch { cols: self.chunk_len, ..ChunkBatch::default() };

        for c in items {
            let lens = [c.token_ids.len(), c.attention_masks.len(), c.labels.len()];
            if lens.iter().any(|&l| l != self.chunk_len) {
                bail!(
                    "chunk {} of '{}' has lengths {:?}, expected {}",
                    c.chunk,
                    c.origin,
                    lens,
                    self.chunk_len
                );
            }
            batch.token_ids.extend_from_slice(&c.token_ids);
            batch.attention_masks.extend_from_slice(&c.attention_masks);
            batch.labels.extend_from_slice(&c.labels);
            batch.rows += 1;
        }

        Ok(batch)
    }
}
