// ============================================================
// Layer 3: Chunk Domain Type
// ============================================================
// A fixed-length window sliced from a padded contig.
// Every vector has exactly `chunk_len` entries.

use serde::{Deserialize, Serialize};

use crate::domain::contig::SplitSet;

/// Filler written into `tokens` beyond the end of a contig
pub const PAD_TOKEN: &str = "pad";

/// Token id used for padded positions
pub const PAD_ID: u32 = 0;

/// One model-ready window of a contig.
///
/// `(origin, chunk)` is unique; `chunk` restarts at 1 for every contig.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub origin:          String,
    /// 1-based index of this window within its contig
    pub chunk:           usize,
    pub set:             SplitSet,
    pub tokens:          Vec<String>,
    pub token_ids:       Vec<u32>,
    /// 1 marks a real (non-padded) position
    pub attention_masks: Vec<u8>,
    pub labels:          Vec<u8>,
}

impl ChunkRecord {
    /// Number of real, non-padded positions in this window
    pub fn real_positions(&self) -> usize {
        self.attention_masks.iter().filter(|&&m| m == 1).count()
    }

    pub fn len(&self) -> usize {
        self.token_ids.len()
    }
}
