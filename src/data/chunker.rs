// ============================================================
// Layer 4: Sliding Window Chunker
// ============================================================
// Slices each contig into fixed-length windows of `chunk_len`
// positions, advancing by `chunk_offset` between windows.
//
// The contig is first padded to
//
//   P = max(L + chunk_offset, chunk_len)
//
// (token_ids and labels with 0, tokens with "pad", attention
// mask 1 for real positions only), then windows start at
//
//   0, offset, 2*offset, ...   while start < max(1, L + offset - chunk_len)
//
// Example with chunk_len=4, chunk_offset=2, L=7:
//   P = 9, bound = 5 → starts 0, 2, 4
//   Chunk 1:  positions 0-3
//   Chunk 2:  positions 2-5
//   Chunk 3:  positions 4-7   (position 7 is padding)
//
// A contig shorter than chunk_len yields exactly one window.
//
// Why pad by chunk_offset and not just up to chunk_len?
//   The last real position must fall inside a window. Padding
//   by one stride past the end guarantees that the final window
//   start is still in range and reaches the tail of the contig.
//
// The stride may not exceed chunk_len: with gaps between
// windows some positions would never appear in any chunk.
//
// Reference: Rust Book §8 (Slices)

use crate::domain::chunk::{ChunkRecord, PAD_ID, PAD_TOKEN};
use crate::domain::contig::ContigRecord;
use crate::domain::error::PrepError;

#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    /// Positions per window
    chunk_len: usize,
    /// Stride between window starts
    chunk_offset: usize,
}

impl Chunker {
    /// Create a new Chunker.
    ///
    /// Both sizes must be positive and the stride may not exceed the
    /// window, otherwise positions between windows would be skipped.
    pub fn new(chunk_len: usize, chunk_offset: usize) -> Result<Self, PrepError> {
        if chunk_len == 0 || chunk_offset == 0 {
            return Err(PrepError::InvalidConfig(format!(
                "chunk_len ({chunk_len}) and chunk_offset ({chunk_offset}) must be positive"
            )));
        }
        if chunk_offset > chunk_len {
            return Err(PrepError::InvalidConfig(format!(
                "chunk_offset ({chunk_offset}) must not exceed chunk_len ({chunk_len}), \
                 otherwise positions between windows are not covered by any chunk"
            )));
        }
        Ok(Self { chunk_len, chunk_offset })
    }

    pub fn chunk_len(&self) -> usize {
        self.chunk_len
    }

    /// Length of the padded arrays for a contig of `length` tokens
    pub fn padded_len(&self, length: usize) -> usize {
        (length + self.chunk_offset).max(self.chunk_len)
    }

    /// Start offsets of every window for a contig of `length` tokens
    pub fn window_starts(&self, length: usize) -> impl Iterator<Item = usize> {
        // At least one window, even for an empty contig
        let bound = (length + self.chunk_offset).saturating_sub(self.chunk_len).max(1);
        (0..bound).step_by(self.chunk_offset)
    }

    /// Returns how many windows a contig of `length` tokens produces
    pub fn num_chunks(&self, length: usize) -> usize {
        self.window_starts(length).count()
    }

    /// Pad one contig and cut it into windows, numbered from 1.
    pub fn chunk(&self, record: &ContigRecord) -> Vec<ChunkRecord> {
        let len    = record.token_ids.len();
        let padded = self.padded_len(len);

        // Pad every parallel array to the same length P
        let mut token_ids = record.token_ids.clone();
        token_ids.resize(padded, PAD_ID);

        let mut labels = record.labels.clone();
        labels.resize(padded, 0);

        let mut tokens = record.tokens.clone();
        tokens.resize(padded, PAD_TOKEN.to_string());

        // Attention: 1 for real positions, 0 for padding
        let mut masks = vec![1u8; len];
        masks.resize(padded, 0);

        let set = record.split();

        self.window_starts(len)
            .enumerate()
            .map(|(n, start)| {
                // start + chunk_len <= P for every start, so the slices are in bounds
                let window = start..start + self.chunk_len;
                ChunkRecord {
                    origin:          record.origin.clone(),
                    chunk:           n + 1,
                    set,
                    tokens:          tokens[window.clone()].to_vec(),
                    token_ids:       token_ids[window.clone()].to_vec(),
                    attention_masks: masks[window.clone()].to_vec(),
                    labels:          labels[window].to_vec(),
                }
            })
            .collect()
    }

    /// Chunk every record, keeping record order.
    pub fn chunk_all(&self, records: &[ContigRecord]) -> Vec<ChunkRecord> {
        let chunks: Vec<ChunkRecord> = records.iter().flat_map(|r| self.chunk(r)).collect();
        tracing::info!(
            "Created {} chunks of length {} (offset {}) from {} contigs",
            chunks.len(),
            self.chunk_len,
            self.chunk_offset,
            records.len()
        );
        chunks
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contig::SplitSet;

    fn record(ids: &[u32], labels: &[u8]) -> ContigRecord {
        ContigRecord {
            origin:     "1.tsv".to_string(),
            tokens:     ids.iter().map(|i| format!("T{i}")).collect(),
            labels:     labels.to_vec(),
            length:     ids.len(),
            num_te:     0,
            max_len_te: 0,
            bin:        Some(0),
            set:        Some(SplitSet::Validation),
            token_ids:  ids.to_vec(),
        }
    }

    #[test]
    fn test_short_contig_gives_one_padded_chunk() {
        let c      = Chunker::new(4, 2).unwrap();
        let chunks = c.chunk(&record(&[11, 12, 13], &[0, 1, 1]));

        assert_eq!(chunks.len(), 1);
        let ch = &chunks[0];
        assert_eq!(ch.chunk, 1);
        assert_eq!(ch.token_ids, vec![11, 12, 13, 0]);
        assert_eq!(ch.attention_masks, vec![1, 1, 1, 0]);
        assert_eq!(ch.labels, vec![0, 1, 1, 0]);
        assert_eq!(ch.tokens, vec!["T11", "T12", "T13", "pad"]);
        assert_eq!(ch.set, SplitSet::Validation);
    }

    #[test]
    fn test_seven_tokens_give_three_windows() {
        let c   = Chunker::new(4, 2).unwrap();
        let ids = [11, 12, 13, 14, 15, 16, 17];

        assert_eq!(c.padded_len(7), 9);
        assert_eq!(c.window_starts(7).collect::<Vec<_>>(), vec![0, 2, 4]);

        let chunks = c.chunk(&record(&ids, &[0; 7]));
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].token_ids, vec![13, 14, 15, 16]);
        assert_eq!(chunks[2].token_ids, vec![15, 16, 17, 0]);
        assert_eq!(chunks[2].attention_masks, vec![1, 1, 1, 0]);
        assert_eq!(chunks.iter().map(|c| c.chunk).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_contig_still_gives_one_chunk() {
        let c      = Chunker::new(3, 1).unwrap();
        let chunks = c.chunk(&record(&[], &[]));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].token_ids, vec![0, 0, 0]);
        assert_eq!(chunks[0].real_positions(), 0);
    }

    #[test]
    fn test_all_vectors_have_chunk_len_and_cover_every_position() {
        for (chunk_len, offset) in [(4, 2), (5, 5), (6, 1), (150, 50)] {
            let c = Chunker::new(chunk_len, offset).unwrap();
            for len in 0..400usize {
                let ids: Vec<u32> = (0..len as u32).map(|i| 11 + i).collect();
                let chunks        = c.chunk(&record(&ids, &vec![1; len]));

                assert_eq!(chunks.len(), c.num_chunks(len));
                let mut covered = vec![false; len];
                for (ch, start) in chunks.iter().zip(c.window_starts(len)) {
                    assert_eq!(ch.len(), chunk_len);
                    assert_eq!(ch.labels.len(), chunk_len);
                    assert_eq!(ch.attention_masks.len(), chunk_len);
                    assert_eq!(ch.tokens.len(), chunk_len);
                    for (k, &m) in ch.attention_masks.iter().enumerate() {
                        if m == 1 {
                            covered[start + k] = true;
                        }
                    }
                }
                assert!(covered.iter().all(|&c| c), "len={len} chunk_len={chunk_len} offset={offset}");
            }
        }
    }

    #[test]
    fn test_non_overlapping_masks_sum_to_length() {
        let c      = Chunker::new(5, 5).unwrap();
        let chunks = c.chunk(&record(&[11; 12], &[0; 12]));
        let total: usize = chunks.iter().map(ChunkRecord::real_positions).sum();
        assert_eq!(total, 12);
    }

    #[test]
    fn test_invalid_sizes_rejected() {
        assert!(Chunker::new(0, 1).is_err());
        assert!(Chunker::new(4, 0).is_err());

        let err = Chunker::new(4, 5).unwrap_err().to_string();
        assert!(err.contains("not covered by any chunk"), "{err}");
    }
}
