// ============================================================
// Layer 2: ReadUseCase
// ============================================================
// Alternate entry point: reload a previously prepared dataset
// from the result store and describe it. No recomputation.

use anyhow::Result;
use std::path::PathBuf;

use crate::application::prepare_use_case::PrepConfig;
use crate::data::{batcher::ChunkBatcher, dataset::ChunkedDataset};
use crate::domain::contig::SplitSet;
use crate::infra::result_store::ResultStore;

/// Chunk count and batch shape of one partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetSummary {
    pub set:    SplitSet,
    pub chunks: usize,
    pub shape:  [usize; 2],
    /// Positions labelled 1 among real (unpadded) positions
    pub positive_positions: usize,
}

pub struct ReadUseCase {
    store_dir: PathBuf,
}

impl ReadUseCase {
    pub fn new(store_dir: impl Into<PathBuf>) -> Self {
        Self { store_dir: store_dir.into() }
    }

    pub fn execute(&self) -> Result<ChunkedDataset> {
        ResultStore::new(&self.store_dir).load()
    }

    /// Parameters the stored dataset was prepared with
    pub fn config(&self) -> Result<PrepConfig> {
        ResultStore::new(&self.store_dir).load_config()
    }
}

/// Stack each partition into a batch and report its shape.
pub fn summarize_sets(dataset: &ChunkedDataset) -> Result<Vec<SetSummary>> {
    let batcher = ChunkBatcher::new(dataset.chunk_len().unwrap_or(0));

    SplitSet::ALL
        .iter()
        .map(|&set| -> Result<SetSummary> {
            let batch = batcher.batch(dataset.by_set(set))?;
            let positive_positions = batch
                .labels
                .iter()
                .zip(&batch.attention_masks)
                .filter(|&(&l, &m)| l == 1 && m == 1)
                .count();
            Ok(SetSummary {
                set,
                chunks: batch.rows,
                shape:  batch.shape(),
                positive_positions,
            })
        })
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::vocabulary::Vocabulary;
    use crate::domain::chunk::ChunkRecord;
    use tempfile::TempDir;

    fn chunk(set: SplitSet, labels: Vec<u8>, masks: Vec<u8>) -> ChunkRecord {
        let n = labels.len();
        ChunkRecord {
            origin:          "1.tsv".to_string(),
            chunk:           1,
            set,
            tokens:          vec!["pad".to_string(); n],
            token_ids:       vec![0; n],
            attention_masks: masks,
            labels,
        }
    }

    #[test]
    fn test_summarize_sets() {
        let ds = ChunkedDataset::new(
            vec![
                chunk(SplitSet::Training, vec![1, 1, 0], vec![1, 1, 1]),
                chunk(SplitSet::Training, vec![0, 1, 0], vec![1, 1, 0]),
                chunk(SplitSet::Test,     vec![0, 0, 0], vec![1, 0, 0]),
            ],
            Vocabulary::default(),
        );

        let summary = summarize_sets(&ds).unwrap();
        assert_eq!(summary.len(), 4);
        assert_eq!(summary[0].set, SplitSet::Training);
        assert_eq!(summary[0].shape, [2, 3]);
        assert_eq!(summary[0].positive_positions, 3);
        assert_eq!(summary[1].chunks, 0);
        assert_eq!(summary[2].shape, [1, 3]);
    }

    #[test]
    fn test_read_without_prepare_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(ReadUseCase::new(tmp.path()).execute().is_err());
    }

    #[test]
    fn test_read_after_save() {
        let tmp = TempDir::new().unwrap();
        let ds  = ChunkedDataset::new(
            vec![chunk(SplitSet::Validation, vec![0, 1], vec![1, 1])],
            Vocabulary::default(),
        );
        ResultStore::new(tmp.path()).save(&ds, &PrepConfig::default(), &[]).unwrap();

        let reader = ReadUseCase::new(tmp.path());
        assert_eq!(reader.execute().unwrap(), ds);
        assert_eq!(reader.config().unwrap(), PrepConfig::default());
    }
}
