// ============================================================
// Layer 4: Chunked Dataset
// ============================================================
// The pipeline output as one value: every ChunkRecord in
// record order, plus the vocabulary that produced their ids.
//
// Why keep the vocabulary next to the chunks?
//   Token ids are meaningless on their own. Anything that
//   reads the chunks back (the `read` command, a model later
//   on) has to decode them with exactly this table, so the two
//   travel and are stored together.
//
// Partitions are views over the same chunk list (`by_set`),
// not separate copies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::vocabulary::Vocabulary;
use crate::domain::chunk::{ChunkRecord, PAD_ID, PAD_TOKEN};
use crate::domain::contig::SplitSet;
use crate::domain::error::PrepError;

/// The pipeline output: every chunk plus the vocabulary that produced its ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkedDataset {
    pub chunks:     Vec<ChunkRecord>,
    pub vocabulary: Vocabulary,
}

impl ChunkedDataset {
    pub fn new(chunks: Vec<ChunkRecord>, vocabulary: Vocabulary) -> Self {
        Self { chunks, vocabulary }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ChunkRecord> {
        self.chunks.get(index)
    }

    pub fn by_set(&self, set: SplitSet) -> impl Iterator<Item = &ChunkRecord> {
        self.chunks.iter().filter(move |c| c.set == set)
    }

    pub fn set_counts(&self) -> BTreeMap<SplitSet, usize> {
        let mut counts = BTreeMap::new();
        for c in &self.chunks {
            *counts.entry(c.set).or_insert(0) += 1;
        }
        counts
    }

    /// Window length shared by all chunks, `None` when empty
    pub fn chunk_len(&self) -> Option<usize> {
        self.chunks.first().map(ChunkRecord::len)
    }

    /// Check that every chunk id decodes to the token stored beside it.
    pub fn check_vocabulary(&self) -> Result<(), PrepError> {
        for c in &self.chunks {
            for (token, &id) in c.tokens.iter().zip(&c.token_ids) {
                // Padding is not part of the vocabulary
                let expected = if id == PAD_ID {
                    Some(PAD_TOKEN)
                } else {
                    self.vocabulary.token(id)
                };
                if expected != Some(token.as_str()) {
                    return Err(PrepError::InvalidVocabulary(format!(
                        "chunk {} of '{}' holds id {id} for token '{token}'",
                        c.chunk, c.origin
                    )));
                }
            }
        }
        Ok(())
    }
}
