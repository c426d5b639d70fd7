// ============================================================
// Layer 4: Vocabulary Builder
// ============================================================
// Assigns every distinct token an integer id.
//
//   0       → padding
//   1 – 10  → reserved for special tokens
//   11 ...  → real tokens, in first-seen order
//
// First-seen order is defined over contigs sorted by origin,
// tokens in sequence order. The builder sorts before scanning,
// so the ids do not depend on the order records arrive in.
//
// Encoding is a second pass over the same records; a token
// missing from the table at that point is an internal error.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::contig::ContigRecord;
use crate::domain::error::PrepError;

/// Id given to the first real token; everything below is reserved
pub const FIRST_TOKEN_ID: u32 = 11;

/// Token → id mapping. Ids are contiguous from [`FIRST_TOKEN_ID`].
///
/// Persisted as a plain `{ token: id }` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "BTreeMap<String, u32>", try_from = "BTreeMap<String, u32>")]
pub struct Vocabulary {
    id_to_token: Vec<String>,
    token_to_id: HashMap<String, u32>,
}

impl Vocabulary {
    /// Scan all records (sorted by origin) and number tokens by first appearance.
    pub fn build(records: &[ContigRecord]) -> Self {
        let mut ordered: Vec<&ContigRecord> = records.iter().collect();
        ordered.sort_by(|a, b| a.origin.cmp(&b.origin));

        let mut vocab = Self::default();
        for rec in ordered {
            for token in &rec.tokens {
                vocab.insert(token);
            }
        }

        tracing::info!("Vocabulary built with {} distinct tokens", vocab.len());
        vocab
    }

    /// Returns the id of `token`, adding it if it is new.
    fn insert(&mut self, token: &str) -> u32 {
        if let Some(&id) = self.token_to_id.get(token) {
            return id;
        }
        let id = FIRST_TOKEN_ID + self.id_to_token.len() as u32;
        self.id_to_token.push(token.to_string());
        self.token_to_id.insert(token.to_string(), id);
        id
    }

    pub fn len(&self) -> usize {
        self.id_to_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_token.is_empty()
    }

    pub fn id(&self, token: &str) -> Option<u32> {
        self.token_to_id.get(token).copied()
    }

    pub fn token(&self, id: u32) -> Option<&str> {
        let idx = id.checked_sub(FIRST_TOKEN_ID)? as usize;
        self.id_to_token.get(idx).map(String::as_str)
    }

    /// Map a token sequence to ids. Fails on the first unknown token.
    pub fn encode(&self, tokens: &[String]) -> Result<Vec<u32>, PrepError> {
        tokens
            .iter()
            .map(|t| self.id(t).ok_or_else(|| PrepError::MissingToken(t.clone())))
            .collect()
    }

    /// Tokens in id order
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.id_to_token.iter().map(String::as_str)
    }
}

impl From<Vocabulary> for BTreeMap<String, u32> {
    fn from(v: Vocabulary) -> Self {
        v.token_to_id.into_iter().collect()
    }
}

/// Rebuild from a stored mapping; the ids must be exactly `11..=10+V`.
impl TryFrom<BTreeMap<String, u32>> for Vocabulary {
    type Error = PrepError;

    fn try_from(map: BTreeMap<String, u32>) -> Result<Self, Self::Error> {
        let mut slots: Vec<Option<String>> = vec![None; map.len()];

        for (token, id) in map {
            let slot = id
                .checked_sub(FIRST_TOKEN_ID)
                .map(|i| i as usize)
                .and_then(|i| slots.get_mut(i))
                .ok_or_else(|| {
                    PrepError::InvalidVocabulary(format!("id {id} for '{token}' is out of range"))
                })?;
            if slot.is_some() {
                return Err(PrepError::InvalidVocabulary(format!("id {id} is used twice")));
            }
            *slot = Some(token);
        }

        let mut vocab = Self::default();
        for token in slots.into_iter().flatten() {
            vocab.insert(&token);
        }
        Ok(vocab)
    }
}

/// Fill `token_ids` of every record from the vocabulary.
pub fn tokenize(
    mut records: Vec<ContigRecord>,
    vocab:       &Vocabulary,
) -> Result<Vec<ContigRecord>, PrepError> {
    for rec in records.iter_mut() {
        rec.token_ids = vocab.encode(&rec.tokens)?;
    }
    Ok(records)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn record(origin: &str, tokens: &[&str]) -> ContigRecord {
        ContigRecord {
            origin:     origin.to_string(),
            tokens:     tokens.iter().map(|t| t.to_string()).collect(),
            labels:     vec![0; tokens.len()],
            length:     tokens.len(),
            num_te:     0,
            max_len_te: 0,
            bin:        None,
            set:        None,
            token_ids:  Vec::new(),
        }
    }

    #[test]
    fn test_first_seen_order_over_sorted_origins() {
        // "b.tsv" comes first in the slice but "a.tsv" is scanned first
        let recs  = vec![record("b.tsv", &["Z", "X"]), record("a.tsv", &["X", "Y", "X"])];
        let vocab = Vocabulary::build(&recs);

        assert_eq!(vocab.id("X"), Some(11));
        assert_eq!(vocab.id("Y"), Some(12));
        assert_eq!(vocab.id("Z"), Some(13));
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.token(12), Some("Y"));
        assert_eq!(vocab.token(0), None);
    }

    #[test]
    fn test_ids_are_a_bijection_onto_range() {
        let recs  = vec![record("1", &["a", "b", "c"]), record("2", &["c", "d", "a", "e"])];
        let vocab = Vocabulary::build(&recs);

        let mut ids: Vec<u32> = vocab.tokens().map(|t| vocab.id(t).unwrap()).collect();
        ids.sort_unstable();
        let expected: Vec<u32> = (FIRST_TOKEN_ID..FIRST_TOKEN_ID + 5).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_tokenize_fills_ids() {
        let recs  = vec![record("1", &["A", "B", "A"])];
        let vocab = Vocabulary::build(&recs);
        let recs  = tokenize(recs, &vocab).unwrap();
        assert_eq!(recs[0].token_ids, vec![11, 12, 11]);
        assert!(recs[0].token_ids.iter().all(|&id| id != 0));
    }

    #[test]
    fn test_missing_token_is_error() {
        let vocab = Vocabulary::build(&[record("1", &["A"])]);
        let err   = vocab.encode(&["B".to_string()]).unwrap_err();
        assert!(matches!(err, PrepError::MissingToken(t) if t == "B"));
    }

    #[test]
    fn test_mapping_json_round_trip() {
        let vocab = Vocabulary::build(&[record("1", &["PF1", "PF2", "PF1", "PF3"])]);
        let json  = serde_json::to_string(&vocab).unwrap();
        assert!(json.contains("\"PF2\":12"));

        let back: Vocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vocab);
    }

    #[test]
    fn test_mapping_with_gap_is_rejected() {
        let bad: Result<Vocabulary, _> = serde_json::from_str(r#"{"A": 11, "B": 13}"#);
        assert!(bad.is_err());

        let dup: Result<Vocabulary, _> = serde_json::from_str(r#"{"A": 11, "B": 11}"#);
        assert!(dup.is_err());

        let reserved: Result<Vocabulary, _> = serde_json::from_str(r#"{"A": 0}"#);
        assert!(reserved.is_err());
    }
}
