// ============================================================
// Layer 4: Contig Assembler
// ============================================================
// Merges each contig's token sequence with the annotation
// intervals that belong to it, producing one binary label per
// position.
//
// Example: tokens A B C, interval [2, 3] (1-based, inclusive)
//   labels  0 1 1
//
// Overlapping intervals are OR-ed together. Intervals that do
// not fit inside the contig are rejected, never clamped.

use std::collections::{HashMap, HashSet};

use crate::domain::contig::{Annotation, ContigRecord, Interval, RawContig};
use crate::domain::error::PrepError;

/// Normalise a contig key so `"007"` and `"7"` match.
pub fn normalise_key(key: &str) -> String {
    let key = key.trim();
    match key.parse::<u64>() {
        Ok(n)  => n.to_string(),
        Err(_) => key.to_string(),
    }
}

/// Label one contig with the given intervals.
pub fn assemble(contig: RawContig, intervals: &[Interval]) -> Result<ContigRecord, PrepError> {
    let length     = contig.tokens.len();
    let mut labels = vec![0u8; length];

    for iv in intervals {
        if iv.start < 1 || iv.end < iv.start || iv.end > length {
            return Err(PrepError::IntervalOutOfBounds {
                contig: contig.origin.clone(),
                start:  iv.start,
                end:    iv.end,
                length,
            });
        }
        labels[iv.start - 1..iv.end].fill(1);
    }

    let max_len_te = intervals.iter().map(Interval::span_length).max().unwrap_or(0);

    Ok(ContigRecord {
        origin:     contig.origin,
        tokens:     contig.tokens,
        labels,
        length,
        num_te:     intervals.len(),
        max_len_te,
        bin:        None,
        set:        None,
        token_ids:  Vec::new(),
    })
}

/// Label every contig, matching annotations by contig key.
///
/// Annotations whose key matches no contig are skipped and counted.
pub fn assemble_all(
    contigs:     Vec<RawContig>,
    annotations: &[Annotation],
) -> Result<Vec<ContigRecord>, PrepError> {
    let mut by_key: HashMap<String, Vec<Interval>> = HashMap::new();
    for a in annotations {
        by_key.entry(normalise_key(&a.contig_id)).or_default().push(a.interval);
    }

    let mut matched = HashSet::new();
    let mut records = Vec::with_capacity(contigs.len());

    for contig in contigs {
        let key       = normalise_key(contig.key());
        let intervals = by_key.get(&key).map(Vec::as_slice).unwrap_or(&[]);
        if !intervals.is_empty() {
            matched.insert(key);
        }
        records.push(assemble(contig, intervals)?);
    }

    let unmatched: usize = by_key
        .iter()
        .filter(|(k, _)| !matched.contains(*k))
        .map(|(_, v)| v.len())
        .sum();
    if unmatched > 0 {
        tracing::warn!("Ignoring {} annotations that reference unknown contigs", unmatched);
    }

    let positive = records.iter().filter(|r| r.num_te > 0).count();
    tracing::info!("Assembled {} contigs, {} with annotations", records.len(), positive);

    Ok(records)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn contig(origin: &str, tokens: &[&str]) -> RawContig {
        RawContig::new(origin, tokens.iter().map(|t| t.to_string()).collect())
    }

    #[test]
    fn test_single_interval_labels() {
        let rec = assemble(contig("1.tsv", &["A", "B", "C"]), &[Interval::new(2, 3)]).unwrap();
        assert_eq!(rec.labels, vec![0, 1, 1]);
        assert_eq!(rec.length, 3);
        assert_eq!(rec.num_te, 1);
        assert_eq!(rec.max_len_te, 2);
    }

    #[test]
    fn test_overlapping_intervals_union() {
        let ivs = [Interval::new(1, 3), Interval::new(2, 5), Interval::new(7, 7)];
        let rec = assemble(contig("1.tsv", &["a"; 8]), &ivs).unwrap();
        assert_eq!(rec.labels, vec![1, 1, 1, 1, 1, 0, 1, 0]);
        assert_eq!(rec.num_te, 3);
        assert_eq!(rec.max_len_te, 4);
    }

    #[test]
    fn test_no_intervals() {
        let rec = assemble(contig("1.tsv", &["A", "B"]), &[]).unwrap();
        assert_eq!(rec.labels, vec![0, 0]);
        assert_eq!(rec.num_te, 0);
        assert_eq!(rec.max_len_te, 0);
        assert_eq!(rec.labels.len(), rec.tokens.len());
    }

    #[test]
    fn test_out_of_bounds_interval_rejected() {
        let too_long = assemble(contig("1.tsv", &["A", "B"]), &[Interval::new(1, 3)]);
        assert!(matches!(too_long, Err(PrepError::IntervalOutOfBounds { end: 3, length: 2, .. })));

        let zero_start = assemble(contig("1.tsv", &["A", "B"]), &[Interval::new(0, 1)]);
        assert!(zero_start.is_err());

        let reversed = assemble(contig("1.tsv", &["A", "B"]), &[Interval::new(2, 1)]);
        assert!(reversed.is_err());
    }

    #[test]
    fn test_assemble_all_matches_numeric_keys() {
        let contigs = vec![contig("007.tsv", &["A", "B", "C"]), contig("8.tsv", &["A"])];
        let ann = vec![
            Annotation { contig_id: "7".into(),  interval: Interval::new(1, 1) },
            Annotation { contig_id: "99".into(), interval: Interval::new(1, 1) },
        ];

        let recs = assemble_all(contigs, &ann).unwrap();
        assert_eq!(recs[0].labels, vec![1, 0, 0]);
        assert_eq!(recs[1].labels, vec![0]);
        assert_eq!(recs[1].num_te, 0);
    }
}
