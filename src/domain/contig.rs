// ============================================================
// Layer 3: Contig Domain Types
// ============================================================
// A contig is an ordered list of tokens (protein-family labels)
// read from one input file. Annotation intervals mark positive
// regions on it.
//
// Lifecycle:
//   RawContig      → read from disk (origin + tokens)
//   ContigRecord   → labels attached by the assembler
//                    bin/set added by the splitter
//                    token_ids added by the vocabulary builder

use std::fmt;

use serde::{Deserialize, Serialize};

/// One annotated positive interval, 1-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: usize,
    pub end:   usize,
}

impl Interval {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of positions covered, `end - start + 1`
    pub fn span_length(&self) -> usize {
        self.end.saturating_sub(self.start) + 1
    }
}

/// A row of the annotation table: an interval owned by a contig key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Contig key as written in the table (e.g. `"4711"`)
    pub contig_id: String,
    pub interval:  Interval,
}

/// A contig as read from its file, before any labelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawContig {
    /// File name of the source sequence, unique per contig
    pub origin: String,
    pub tokens: Vec<String>,
}

impl RawContig {
    pub fn new(origin: impl Into<String>, tokens: Vec<String>) -> Self {
        Self { origin: origin.into(), tokens }
    }

    /// Key used to match annotations: the file name up to the first `.`
    pub fn key(&self) -> &str {
        self.origin.split('.').next().unwrap_or(&self.origin)
    }
}

/// Which partition a contig (and therefore all its chunks) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitSet {
    Training,
    Validation,
    Test,
    /// Length fell outside every configured bin
    Unassigned,
}

impl SplitSet {
    /// The three drawable partitions, in categorical draw order (0, 1, 2)
    pub const DRAWABLE: [SplitSet; 3] = [SplitSet::Training, SplitSet::Validation, SplitSet::Test];

    /// All variants, used for reporting
    pub const ALL: [SplitSet; 4] = [
        SplitSet::Training,
        SplitSet::Validation,
        SplitSet::Test,
        SplitSet::Unassigned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SplitSet::Training   => "training",
            SplitSet::Validation => "validation",
            SplitSet::Test       => "test",
            SplitSet::Unassigned => "unassigned",
        }
    }
}

impl fmt::Display for SplitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully labelled contig flowing through the pipeline stages.
///
/// `bin`/`set` start out empty and are filled by the splitter,
/// `token_ids` starts empty and is filled by the vocabulary builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContigRecord {
    pub origin:     String,
    pub tokens:     Vec<String>,
    /// 1 where the position lies in at least one annotated interval
    pub labels:     Vec<u8>,
    pub length:     usize,
    pub num_te:     usize,
    pub max_len_te: usize,
    /// Index into the configured bins, `None` if no bin matched
    pub bin:        Option<usize>,
    pub set:        Option<SplitSet>,
    pub token_ids:  Vec<u32>,
}

impl ContigRecord {
    /// The split assignment, `Unassigned` until the splitter ran
    pub fn split(&self) -> SplitSet {
        self.set.unwrap_or(SplitSet::Unassigned)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_span_length() {
        assert_eq!(Interval::new(2, 3).span_length(), 2);
        assert_eq!(Interval::new(5, 5).span_length(), 1);
    }

    #[test]
    fn test_contig_key_strips_extensions() {
        let c = RawContig::new("4711.func.tsv", vec![]);
        assert_eq!(c.key(), "4711");
    }

    #[test]
    fn test_split_set_serialises_lowercase() {
        let json = serde_json::to_string(&SplitSet::Validation).unwrap();
        assert_eq!(json, "\"validation\"");
        assert_eq!(SplitSet::Unassigned.to_string(), "unassigned");
    }
}
