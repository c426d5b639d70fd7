// ============================================================
// Layer 4: Stratified Train/Validation/Test Splitter
// ============================================================
// Buckets contigs into length bins and draws a partition for
// each contig inside its bin:
//
//   0 = training, 1 = validation, 2 = test
//
// with probabilities (train_frac, validation_frac, test_frac).
// The fractions hold per bin, so short and long contigs are
// spread over all three sets in the same proportions.
//
// Why stratify by length?
//   Contig lengths span several orders of magnitude. A plain
//   random split could put most long contigs into training by
//   chance, and validation scores would then say little about
//   long inputs. Drawing inside each bin keeps every length
//   range represented in every set.
//
// Draw order is part of the contract: bins in configured order,
// then contigs in table order within a bin. The caller supplies
// the generator, so a fixed seed reproduces every assignment.
// Contigs that fit no bin are marked Unassigned and consume no
// draw.
//
// Reference: rand crate documentation (WeightedIndex)

use std::fmt;
use std::str::FromStr;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::contig::{ContigRecord, SplitSet};
use crate::domain::error::PrepError;

// ─── LengthBin ────────────────────────────────────────────────────────────────
/// Half-open length range `[lo, hi)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthBin {
    pub lo: usize,
    pub hi: usize,
}

impl LengthBin {
    pub fn new(lo: usize, hi: usize) -> Self {
        Self { lo, hi }
    }

    pub fn contains(&self, length: usize) -> bool {
        self.lo <= length && length < self.hi
    }

    fn overlaps(&self, other: &LengthBin) -> bool {
        self.lo < other.hi && other.lo < self.hi
    }
}

impl fmt::Display for LengthBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.lo, self.hi)
    }
}

/// Parses `lo:hi`, as accepted by `--bins`.
impl FromStr for LengthBin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lo, hi) = s
            .split_once(':')
            .ok_or_else(|| format!("expected 'lo:hi', got '{s}'"))?;
        let lo = lo.trim().parse().map_err(|_| format!("invalid lower bound in '{s}'"))?;
        let hi = hi.trim().parse().map_err(|_| format!("invalid upper bound in '{s}'"))?;
        Ok(Self { lo, hi })
    }
}

/// Check that bins are non-empty ranges and pairwise disjoint.
pub fn validate_bins(bins: &[LengthBin]) -> Result<(), PrepError> {
    if bins.is_empty() {
        return Err(PrepError::InvalidConfig("at least one length bin is required".into()));
    }
    for (i, bin) in bins.iter().enumerate() {
        if bin.lo >= bin.hi {
            return Err(PrepError::InvalidConfig(format!("bin {bin} is empty (lo >= hi)")));
        }
        if let Some(other) = bins[..i].iter().find(|o| o.overlaps(bin)) {
            return Err(PrepError::InvalidConfig(format!("bins {other} and {bin} overlap")));
        }
    }
    Ok(())
}

// ─── SplitFractions ───────────────────────────────────────────────────────────
/// Target share of each partition. Always sums to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitFractions {
    pub train:      f64,
    pub validation: f64,
    pub test:       f64,
}

impl SplitFractions {
    /// Build from the validation and test shares; training gets the rest.
    pub fn new(validation: f64, test: f64) -> Result<Self, PrepError> {
        for (name, value) in [("validation_frac", validation), ("test_frac", test)] {
            if !value.is_finite() || value < 0.0 {
                return Err(PrepError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if validation + test > 1.0 + f64::EPSILON {
            return Err(PrepError::InvalidConfig(format!(
                "validation_frac + test_frac must not exceed 1, got {}",
                validation + test
            )));
        }
        Ok(Self {
            train: (1.0 - validation - test).max(0.0),
            validation,
            test,
        })
    }

    fn weights(&self) -> [f64; 3] {
        [self.train, self.validation, self.test]
    }
}

// ─── Splitting ────────────────────────────────────────────────────────────────
/// Index of the first bin containing `length`, if any.
pub fn bin_for(length: usize, bins: &[LengthBin]) -> Option<usize> {
    bins.iter().position(|b| b.contains(length))
}

/// Assign a bin and a partition to every record.
///
/// Draws are consumed bin by bin, in `bins` order, then in record
/// order within each bin.
pub fn stratified_split<R: Rng + ?Sized>(
    mut records: Vec<ContigRecord>,
    bins:        &[LengthBin],
    fractions:   SplitFractions,
    rng:         &mut R,
) -> Result<Vec<ContigRecord>, PrepError> {
    validate_bins(bins)?;

    // One categorical distribution shared by all bins; zero weights
    // are allowed as long as one weight is positive
    let dist = WeightedIndex::new(fractions.weights())
        .map_err(|e| PrepError::InvalidConfig(format!("split fractions: {e}")))?;

    // Bin membership first, so the draw loop can walk bin by bin
    for rec in records.iter_mut() {
        rec.bin = bin_for(rec.length, bins);
    }

    // Outer loop over bins, inner loop in record order: this fixes
    // which draw each contig receives for a given seed
    for bin_idx in 0..bins.len() {
        for rec in records.iter_mut().filter(|r| r.bin == Some(bin_idx)) {
            rec.set = Some(SplitSet::DRAWABLE[dist.sample(rng)]);
        }
    }

    // No draw for these, so adding an out-of-range contig does not
    // shift the assignments of any other contig
    let mut unassigned = 0usize;
    for rec in records.iter_mut().filter(|r| r.bin.is_none()) {
        rec.set = Some(SplitSet::Unassigned);
        unassigned += 1;
    }
    if unassigned > 0 {
        tracing::warn!("{} contigs match no length bin and stay unassigned", unassigned);
    }

    tracing::debug!(
        "Split {} contigs over {} bins (train={:.3}, validation={:.3}, test={:.3})",
        records.len(),
        bins.len(),
        fractions.train,
        fractions.validation,
        fractions.test,
    );

    Ok(records)
}

// ─── BinSummary ───────────────────────────────────────────────────────────────
/// Per-bin contig counts after splitting. `bin == None` is the unassigned row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinSummary {
    pub bin:        Option<usize>,
    pub range:      Option<LengthBin>,
    pub contigs:    usize,
    pub training:   usize,
    pub validation: usize,
    pub test:       usize,
}

/// Count contigs per bin and partition, one row per bin plus the unassigned row.
pub fn summarize(records: &[ContigRecord], bins: &[LengthBin]) -> Vec<BinSummary> {
    let slots = bins
        .iter()
        .enumerate()
        .map(|(i, b)| (Some(i), Some(*b)))
        .chain(std::iter::once((None, None)));

    slots
        .map(|(bin, range)| {
            let members: Vec<&ContigRecord> = records.iter().filter(|r| r.bin == bin).collect();
            let count   = |s: SplitSet| members.iter().filter(|r| r.split() == s).count();
            BinSummary {
                bin,
                range,
                contigs:    members.len(),
                training:   count(SplitSet::Training),
                validation: count(SplitSet::Validation),
                test:       count(SplitSet::Test),
            }
        })
        .collect()
}
