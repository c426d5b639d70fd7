// ============================================================
// Layer 2: PrepareUseCase
// ============================================================
// Orchestrates the full preparation pipeline in order:
//
//   Step 1: Validate config            (before any I/O)
//   Step 2: Load contigs + annotations (Layer 4 - data)
//   Step 3: Assemble labels            (Layer 4 - data)
//   Step 4: Stratified split           (Layer 4 - data)
//   Step 5: Build vocabulary, tokenize (Layer 4 - data)
//   Step 6: Chunk                      (Layer 4 - data)
//   Step 7: Save results + report      (Layer 6 - infra)
//
// Nothing is written unless every step succeeds.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{
    assembler::assemble_all,
    chunker::Chunker,
    dataset::ChunkedDataset,
    loader::{AnnotationTable, ContigDirLoader},
    splitter::{stratified_split, summarize, validate_bins, BinSummary, LengthBin, SplitFractions},
    vocabulary::{tokenize, Vocabulary},
};
use crate::domain::traits::{AnnotationSource, ContigSource};
use crate::infra::result_store::ResultStore;

// ─── Preparation Configuration ───────────────────────────────────────────────
// Every pipeline parameter. Saved next to the results so a
// stored dataset records how it was built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepConfig {
    pub annotations_path: PathBuf,
    pub contigs_dir:      PathBuf,
    pub store_dir:        PathBuf,
    pub validation_frac:  f64,
    pub test_frac:        f64,
    pub bins:             Vec<LengthBin>,
    pub chunk_len:        usize,
    pub chunk_offset:     usize,
    pub seed:             u64,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            annotations_path: PathBuf::from("data/original_data/tn.contig.filter.tsv"),
            contigs_dir:      PathBuf::from("data/original_data/contigs_func"),
            store_dir:        PathBuf::from("data/prep_trainvalidationtest_1"),
            validation_frac:  0.05,
            test_frac:        0.05,
            bins:             vec![
                LengthBin::new(1, 30),
                LengthBin::new(30, 500),
                LengthBin::new(500, 999_999),
            ],
            chunk_len:        150,
            chunk_offset:     50,
            seed:             4711,
        }
    }
}

impl PrepConfig {
    /// Reject invalid parameters before any processing begins.
    pub fn validate(&self) -> Result<()> {
        self.fractions()?;
        validate_bins(&self.bins)?;
        Chunker::new(self.chunk_len, self.chunk_offset)?;
        Ok(())
    }

    pub fn fractions(&self) -> Result<SplitFractions> {
        Ok(SplitFractions::new(self.validation_frac, self.test_frac)?)
    }

    /// Share of contigs drawn into training
    pub fn train_frac(&self) -> f64 {
        1.0 - self.validation_frac - self.test_frac
    }
}

/// Output of one pipeline run
#[derive(Debug, Clone)]
pub struct Prepared {
    pub dataset: ChunkedDataset,
    pub summary: Vec<BinSummary>,
}

/// Run stages 1–4 over the given sources. Pure apart from logging.
pub fn prepare_dataset(
    contigs:     &impl ContigSource,
    annotations: &impl AnnotationSource,
    cfg:         &PrepConfig,
) -> Result<Prepared> {
    cfg.validate()?;
    let fractions = cfg.fractions()?;
    let chunker   = Chunker::new(cfg.chunk_len, cfg.chunk_offset)?;

    // ── Load ──────────────────────────────────────────────────────────────────
    let raw         = contigs.load_all()?;
    let annotations = annotations.load_annotations()?;

    // ── Stage 1: labels ───────────────────────────────────────────────────────
    let records = assemble_all(raw, &annotations)?;

    // ── Stage 2: stratified split ─────────────────────────────────────────────
    // One generator for the whole run, seeded from the config
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let records = stratified_split(records, &cfg.bins, fractions, &mut rng)?;
    let summary = summarize(&records, &cfg.bins);

    // ── Stage 3: vocabulary ───────────────────────────────────────────────────
    let vocabulary = Vocabulary::build(&records);
    let records    = tokenize(records, &vocabulary)?;

    // ── Stage 4: chunks ───────────────────────────────────────────────────────
    let chunks = chunker.chunk_all(&records);

    Ok(Prepared {
        dataset: ChunkedDataset::new(chunks, vocabulary),
        summary,
    })
}

// ─── PrepareUseCase ───────────────────────────────────────────────────────────
pub struct PrepareUseCase {
    config: PrepConfig,
}

impl PrepareUseCase {
    pub fn new(config: PrepConfig) -> Self {
        Self { config }
    }

    /// Execute the full pipeline end to end and persist the result.
    pub fn execute(&self) -> Result<Prepared> {
        let cfg = &self.config;

        tracing::info!(
            "Preparing data: contigs '{}', annotations '{}'",
            cfg.contigs_dir.display(),
            cfg.annotations_path.display()
        );

        let contigs     = ContigDirLoader::new(&cfg.contigs_dir);
        let annotations = AnnotationTable::new(&cfg.annotations_path);
        let prepared    = prepare_dataset(&contigs, &annotations, cfg)?;

        // Chunks, vocabulary, config and report are replaced together
        let store = ResultStore::new(&cfg.store_dir);
        store.save(&prepared.dataset, cfg, &prepared.summary)?;

        tracing::info!(
            "Saved {} chunks and {} tokens to '{}'",
            prepared.dataset.len(),
            prepared.dataset.vocabulary.len(),
            cfg.store_dir.display()
        );
        Ok(prepared)
    }
}
