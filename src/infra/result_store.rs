// ============================================================
// Layer 6: Result Store
// ============================================================
// Persists a prepared dataset as a small key-value store: one
// JSON file per fixed key inside the store directory.
//
//   data/prep_trainvalidationtest_1/
//     chunks.json           ← every ChunkRecord
//     tokenize_table.json   ← { token: id }
//     prep_config.json      ← parameters of the run
//     split_summary.csv     ← per-bin split counts
//
// Why stage the writes?
//   The chunk ids only make sense with the vocabulary that
//   produced them. A run that dies halfway must not leave new
//   chunks next to an old vocabulary, so every file is written
//   to `.staging/` first and moved into place only after all
//   of them are complete. A failed save leaves the store as it
//   was.
//
// `load` is a pure cache read: it never recomputes anything,
// it only checks that the stored vocabulary is well formed and
// matches the stored chunks.
//
// Reference: std::fs::rename (atomic within one filesystem)

use anyhow::{bail, Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::prepare_use_case::PrepConfig;
use crate::data::dataset::ChunkedDataset;
use crate::data::splitter::BinSummary;
use crate::data::vocabulary::Vocabulary;
use crate::domain::chunk::ChunkRecord;
use crate::domain::error::PrepError;
use crate::infra::split_report::{SplitReportLogger, REPORT_FILE};

pub const CHUNKS_KEY:         &str = "chunks";
pub const TOKENIZE_TABLE_KEY: &str = "tokenize_table";
pub const CONFIG_KEY:         &str = "prep_config";

/// Scratch directory inside the store, removed after every save
pub const STAGING_DIR: &str = ".staging";

fn key_file(key: &str) -> String {
    format!("{key}.json")
}

pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key_file(key))
    }

    /// Write the chunk table, the vocabulary, the config and the split report.
    ///
    /// Either every file is replaced or none is.
    pub fn save(
        &self,
        dataset: &ChunkedDataset,
        cfg:     &PrepConfig,
        summary: &[BinSummary],
    ) -> Result<()> {
        let created = !self.dir.exists();
        let staging = self.dir.join(STAGING_DIR);

        // Leftovers of an interrupted run are never part of the store
        if staging.exists() {
            fs::remove_dir_all(&staging)
                .with_context(|| format!("Cannot clear '{}'", staging.display()))?;
        }
        fs::create_dir_all(&staging)
            .with_context(|| format!("Cannot create store directory '{}'", self.dir.display()))?;

        let staged = stage(&staging, dataset, cfg, summary)
            .and_then(|files| self.check_targets(&files).map(|()| files));

        let files = match staged {
            Ok(files) => files,
            Err(e) => {
                // Cleanup only; the staging error is the one reported
                let _ = if created {
                    fs::remove_dir_all(&self.dir)
                } else {
                    fs::remove_dir_all(&staging)
                };
                return Err(e);
            }
        };

        for file in &files {
            let target = self.dir.join(file);
            fs::rename(staging.join(file), &target)
                .with_context(|| format!("Cannot move '{}' into place", target.display()))?;
        }
        fs::remove_dir_all(&staging)
            .with_context(|| format!("Cannot remove '{}'", staging.display()))?;

        tracing::debug!("Committed {} files to '{}'", files.len(), self.dir.display());
        Ok(())
    }

    /// Read back the chunk table and vocabulary.
    pub fn load(&self) -> Result<ChunkedDataset> {
        let chunks: Vec<ChunkRecord> = self.read_key(CHUNKS_KEY)?;
        let vocabulary: Vocabulary   = self.read_key(TOKENIZE_TABLE_KEY)?;

        let dataset = ChunkedDataset::new(chunks, vocabulary);
        dataset.check_vocabulary()?;

        tracing::info!(
            "Loaded {} chunks and {} tokens from '{}'",
            dataset.len(),
            dataset.vocabulary.len(),
            self.dir.display()
        );
        Ok(dataset)
    }

    /// The parameters the stored dataset was built with.
    pub fn load_config(&self) -> Result<PrepConfig> {
        self.read_key(CONFIG_KEY)
    }

    /// Every target must be absent or a regular file before anything is moved.
    fn check_targets(&self, files: &[String]) -> Result<()> {
        for file in files {
            let target = self.dir.join(file);
            if target.exists() && !target.is_file() {
                bail!("Cannot replace '{}': not a regular file", target.display());
            }
        }
        Ok(())
    }

    fn read_key<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let path = self.key_path(key);
        if !path.exists() {
            return Err(PrepError::MissingKey { key: key.to_string() }.into());
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Cannot parse '{}'", path.display()))
    }
}

/// Write every store file into `staging`; returns their file names.
fn stage(
    staging: &Path,
    dataset: &ChunkedDataset,
    cfg:     &PrepConfig,
    summary: &[BinSummary],
) -> Result<Vec<String>> {
    let mut files = vec![
        write_key(staging, CHUNKS_KEY, &dataset.chunks)?,
        write_key(staging, TOKENIZE_TABLE_KEY, &dataset.vocabulary)?,
        write_key(staging, CONFIG_KEY, cfg)?,
    ];

    SplitReportLogger::new(staging)?.write(summary)?;
    files.push(REPORT_FILE.to_string());
    Ok(files)
}

fn write_key<T: Serialize + ?Sized>(dir: &Path, key: &str, value: &T) -> Result<String> {
    let file = key_file(key);
    let path = dir.join(&file);
    let json = serde_json::to_string(value)?;
    fs::write(&path, json)
        .with_context(|| format!("Cannot write '{}'", path.display()))?;
    tracing::debug!("Staged key '{}' at '{}'", key, path.display());
    Ok(file)
}
