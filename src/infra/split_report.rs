// ============================================================
// Layer 6: Split Report
// ============================================================
// Writes the per-bin split counts to a CSV file. The result
// store stages it together with the other store files.
//
// Output file: <store_dir>/split_summary.csv
//
// Example CSV output:
//   bin,lo,hi,contigs,training,validation,test
//   0,1,30,812,733,41,38
//   1,30,500,1290,1162,61,67
//   unassigned,,,0,0,0,0

use anyhow::{Context, Result};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::PathBuf,
};

use crate::data::splitter::BinSummary;

pub const REPORT_FILE: &str = "split_summary.csv";

pub struct SplitReportLogger {
    csv_path: PathBuf,
}

impl SplitReportLogger {
    /// Create the target directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create report directory '{}'", dir.display()))?;
        Ok(Self { csv_path: dir.join(REPORT_FILE) })
    }

    /// Overwrite the report with one row per bin.
    pub fn write(&self, rows: &[BinSummary]) -> Result<()> {
        let file  = File::create(&self.csv_path)
            .with_context(|| format!("Cannot create '{}'", self.csv_path.display()))?;
        let mut f = BufWriter::new(file);

        writeln!(f, "bin,lo,hi,contigs,training,validation,test")?;
        for row in rows {
            let bin = row.bin.map_or_else(|| "unassigned".to_string(), |b| b.to_string());
            let (lo, hi) = row
                .range
                .map_or((String::new(), String::new()), |r| (r.lo.to_string(), r.hi.to_string()));
            writeln!(
                f,
                "{},{},{},{},{},{},{}",
                bin, lo, hi, row.contigs, row.training, row.validation, row.test
            )?;
        }
        f.flush()?;

        tracing::debug!("Wrote split report: '{}'", self.csv_path.display());
        Ok(())
    }
}
