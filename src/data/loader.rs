// ============================================================
// Layer 4: TSV Loaders
// ============================================================
// Reads the two raw inputs of the pipeline:
//
//   tn.contig.filter.tsv     → AnnotationTable
//     header row, then one positive interval per row
//     columns located by name: contig_ID, start, end
//
//   contigs_func/<id>.<ext>  → ContigDirLoader
//     one file per contig, header row skipped,
//     column 1 = token, column 2 = strand (ignored)
//
// Any missing file or malformed row aborts the run.

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::contig::{Annotation, Interval, RawContig};
use crate::domain::error::PrepError;
use crate::domain::traits::{AnnotationSource, ContigSource};

const CONTIG_ID_COLUMN: &str = "contig_ID";
const START_COLUMN:     &str = "start";
const END_COLUMN:       &str = "end";

// ─── AnnotationTable ──────────────────────────────────────────────────────────
/// The tab-separated table of positive-interval annotations.
pub struct AnnotationTable {
    path: PathBuf,
}

impl AnnotationTable {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AnnotationSource for AnnotationTable {
    fn load_annotations(&self) -> Result<Vec<Annotation>> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read annotation table '{}'", self.path.display()))?;

        let annotations = parse_annotations(&self.path, &text)?;
        tracing::info!(
            "Loaded {} annotations from '{}'",
            annotations.len(),
            self.path.display()
        );
        Ok(annotations)
    }
}

/// Parse the annotation table body. `path` is only used for error messages.
fn parse_annotations(path: &Path, text: &str) -> Result<Vec<Annotation>, PrepError> {
    let mut lines = text.lines();

    let header: Vec<&str> = lines
        .next()
        .map(|h| h.split('\t').map(str::trim).collect())
        .unwrap_or_default();

    let column = |name: &str| {
        header
            .iter()
            .position(|h| *h == name)
            .ok_or_else(|| PrepError::MissingColumn {
                path:   path.to_path_buf(),
                column: name.to_string(),
            })
    };
    let id_col    = column(CONTIG_ID_COLUMN)?;
    let start_col = column(START_COLUMN)?;
    let end_col   = column(END_COLUMN)?;

    let mut annotations = Vec::new();

    // Line numbers are 1-based and count the header
    for (line_no, line) in lines.enumerate().map(|(i, l)| (i + 2, l)) {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();

        let field = |idx: usize, name: &str| {
            fields.get(idx).copied().ok_or_else(|| PrepError::MalformedRow {
                path:   path.to_path_buf(),
                line:   line_no,
                reason: format!("missing field '{name}'"),
            })
        };
        let position = |idx: usize, name: &str| -> Result<usize, PrepError> {
            let raw = field(idx, name)?;
            raw.parse::<usize>().map_err(|_| PrepError::MalformedRow {
                path:   path.to_path_buf(),
                line:   line_no,
                reason: format!("'{name}' is not a position: '{raw}'"),
            })
        };

        annotations.push(Annotation {
            contig_id: field(id_col, CONTIG_ID_COLUMN)?.to_string(),
            interval:  Interval::new(position(start_col, START_COLUMN)?, position(end_col, END_COLUMN)?),
        });
    }

    Ok(annotations)
}

// ─── ContigDirLoader ──────────────────────────────────────────────────────────
/// Loads every contig file from a directory, in file-name order.
pub struct ContigDirLoader {
    dir: PathBuf,
}

impl ContigDirLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ContigSource for ContigDirLoader {
    fn load_all(&self) -> Result<Vec<RawContig>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("Cannot read contig directory '{}'", self.dir.display()))?
        {
            let path = entry?.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let mut contigs = Vec::with_capacity(paths.len());
        for path in &paths {
            let contig = load_contig_file(path)?;
            tracing::debug!("Loaded: {} ({} tokens)", contig.origin, contig.tokens.len());
            contigs.push(contig);
        }

        tracing::info!(
            "Loaded {} contigs from '{}'",
            contigs.len(),
            self.dir.display()
        );
        Ok(contigs)
    }
}

/// Read one contig file: skip the header, keep the first column of each row.
fn load_contig_file(path: &Path) -> Result<RawContig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read contig file '{}'", path.display()))?;

    let origin = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Contig file name is not valid UTF-8: '{}'", path.display()))?
        .to_string();

    Ok(RawContig::new(origin, parse_tokens(&text)))
}

fn parse_tokens(text: &str) -> Vec<String> {
    text.lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split('\t').next().unwrap_or("").trim().to_string())
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_annotations_by_column_name() {
        let text = "len\tend\tcontig_ID\tstart\n3\t5\t12\t3\n\n2\t2\t7\t1\n";
        let ann  = parse_annotations(Path::new("t.tsv"), text).unwrap();

        assert_eq!(ann.len(), 2);
        assert_eq!(ann[0].contig_id, "12");
        assert_eq!(ann[0].interval, Interval::new(3, 5));
        assert_eq!(ann[1].contig_id, "7");
        assert_eq!(ann[1].interval, Interval::new(1, 2));
    }

    #[test]
    fn test_missing_column_is_rejected() {
        let text = "contig_ID\tstart\n1\t2\n";
        let err  = parse_annotations(Path::new("t.tsv"), text).unwrap_err();
        assert!(matches!(err, PrepError::MissingColumn { ref column, .. } if column == "end"));
    }

    #[test]
    fn test_bad_position_reports_line() {
        let text = "contig_ID\tstart\tend\n1\t2\t4\n1\tx\t4\n";
        let err  = parse_annotations(Path::new("t.tsv"), text).unwrap_err();
        assert!(matches!(err, PrepError::MalformedRow { line: 3, .. }));
    }

    #[test]
    fn test_parse_tokens_skips_header_and_strand() {
        let text = "pfam\tstrand\nPF001\t+\nPF002\t-\n\nPF001\t+\n";
        assert_eq!(parse_tokens(text), vec!["PF001", "PF002", "PF001"]);
    }

    #[test]
    fn test_contig_dir_is_sorted_by_file_name() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("20.tsv"), "h\ts\nB\t+\n").unwrap();
        fs::write(tmp.path().join("10.tsv"), "h\ts\nA\t+\nC\t-\n").unwrap();

        let contigs = ContigDirLoader::new(tmp.path()).load_all().unwrap();
        assert_eq!(contigs.len(), 2);
        assert_eq!(contigs[0].origin, "10.tsv");
        assert_eq!(contigs[0].tokens, vec!["A", "C"]);
        assert_eq!(contigs[1].origin, "20.tsv");
    }

    #[test]
    fn test_missing_inputs_are_fatal() {
        let tmp = TempDir::new().unwrap();
        assert!(ContigDirLoader::new(tmp.path().join("nope")).load_all().is_err());
        assert!(AnnotationTable::new(tmp.path().join("nope.tsv")).load_annotations().is_err());
    }
}
