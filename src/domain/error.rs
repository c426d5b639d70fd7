//! Typed errors raised by the preparation pipeline

use std::path::PathBuf;

use thiserror::Error;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PrepError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Interval [{start}, {end}] is out of bounds for contig '{contig}' of length {length}")]
    IntervalOutOfBounds {
        contig: String,
        start:  usize,
        end:    usize,
        length: usize,
    },

    #[error("Token '{0}' missing from vocabulary")]
    MissingToken(String),

    #[error("Malformed row {line} in '{}': {reason}", .path.display())]
    MalformedRow {
        path:   PathBuf,
        line:   usize,
        reason: String,
    },

    #[error("Column '{column}' missing from '{}'", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("Invalid vocabulary: {0}")]
    InvalidVocabulary(String),

    #[error("Key '{key}' not found in result store. Have you run 'prepare' first?")]
    MissingKey { key: String },
}
