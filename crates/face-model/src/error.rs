//! Errors raised by the face model contracts.

use std::path::PathBuf;

/// Errors that can occur when loading frame streams or validating thresholds.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error on line {line}: {source}")]
    ParseError {
        line: usize,
        source: serde_json::Error,
    },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: f64 },
}
