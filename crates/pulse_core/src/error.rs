//! Core error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or assembling survey data
#[derive(Error, Debug)]
pub enum PulseError {
    /// The dataset file could not be opened
    #[error("failed to open dataset {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected the input
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// The header row is missing or empty
    #[error("dataset has no columns")]
    NoColumns,

    /// Two header cells share a name
    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    /// A data row does not match the header width
    #[error("row {row} has {found} fields, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, PulseError>;
