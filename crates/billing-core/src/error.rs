use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the billing dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The dataset file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected the input.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A column the pipeline depends on is absent from the header row.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// An `Age` cell could not be read as a non-negative integer.
    #[error("Invalid age on row {row}: {value:?}")]
    InvalidAge { row: usize, value: String },

    /// A `Date of Admission` cell did not match any recognised format.
    #[error("Invalid admission date on row {row}: {value:?}")]
    InvalidDate { row: usize, value: String },
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;
