//! Error types for dataset operations.

use thiserror::Error;

/// Result type for dataset operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading or cleaning the dataset.
#[derive(Debug, Error)]
pub enum DataError {
    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Too many rows were rejected during ingestion
    #[error(
        "rejected {rejected} of {total} rows ({fraction:.1}%), above the configured tolerance"
    )]
    RejectionToleranceExceeded {
        /// Number of rejected rows
        rejected: usize,
        /// Total number of rows seen
        total: usize,
        /// Rejected fraction as a percentage
        fraction: f64,
    },

    /// A numeric column has no usable values to impute from
    #[error("column '{0}' has no usable values")]
    EmptyColumn(&'static str),

    /// The dataset contains no usable rows
    #[error("dataset is empty after cleaning")]
    EmptyDataset,
}
