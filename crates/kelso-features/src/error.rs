//! Error types for feature derivation.

use thiserror::Error;

/// Result type for feature operations.
pub type Result<T> = std::result::Result<T, FeatureError>;

/// Errors that can occur while assembling features.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// A derived or raw value came out non-finite. Fatal: letting NaN or
    /// infinity into the matrix would corrupt every downstream score.
    #[error("non-finite value in column '{column}' at row {row}")]
    NonFinite {
        /// Zero-based record index
        row: usize,
        /// Feature column name
        column: &'static str,
    },

    /// No records were supplied
    #[error("no records to assemble features from")]
    EmptyInput,
}
