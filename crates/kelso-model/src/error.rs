//! Error types for model fitting and application.

use thiserror::Error;

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors that can occur while fitting or applying models.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Input width does not match what the artifact was fit on
    #[error("schema mismatch: fitted on {expected} features, input has {actual}")]
    SchemaMismatch {
        /// Feature count at fit time
        expected: usize,
        /// Feature count of the offending input
        actual: usize,
    },

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A computation produced NaN or infinity. Fatal: silently propagating
    /// non-finite values corrupts all downstream scores.
    #[error("numeric failure: {0}")]
    Numeric(String),

    /// Empty input where at least one row is required
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// Labels contain only one class where both are required
    #[error("degenerate labels: {0}")]
    DegenerateLabels(&'static str),

    /// Snapshot serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
