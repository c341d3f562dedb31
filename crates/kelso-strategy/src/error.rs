//! Error types for strategy decisions.

use thiserror::Error;

/// Result type for strategy operations.
pub type Result<T> = std::result::Result<T, StrategyError>;

/// Errors that can occur while deriving scores, actions or tiers.
#[derive(Debug, Error)]
pub enum StrategyError {
    /// Paired inputs have different lengths
    #[error("length mismatch: expected {expected} values, got {actual}")]
    LengthMismatch {
        /// Expected number of values
        expected: usize,
        /// Number of values supplied
        actual: usize,
    },

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Empty input where at least one value is required
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// A cluster label refers to a cluster that does not exist
    #[error("cluster label {label} out of range for {k} clusters")]
    ClusterOutOfRange {
        /// The offending label
        label: usize,
        /// Cluster count
        k: usize,
    },
}
