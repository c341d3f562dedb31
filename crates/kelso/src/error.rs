//! Pipeline-level error type.

use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while running the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Feature engineering or matrix assembly failed
    #[error("feature stage: {0}")]
    Feature(#[from] kelso_features::FeatureError),

    /// A model stage failed to fit or apply
    #[error("model stage: {0}")]
    Model(#[from] kelso_model::ModelError),

    /// A strategy stage rejected its inputs
    #[error("strategy stage: {0}")]
    Strategy(#[from] kelso_strategy::StrategyError),

    /// Invalid pipeline configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
