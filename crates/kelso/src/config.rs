//! Pipeline configuration.
//!
//! One immutable config drives a run. Stage configs keep their own
//! defaults; [`PipelineConfig::with_seed`] pushes a single seed into every
//! seeded stage so a run is reproducible from one number.

use crate::error::{PipelineError, Result};
use kelso_model::{KMeansConfig, PcaConfig, RiskModelConfig};
use kelso_strategy::StrategyConfig;
use serde::{Deserialize, Serialize};

/// Configuration for a full pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Dimensionality reduction settings.
    pub pca: PcaConfig,

    /// Segmentation settings.
    pub kmeans: KMeansConfig,

    /// Risk model training settings.
    pub risk_model: RiskModelConfig,

    /// Scoring and rate-action thresholds.
    pub strategy: StrategyConfig,

    /// Fraction of records held out for evaluation (default: 0.2).
    pub test_fraction: f64,

    /// Probability threshold for hard predictions in evaluation
    /// (default: 0.5).
    pub decision_threshold: f64,

    /// Seed for the train/test split (default: 42).
    pub seed: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pca: PcaConfig::default(),
            kmeans: KMeansConfig::default(),
            risk_model: RiskModelConfig::default(),
            strategy: StrategyConfig::default(),
            test_fraction: 0.2,
            decision_threshold: 0.5,
            seed: 42,
        }
    }
}

impl PipelineConfig {
    /// Push one seed into every seeded stage.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.kmeans.seed = seed;
        self.risk_model.seed = seed;
        self
    }

    /// Check the run-level settings; stage configs validate at fit time.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] for an out-of-range fraction
    /// or threshold.
    pub fn validate(&self) -> Result<()> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "test fraction must lie in (0, 1), got {}",
                self.test_fraction
            )));
        }
        if !(self.decision_threshold > 0.0 && self.decision_threshold < 1.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "decision threshold must lie in (0, 1), got {}",
                self.decision_threshold
            )));
        }
        self.strategy.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_with_seed_reaches_every_stage() {
        let config = PipelineConfig::default().with_seed(7);
        assert_eq!(config.seed, 7);
        assert_eq!(config.kmeans.seed, 7);
        assert_eq!(config.risk_model.seed, 7);
    }

    #[test]
    fn test_bad_fraction_rejected() {
        let config = PipelineConfig {
            test_fraction: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_threshold_rejected() {
        let config = PipelineConfig {
            decision_threshold: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let config = PipelineConfig::default().with_seed(13);
        let json = serde_json::to_string(&config).unwrap();
        let restored: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.seed, 13);
        assert_eq!(restored.kmeans.k, config.kmeans.k);
    }
}
