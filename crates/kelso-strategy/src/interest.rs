//! Interest-rate action recommendation.
//!
//! A rate reduction is offered only to accounts that are both safe and
//! heavily using their overdraft: predicted default probability strictly
//! below the PD threshold AND utilization strictly above the utilization
//! threshold. Everything else keeps the standard rate. Both comparisons
//! are strict, so a business sitting exactly on either threshold is not
//! offered the reduction.

use crate::error::{Result, StrategyError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Thresholds for the rate-reduction decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// PD strictly below this qualifies (default: 0.15).
    pub pd_threshold: f64,

    /// Utilization strictly above this qualifies (default: 0.70).
    pub od_util_threshold: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            pd_threshold: 0.15,
            od_util_threshold: 0.70,
        }
    }
}

impl StrategyConfig {
    /// Check thresholds lie in (0, 1).
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::InvalidConfig`] for a threshold outside (0, 1).
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("pd threshold", self.pd_threshold),
            ("utilization threshold", self.od_util_threshold),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(StrategyError::InvalidConfig(format!(
                    "{name} must lie in (0, 1), got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// The recommended interest-rate action for one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateAction {
    /// Low-risk, high-utilization account: offer a reduced rate
    ReduceRate,
    /// Keep the standard rate
    MaintainRate,
}

impl RateAction {
    /// Human-readable action name as reported in exports.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ReduceRate => "Reduce Rate",
            Self::MaintainRate => "Maintain Rate",
        }
    }
}

impl fmt::Display for RateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Recommend a rate action from predicted default probability and
/// current overdraft utilization.
pub fn recommend_rate(pd: f64, od_utilization: f64, config: &StrategyConfig) -> RateAction {
    if pd < config.pd_threshold && od_utilization > config.od_util_threshold {
        RateAction::ReduceRate
    } else {
        RateAction::MaintainRate
    }
}
