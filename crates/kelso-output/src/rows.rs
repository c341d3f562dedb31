//! Per-business strategy output.

use kelso_strategy::{RateAction, TierLabel};
use serde::{Deserialize, Serialize};

/// The pipeline's verdict for a single business.
///
/// Tier and action are stored as their display names so the row serializes
/// flat for CSV and reads naturally in JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrategyRow {
    /// Business identifier from the input data.
    pub business_id: String,

    /// Sector name.
    pub sector: String,

    /// Cluster label assigned by segmentation.
    pub cluster: usize,

    /// Risk-tier name of the cluster.
    pub tier: String,

    /// Predicted probability of default.
    pub pd: f64,

    /// Overdraft suitability score, (1 − PD) × cash ratio.
    pub od_score: f64,

    /// Current overdraft utilization.
    pub od_utilization: f64,

    /// Engineered cash ratio (capped upstream).
    pub cash_ratio: f64,

    /// Monthly profit.
    pub profit: f64,

    /// Profit margin.
    pub profit_margin: f64,

    /// Recommended interest-rate action.
    pub action: String,
}

impl StrategyRow {
    /// Assemble a row from pipeline outputs.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        business_id: String,
        sector: String,
        cluster: usize,
        tier: TierLabel,
        pd: f64,
        od_score: f64,
        od_utilization: f64,
        cash_ratio: f64,
        profit: f64,
        profit_margin: f64,
        action: RateAction,
    ) -> Self {
        Self {
            business_id,
            sector,
            cluster,
            tier: tier.to_string(),
            pd,
            od_score,
            od_utilization,
            cash_ratio,
            profit,
            profit_margin,
            action: action.name().to_string(),
        }
    }

    /// Whether the row carries a rate-reduction recommendation.
    pub fn reduces_rate(&self) -> bool {
        self.action == RateAction::ReduceRate.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kelso_strategy::RiskTier;

    #[test]
    fn test_row_carries_display_names() {
        let row = StrategyRow::new(
            "B0001".to_string(),
            "Retail".to_string(),
            2,
            TierLabel::Named(RiskTier::Stable),
            0.10,
            0.45,
            0.80,
            0.5,
            3_000.0,
            0.3,
            RateAction::ReduceRate,
        );

        assert_eq!(row.tier, "Stable");
        assert_eq!(row.action, "Reduce Rate");
        assert!(row.reduces_rate());
    }

    #[test]
    fn test_maintain_rate_not_a_reduction() {
        let row = StrategyRow::new(
            "B0002".to_string(),
            "Logistics".to_string(),
            1,
            TierLabel::Named(RiskTier::HighRisk),
            0.80,
            0.05,
            0.20,
            0.25,
            -500.0,
            -0.1,
            RateAction::MaintainRate,
        );
        assert!(!row.reduces_rate());
    }
}
