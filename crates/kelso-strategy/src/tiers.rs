//! Risk-tier naming for clusters.
//!
//! Cluster indices out of k-means are arbitrary, so tiers are assigned by
//! ranking clusters on their members' mean predicted default probability.
//! With the default four clusters the ranks carry the named tiers, safest
//! cluster first; for any other k the ranks are reported as numbered tiers
//! instead of aborting the run. An empty cluster ranks last; equal means
//! resolve by cluster index.

use crate::error::{Result, StrategyError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Business risk tier, safest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskTier {
    /// Lowest mean PD: healthy, creditworthy businesses
    Stable,
    /// Low-to-moderate mean PD
    Growing,
    /// Elevated mean PD, typically cash-strapped
    LiquidityStressed,
    /// Highest mean PD
    HighRisk,
}

/// Tiers in rank order, safest first.
const TIER_ORDER: [RiskTier; 4] = [
    RiskTier::Stable,
    RiskTier::Growing,
    RiskTier::LiquidityStressed,
    RiskTier::HighRisk,
];

impl RiskTier {
    /// Human-readable tier name as reported in exports.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Stable => "Stable",
            Self::Growing => "Growing",
            Self::LiquidityStressed => "Liquidity-Stressed",
            Self::HighRisk => "High-Risk",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The tier label of one cluster.
///
/// Four clusters carry the named tiers; any other cluster count falls back
/// to `Tier {rank}` names (1 = safest) so non-default `k` still produces a
/// complete report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TierLabel {
    /// One of the four named tiers
    Named(RiskTier),
    /// Rank-based label for a non-default cluster count, 1 = safest
    Ranked(usize),
}

impl fmt::Display for TierLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(tier) => f.write_str(tier.name()),
            Self::Ranked(rank) => write!(f, "Tier {rank}"),
        }
    }
}

/// Assign a tier label to each of `k` clusters by mean predicted default
/// probability, returning a vector indexed by cluster label.
///
/// # Errors
///
/// Returns [`StrategyError::InvalidConfig`] when `k` is zero,
/// [`StrategyError::LengthMismatch`] when labels and probabilities differ in
/// length, [`StrategyError::ClusterOutOfRange`] for a label ≥ `k`, and
/// [`StrategyError::EmptyInput`] for empty inputs.
pub fn assign_tiers(cluster_labels: &[usize], pds: &[f64], k: usize) -> Result<Vec<TierLabel>> {
    if k == 0 {
        return Err(StrategyError::InvalidConfig(
            "tier naming requires at least one cluster".to_string(),
        ));
    }
    if cluster_labels.len() != pds.len() {
        return Err(StrategyError::LengthMismatch {
            expected: cluster_labels.len(),
            actual: pds.len(),
        });
    }
    if cluster_labels.is_empty() {
        return Err(StrategyError::EmptyInput("tier assignment"));
    }

    let mut sums = vec![0.0; k];
    let mut counts = vec![0usize; k];
    for (&label, &pd) in cluster_labels.iter().zip(pds.iter()) {
        if label >= k {
            return Err(StrategyError::ClusterOutOfRange { label, k });
        }
        sums[label] += pd;
        counts[label] += 1;
    }

    // Mean PD per cluster; an empty cluster sorts after every real one.
    let means: Vec<f64> = (0..k)
        .map(|c| {
            if counts[c] > 0 {
                sums[c] / counts[c] as f64
            } else {
                f64::INFINITY
            }
        })
        .collect();

    let mut order: Vec<usize> = (0..k).collect();
    order.sort_by(|&a, &b| {
        means[a]
            .partial_cmp(&means[b])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut tiers = vec![TierLabel::Ranked(0); k];
    for (rank, &cluster) in order.iter().enumerate() {
        tiers[cluster] = if k == TIER_ORDER.len() {
            TierLabel::Named(TIER_ORDER[rank])
        } else {
            TierLabel::Ranked(rank + 1)
        };
    }
    Ok(tiers)
}
