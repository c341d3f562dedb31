//! Sector × cluster summary reporting.
//!
//! Aggregates the per-business strategy rows into one row per
//! (sector, cluster) group, ordered sector-lexicographic then cluster
//! ascending so repeated runs diff cleanly.

use crate::rows::StrategyRow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Aggregate figures for one (sector, cluster) group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectorClusterSummary {
    /// Sector name.
    pub sector: String,

    /// Cluster label.
    pub cluster: usize,

    /// Risk-tier name of the cluster.
    pub tier: String,

    /// Number of businesses in the group.
    pub businesses: usize,

    /// Mean predicted default probability.
    pub mean_pd: f64,

    /// Mean overdraft suitability score.
    pub mean_od_score: f64,

    /// Mean overdraft utilization.
    pub mean_utilization: f64,

    /// Mean engineered cash ratio.
    pub mean_cash_ratio: f64,

    /// Mean monthly profit.
    pub mean_profit: f64,

    /// Mean profit margin.
    pub mean_margin: f64,

    /// Businesses recommended a rate reduction.
    pub eligible: usize,

    /// Fraction of the group recommended a rate reduction.
    pub reduction_rate: f64,
}

/// The full sector report for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectorReport {
    /// Date the report was generated.
    pub generated: NaiveDate,

    /// One row per (sector, cluster) group, in stable order.
    pub rows: Vec<SectorClusterSummary>,
}

impl SectorReport {
    /// Aggregate strategy rows into a sector report.
    pub fn summarize(rows: &[StrategyRow], generated: NaiveDate) -> Self {
        #[derive(Default)]
        struct Acc {
            tier: String,
            count: usize,
            pd_sum: f64,
            score_sum: f64,
            util_sum: f64,
            cash_ratio_sum: f64,
            profit_sum: f64,
            margin_sum: f64,
            reductions: usize,
        }

        // BTreeMap keys give the stable (sector, cluster) ordering.
        let mut groups: BTreeMap<(String, usize), Acc> = BTreeMap::new();
        for row in rows {
            let acc = groups
                .entry((row.sector.clone(), row.cluster))
                .or_insert_with(|| Acc {
                    tier: row.tier.clone(),
                    ..Default::default()
                });
            acc.count += 1;
            acc.pd_sum += row.pd;
            acc.score_sum += row.od_score;
            acc.util_sum += row.od_utilization;
            acc.cash_ratio_sum += row.cash_ratio;
            acc.profit_sum += row.profit;
            acc.margin_sum += row.profit_margin;
            if row.reduces_rate() {
                acc.reductions += 1;
            }
        }

        let rows = groups
            .into_iter()
            .map(|((sector, cluster), acc)| {
                let n = acc.count as f64;
                SectorClusterSummary {
                    sector,
                    cluster,
                    tier: acc.tier,
                    businesses: acc.count,
                    mean_pd: acc.pd_sum / n,
                    mean_od_score: acc.score_sum / n,
                    mean_utilization: acc.util_sum / n,
                    mean_cash_ratio: acc.cash_ratio_sum / n,
                    mean_profit: acc.profit_sum / n,
                    mean_margin: acc.margin_sum / n,
                    eligible: acc.reductions,
                    reduction_rate: acc.reductions as f64 / n,
                }
            })
            .collect();

        Self { generated, rows }
    }

    /// Number of businesses covered by the report.
    pub fn total_businesses(&self) -> usize {
        self.rows.iter().map(|r| r.businesses).sum()
    }

    /// Sectors ranked riskiest first by business-weighted mean PD.
    pub fn sector_risk_ranking(&self) -> Vec<(String, f64)> {
        let mut totals: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        for row in &self.rows {
            let entry = totals.entry(row.sector.clone()).or_insert((0.0, 0));
            entry.0 += row.mean_pd * row.businesses as f64;
            entry.1 += row.businesses;
        }

        let mut ranking: Vec<(String, f64)> = totals
            .into_iter()
            .map(|(sector, (pd_sum, count))| (sector, pd_sum / count as f64))
            .collect();
        ranking.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranking
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nSector Report ({})\n", self.generated));
        output.push_str(&"=".repeat(92));
        output.push('\n');
        output.push_str(&format!(
            "{:<16} {:>7} {:<20} {:>6} {:>9} {:>9} {:>9} {:>9}\n",
            "Sector", "Cluster", "Tier", "Count", "Mean PD", "OD Score", "Util.", "Reduced"
        ));
        output.push_str(&"-".repeat(92));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<16} {:>7} {:<20} {:>6} {:>9.4} {:>9.4} {:>8.1}% {:>8.1}%\n",
                row.sector,
                row.cluster,
                row.tier,
                row.businesses,
                row.mean_pd,
                row.mean_od_score,
                row.mean_utilization * 100.0,
                row.reduction_rate * 100.0
            ));
        }

        output.push_str(&"=".repeat(92));
        output.push('\n');
        output.push_str(&format!("Total businesses: {}\n", self.total_businesses()));

        output
    }

    /// Format as Markdown for documentation.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# Sector Report ({})\n\n", self.generated));
        output.push_str(
            "| Sector | Cluster | Tier | Count | Mean PD | Mean OD Score | Mean Util. | Reduced |\n",
        );
        output.push_str(
            "|--------|---------|------|-------|---------|---------------|------------|--------|\n",
        );

        for row in &self.rows {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {:.4} | {:.4} | {:.1}% | {:.1}% |\n",
                row.sector,
                row.cluster,
                row.tier,
                row.businesses,
                row.mean_pd,
                row.mean_od_score,
                row.mean_utilization * 100.0,
                row.reduction_rate * 100.0
            ));
        }

        output
    }
}

impl fmt::Display for SectorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sector Report ({})", self.generated)?;
        for row in &self.rows {
            writeln!(
                f,
                "  {} / cluster {} ({}): {} businesses, mean PD {:.4}",
                row.sector, row.cluster, row.tier, row.businesses, row.mean_pd
            )?;
        }
        Ok(())
    }
}
