//! Training labels for the risk model.
//!
//! When the dataset carries a ground-truth default flag it is used directly.
//! Otherwise a record is labelled high-risk by the stress proxy: at least
//! two of {OD utilization above 0.7, debt-to-revenue above 0.15, credit
//! score below 600}.

use kelso_data::BusinessRecord;
use serde::{Deserialize, Serialize};

/// OD utilization level counted as a stress condition.
const STRESS_UTILIZATION: f64 = 0.7;

/// Debt-to-revenue ratio counted as a stress condition.
const STRESS_DEBT_TO_REVENUE: f64 = 0.15;

/// Credit score below which a stress condition is counted.
const STRESS_CREDIT_SCORE: f64 = 600.0;

/// Where a record's training label came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelPolicy {
    /// The dataset's default flag was present and used
    GroundTruth,

    /// The three-condition stress proxy labelled the record
    StressProxy,
}

/// Proxy label: true when at least two stress conditions hold.
pub fn proxy_high_risk(record: &BusinessRecord) -> bool {
    let conditions = u8::from(record.od_utilization > STRESS_UTILIZATION)
        + u8::from(record.debt_to_revenue > STRESS_DEBT_TO_REVENUE)
        + u8::from(record.credit_score < STRESS_CREDIT_SCORE);
    conditions >= 2
}

/// Training labels for a record set, with the policy used per record.
pub fn training_labels(records: &[BusinessRecord]) -> Vec<(bool, LabelPolicy)> {
    records
        .iter()
        .map(|r| {
            r.defaulted.map_or_else(
                || (proxy_high_risk(r), LabelPolicy::StressProxy),
                |d| (d, LabelPolicy::GroundTruth),
            )
        })
        .collect()
}
