//! Derived financial ratios.
//!
//! Engineered per record:
//! - Profit       = Monthly_Revenue − Monthly_Expense
//! - ProfitMargin = Profit / Monthly_Revenue
//! - CashRatio    = Cash_Inflow_Adjusted / OD_Required
//! - CCC          = Inventory_Days + Receivable_Days − Payable_Days
//!
//! Division guards use a single sentinel policy applied uniformly: a zero
//! revenue yields a 0.0 margin, and a non-positive OD requirement yields the
//! capped cash ratio [`CASH_RATIO_CAP`] (a business needing no OD is maximally
//! liquid for OD purposes).

use kelso_data::BusinessRecord;
use serde::{Deserialize, Serialize};

/// Cash-ratio sentinel for records with a non-positive OD requirement.
pub const CASH_RATIO_CAP: f64 = 10.0;

/// Engineered features for one record. Immutable once computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineeredFeatures {
    /// Monthly profit
    pub profit: f64,

    /// Profit as a fraction of revenue
    pub profit_margin: f64,

    /// Adjusted cash inflow over the required OD limit
    pub cash_ratio: f64,

    /// Cash conversion cycle in days, recomputed from components
    pub ccc: f64,
}

/// Derive engineered features from one record. Pure and total.
pub fn engineer(record: &BusinessRecord) -> EngineeredFeatures {
    let profit = record.monthly_revenue - record.monthly_expense;

    let profit_margin = if record.monthly_revenue != 0.0 {
        profit / record.monthly_revenue
    } else {
        0.0
    };

    let cash_ratio = if record.od_required > 0.0 {
        record.cash_inflow_adjusted / record.od_required
    } else {
        CASH_RATIO_CAP
    };

    let ccc = record.inventory_days + record.receivable_days - record.payable_days;

    EngineeredFeatures {
        profit,
        profit_margin,
        cash_ratio,
        ccc,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use kelso_data::BusinessSector;

    fn record() -> BusinessRecord {
        BusinessRecord {
            business_id: "B001".to_string(),
            sector: BusinessSector::Retail,
            revenue_per_day: 333.0,
            expense_per_day: 233.0,
            monthly_revenue: 10_000.0,
            monthly_expense: 7_000.0,
            cash_inflow_adjusted: 5_000.0,
            cash_outflow_adjusted: 4_000.0,
            od_required: 10_000.0,
            od_utilization: 0.80,
            inventory_days: 30.0,
            receivable_days: 45.0,
            payable_days: 20.0,
            cash_conversion_cycle: 55.0,
            credit_score: 700.0,
            debt_to_revenue: 0.10,
            emi_obligation: 800.0,
            defaulted: None,
        }
    }

    #[test]
    fn test_reference_scenario() {
        // Revenue=10000, Expense=7000, CashInflow=5000, ODRequired=10000
        let f = engineer(&record());
        assert_relative_eq!(f.profit, 3_000.0);
        assert_relative_eq!(f.profit_margin, 0.3);
        assert_relative_eq!(f.cash_ratio, 0.5);
        assert_relative_eq!(f.ccc, 55.0);
    }

    #[test]
    fn test_profit_is_exact_difference() {
        let mut r = record();
        r.monthly_revenue = 123_456.78;
        r.monthly_expense = 98_765.43;
        let f = engineer(&r);
        assert_relative_eq!(
            f.profit,
            r.monthly_revenue - r.monthly_expense,
            epsilon = f64::EPSILON
        );
    }

    #[test]
    fn test_zero_revenue_sentinel_margin() {
        let mut r = record();
        r.monthly_revenue = 0.0;
        let f = engineer(&r);
        assert_relative_eq!(f.profit_margin, 0.0);
        assert_relative_eq!(f.profit, -7_000.0);
    }

    #[test]
    fn test_zero_od_required_sentinel_cash_ratio() {
        let mut r = record();
        r.od_required = 0.0;
        let f = engineer(&r);
        assert_relative_eq!(f.cash_ratio, CASH_RATIO_CAP);
    }

    #[test]
    fn test_negative_od_required_uses_same_sentinel() {
        let mut r = record();
        r.od_required = -5.0;
        let f = engineer(&r);
        assert_relative_eq!(f.cash_ratio, CASH_RATIO_CAP);
    }
}
