//! Ordered feature-matrix assembly.
//!
//! The scaler, PCA and every later stage rely on one fixed column order:
//! the fifteen raw numeric fields followed by the three engineered ratios.
//! [`FeatureMatrix`] is the only place that order is defined.

use crate::engineer::engineer;
use crate::error::{FeatureError, Result};
use kelso_data::BusinessRecord;
use ndarray::Array2;

/// Ordered model feature columns: raw numerics first, engineered last.
pub const FEATURE_NAMES: [&str; 18] = [
    "Revenue_per_Day",
    "Expense_per_Day",
    "Monthly_Revenue",
    "Monthly_Expense",
    "Cash_Inflow_Adjusted",
    "Cash_Outflow_Adjusted",
    "OD_Required",
    "OD_Utilization",
    "Inventory_Days",
    "Receivable_Days",
    "Payable_Days",
    "Cash_Conversion_Cycle",
    "Credit_Score",
    "Debt_to_Revenue_Ratio",
    "EMI_Obligation",
    "Profit",
    "ProfitMargin",
    "CashRatio",
];

/// Number of model features.
pub const fn n_features() -> usize {
    FEATURE_NAMES.len()
}

/// The assembled numeric feature matrix (records × features).
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    values: Array2<f64>,
}

impl FeatureMatrix {
    /// Assemble the matrix from validated records.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::EmptyInput`] for an empty record set and
    /// [`FeatureError::NonFinite`] if any cell comes out NaN or infinite.
    pub fn from_records(records: &[BusinessRecord]) -> Result<Self> {
        if records.is_empty() {
            return Err(FeatureError::EmptyInput);
        }

        let mut values = Array2::<f64>::zeros((records.len(), n_features()));
        for (i, record) in records.iter().enumerate() {
            let derived = engineer(record);
            let row = [
                record.revenue_per_day,
                record.expense_per_day,
                record.monthly_revenue,
                record.monthly_expense,
                record.cash_inflow_adjusted,
                record.cash_outflow_adjusted,
                record.od_required,
                record.od_utilization,
                record.inventory_days,
                record.receivable_days,
                record.payable_days,
                record.cash_conversion_cycle,
                record.credit_score,
                record.debt_to_revenue,
                record.emi_obligation,
                derived.profit,
                derived.profit_margin,
                derived.cash_ratio,
            ];
            for (j, value) in row.into_iter().enumerate() {
                if !value.is_finite() {
                    return Err(FeatureError::NonFinite {
                        row: i,
                        column: FEATURE_NAMES[j],
                    });
                }
                values[[i, j]] = value;
            }
        }

        Ok(Self { values })
    }

    /// The matrix values (records × features).
    pub const fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Number of records.
    pub fn n_records(&self) -> usize {
        self.values.nrows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use kelso_data::BusinessSector;

    fn record(id: &str) -> BusinessRecord {
        BusinessRecord {
            business_id: id.to_string(),
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
    fn test_matrix_shape_and_order() {
        let records = vec![record("B001"), record("B002")];
        let matrix = FeatureMatrix::from_records(&records).unwrap();
        assert_eq!(matrix.values().dim(), (2, 18));
        assert_eq!(matrix.n_records(), 2);

        // Engineered columns land after the raw block, in declared order.
        assert_relative_eq!(matrix.values()[[0, 15]], 3_000.0); // Profit
        assert_relative_eq!(matrix.values()[[0, 16]], 0.3); // ProfitMargin
        assert_relative_eq!(matrix.values()[[0, 17]], 0.5); // CashRatio
    }

    #[test]
    fn test_empty_input_rejected() {
        let err = FeatureMatrix::from_records(&[]).unwrap_err();
        assert!(matches!(err, FeatureError::EmptyInput));
    }

    #[test]
    fn test_non_finite_raw_value_is_fatal() {
        let mut bad = record("B001");
        bad.credit_score = f64::NAN;
        let err = FeatureMatrix::from_records(&[bad]).unwrap_err();
        assert!(matches!(
            err,
            FeatureError::NonFinite {
                row: 0,
                column: "Credit_Score"
            }
        ));
    }

    #[test]
    fn test_names_match_width() {
        assert_eq!(FEATURE_NAMES.len(), n_features());
    }
}
