//! Cleaning pass: duplicate removal and median imputation.
//!
//! Mirrors the preprocessing contract of the scoring pipeline: exact
//! duplicate rows are dropped, missing numeric values are filled with the
//! column median, and rows without a recognizable sector are dropped.

use crate::error::{DataError, Result};
use crate::record::{BusinessRecord, RawRow};
use crate::sector::BusinessSector;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Outcome of a cleaning pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanReport {
    /// Exact duplicate rows removed
    pub duplicates_removed: usize,

    /// Individual numeric values filled with the column median
    pub values_imputed: usize,

    /// Rows dropped for a missing or unrecognized sector
    pub dropped_missing_sector: usize,

    /// Rows surviving the cleaning pass
    pub rows_out: usize,
}

/// Hashable identity of a raw row, for duplicate detection. Numeric fields
/// compare by bit pattern, so rows are duplicates only when every field
/// matches exactly.
fn row_key(row: &RawRow) -> (String, Option<String>, [Option<u64>; 15], Option<u8>) {
    let bits = [
        row.revenue_per_day.map(f64::to_bits),
        row.expense_per_day.map(f64::to_bits),
        row.monthly_revenue.map(f64::to_bits),
        row.monthly_expense.map(f64::to_bits),
        row.cash_inflow_adjusted.map(f64::to_bits),
        row.cash_outflow_adjusted.map(f64::to_bits),
        row.od_required.map(f64::to_bits),
        row.od_utilization.map(f64::to_bits),
        row.inventory_days.map(f64::to_bits),
        row.receivable_days.map(f64::to_bits),
        row.payable_days.map(f64::to_bits),
        row.cash_conversion_cycle.map(f64::to_bits),
        row.credit_score.map(f64::to_bits),
        row.debt_to_revenue.map(f64::to_bits),
        row.emi_obligation.map(f64::to_bits),
    ];
    (
        row.business_id.clone(),
        row.business_type.clone(),
        bits,
        row.default_flag,
    )
}

/// Median of the present values of one column. Even-length columns use the
/// midpoint of the two central values, matching the source dataset's
/// imputation convention.
fn column_median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

/// Fill missing values of one numeric column with its median.
fn impute_column<G, S>(
    rows: &mut [RawRow],
    name: &'static str,
    get: G,
    set: S,
    imputed: &mut usize,
) -> Result<()>
where
    G: Fn(&RawRow) -> Option<f64>,
    S: Fn(&mut RawRow, f64),
{
    let present: Vec<f64> = rows.iter().filter_map(&get).collect();
    if present.len() == rows.len() {
        return Ok(());
    }
    let median = column_median(present).ok_or(DataError::EmptyColumn(name))?;
    for row in rows.iter_mut() {
        if get(row).is_none() {
            set(row, median);
            *imputed += 1;
        }
    }
    Ok(())
}

/// Clean raw rows into validated [`BusinessRecord`]s.
///
/// # Errors
///
/// Returns [`DataError::EmptyColumn`] when a numeric column has no values at
/// all, or [`DataError::EmptyDataset`] when no row survives.
pub fn clean_rows(rows: Vec<RawRow>) -> Result<(Vec<BusinessRecord>, CleanReport)> {
    let before = rows.len();

    // Drop exact duplicates, keeping first occurrence and input order.
    let mut seen = HashSet::with_capacity(rows.len());
    let mut deduped: Vec<RawRow> = Vec::with_capacity(rows.len());
    for row in rows {
        if seen.insert(row_key(&row)) {
            deduped.push(row);
        }
    }
    let duplicates_removed = before - deduped.len();

    let mut values_imputed = 0;
    impute_column(
        &mut deduped,
        "Revenue_per_Day",
        |r| r.revenue_per_day,
        |r, v| r.revenue_per_day = Some(v),
        &mut values_imputed,
    )?;
    impute_column(
        &mut deduped,
        "Expense_per_Day",
        |r| r.expense_per_day,
        |r, v| r.expense_per_day = Some(v),
        &mut values_imputed,
    )?;
    impute_column(
        &mut deduped,
        "Monthly_Revenue",
        |r| r.monthly_revenue,
        |r, v| r.monthly_revenue = Some(v),
        &mut values_imputed,
    )?;
    impute_column(
        &mut deduped,
        "Monthly_Expense",
        |r| r.monthly_expense,
        |r, v| r.monthly_expense = Some(v),
        &mut values_imputed,
    )?;
    impute_column(
        &mut deduped,
        "Cash_Inflow_Adjusted",
        |r| r.cash_inflow_adjusted,
        |r, v| r.cash_inflow_adjusted = Some(v),
        &mut values_imputed,
    )?;
    impute_column(
        &mut deduped,
        "Cash_Outflow_Adjusted",
        |r| r.cash_outflow_adjusted,
        |r, v| r.cash_outflow_adjusted = Some(v),
        &mut values_imputed,
    )?;
    impute_column(
        &mut deduped,
        "OD_Required",
        |r| r.od_required,
        |r, v| r.od_required = Some(v),
        &mut values_imputed,
    )?;
    impute_column(
        &mut deduped,
        "OD_Utilization",
        |r| r.od_utilization,
        |r, v| r.od_utilization = Some(v),
        &mut values_imputed,
    )?;
    impute_column(
        &mut deduped,
        "Inventory_Days",
        |r| r.inventory_days,
        |r, v| r.inventory_days = Some(v),
        &mut values_imputed,
    )?;
    impute_column(
        &mut deduped,
        "Receivable_Days",
        |r| r.receivable_days,
        |r, v| r.receivable_days = Some(v),
        &mut values_imputed,
    )?;
    impute_column(
        &mut deduped,
        "Payable_Days",
        |r| r.payable_days,
        |r, v| r.payable_days = Some(v),
        &mut values_imputed,
    )?;
    impute_column(
        &mut deduped,
        "Cash_Conversion_Cycle",
        |r| r.cash_conversion_cycle,
        |r, v| r.cash_conversion_cycle = Some(v),
        &mut values_imputed,
    )?;
    impute_column(
        &mut deduped,
        "Credit_Score",
        |r| r.credit_score,
        |r, v| r.credit_score = Some(v),
        &mut values_imputed,
    )?;
    impute_column(
        &mut deduped,
        "Debt_to_Revenue_Ratio",
        |r| r.debt_to_revenue,
        |r, v| r.debt_to_revenue = Some(v),
        &mut values_imputed,
    )?;
    impute_column(
        &mut deduped,
        "EMI_Obligation",
        |r| r.emi_obligation,
        |r, v| r.emi_obligation = Some(v),
        &mut values_imputed,
    )?;

    let mut dropped_missing_sector = 0;
    let mut records = Vec::with_capacity(deduped.len());
    for row in deduped {
        let sector = row
            .business_type
            .as_deref()
            .and_then(BusinessSector::from_name);
        let Some(sector) = sector else {
            dropped_missing_sector += 1;
            continue;
        };

        // All numeric fields are Some after imputation.
        records.push(BusinessRecord {
            business_id: row.business_id,
            sector,
            revenue_per_day: row.revenue_per_day.unwrap_or_default(),
            expense_per_day: row.expense_per_day.unwrap_or_default(),
            monthly_revenue: row.monthly_revenue.unwrap_or_default(),
            monthly_expense: row.monthly_expense.unwrap_or_default(),
            cash_inflow_adjusted: row.cash_inflow_adjusted.unwrap_or_default(),
            cash_outflow_adjusted: row.cash_outflow_adjusted.unwrap_or_default(),
            od_required: row.od_required.unwrap_or_default(),
            od_utilization: row.od_utilization.unwrap_or_default(),
            inventory_days: row.inventory_days.unwrap_or_default(),
            receivable_days: row.receivable_days.unwrap_or_default(),
            payable_days: row.payable_days.unwrap_or_default(),
            cash_conversion_cycle: row.cash_conversion_cycle.unwrap_or_default(),
            credit_score: row.credit_score.unwrap_or_default(),
            debt_to_revenue: row.debt_to_revenue.unwrap_or_default(),
            emi_obligation: row.emi_obligation.unwrap_or_default(),
            defaulted: row.default_flag.map(|v| v != 0),
        });
    }

    if records.is_empty() {
        return Err(DataError::EmptyDataset);
    }

    let report = CleanReport {
        duplicates_removed,
        values_imputed,
        dropped_missing_sector,
        rows_out: records.len(),
    };
    Ok((records, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn raw(id: &str) -> RawRow {
        RawRow {
            business_id: id.to_string(),
            business_type: Some("Retail".to_string()),
            revenue_per_day: Some(400.0),
            expense_per_day: Some(280.0),
            monthly_revenue: Some(12_000.0),
            monthly_expense: Some(8_400.0),
            cash_inflow_adjusted: Some(5_000.0),
            cash_outflow_adjusted: Some(4_200.0),
            od_required: Some(10_000.0),
            od_utilization: Some(0.55),
            inventory_days: Some(30.0),
            receivable_days: Some(45.0),
            payable_days: Some(20.0),
            cash_conversion_cycle: Some(55.0),
            credit_score: Some(690.0),
            debt_to_revenue: Some(0.12),
            emi_obligation: Some(900.0),
            default_flag: Some(0),
        }
    }

    #[test]
    fn test_duplicates_removed() {
        let rows = vec![raw("B001"), raw("B001"), raw("B002")];
        let (records, report) = clean_rows(rows).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(report.duplicates_removed, 1);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence_order() {
        // Interleaved duplicates, including a row with a missing value and a
        // near-duplicate differing in one field.
        let mut missing = raw("B003");
        missing.monthly_revenue = None;
        let mut near = raw("B001");
        near.credit_score = Some(691.0);

        let rows = vec![
            raw("B001"),
            raw("B002"),
            raw("B001"),
            missing.clone(),
            near,
            raw("B002"),
            missing,
        ];
        let (records, report) = clean_rows(rows).unwrap();

        assert_eq!(report.duplicates_removed, 3);
        let ids: Vec<&str> = records.iter().map(|r| r.business_id.as_str()).collect();
        assert_eq!(ids, vec!["B001", "B002", "B003", "B001"]);
    }

    #[test]
    fn test_median_imputation_odd_count() {
        let mut a = raw("B001");
        let mut b = raw("B002");
        let mut c = raw("B003");
        a.monthly_revenue = Some(10_000.0);
        b.monthly_revenue = Some(30_000.0);
        c.monthly_revenue = None;

        let (records, report) = clean_rows(vec![a, b, c]).unwrap();
        assert_eq!(report.values_imputed, 1);
        // Median of {10000, 30000} = 20000
        assert_relative_eq!(records[2].monthly_revenue, 20_000.0);
    }

    #[test]
    fn test_missing_sector_row_dropped() {
        let mut a = raw("B001");
        a.business_type = None;
        let mut b = raw("B002");
        b.business_type = Some("Spelunking".to_string());
        let c = raw("B003");

        let (records, report) = clean_rows(vec![a, b, c]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(report.dropped_missing_sector, 2);
        assert_eq!(records[0].business_id, "B003");
    }

    #[test]
    fn test_fully_missing_column_is_fatal() {
        let mut a = raw("B001");
        let mut b = raw("B002");
        a.credit_score = None;
        b.credit_score = None;
        let err = clean_rows(vec![a, b]).unwrap_err();
        assert!(matches!(err, DataError::EmptyColumn("Credit_Score")));
    }

    #[test]
    fn test_default_flag_mapping() {
        let mut a = raw("B001");
        a.default_flag = Some(1);
        let mut b = raw("B002");
        b.default_flag = None;

        let (records, _) = clean_rows(vec![a, b]).unwrap();
        assert_eq!(records[0].defaulted, Some(true));
        assert_eq!(records[1].defaulted, None);
    }
}
