//! Record schema for one business-period observation.

use crate::sector::BusinessSector;
use serde::{Deserialize, Serialize};

/// A CSV row as it arrives from disk, before cleaning.
///
/// Numeric fields are optional so that rows with missing values survive
/// deserialization and can be median-imputed by [`crate::clean::clean_rows`].
/// Rows with malformed (non-numeric) values fail deserialization and are
/// rejected by the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    /// Unique business identifier
    #[serde(rename = "Business_ID")]
    pub business_id: String,

    /// Business type / sector name
    #[serde(rename = "Business_Type")]
    pub business_type: Option<String>,

    /// Average daily revenue
    #[serde(rename = "Revenue_per_Day")]
    pub revenue_per_day: Option<f64>,

    /// Average daily expense
    #[serde(rename = "Expense_per_Day")]
    pub expense_per_day: Option<f64>,

    /// Monthly revenue
    #[serde(rename = "Monthly_Revenue")]
    pub monthly_revenue: Option<f64>,

    /// Monthly expense
    #[serde(rename = "Monthly_Expense")]
    pub monthly_expense: Option<f64>,

    /// Seasonally adjusted cash inflow
    #[serde(rename = "Cash_Inflow_Adjusted")]
    pub cash_inflow_adjusted: Option<f64>,

    /// Seasonally adjusted cash outflow
    #[serde(rename = "Cash_Outflow_Adjusted")]
    pub cash_outflow_adjusted: Option<f64>,

    /// Overdraft limit required by the business
    #[serde(rename = "OD_Required")]
    pub od_required: Option<f64>,

    /// Fraction of the sanctioned OD limit currently drawn (0..=1)
    #[serde(rename = "OD_Utilization")]
    pub od_utilization: Option<f64>,

    /// Days of inventory on hand
    #[serde(rename = "Inventory_Days")]
    pub inventory_days: Option<f64>,

    /// Days sales outstanding
    #[serde(rename = "Receivable_Days")]
    pub receivable_days: Option<f64>,

    /// Days payables outstanding
    #[serde(rename = "Payable_Days")]
    pub payable_days: Option<f64>,

    /// Cash conversion cycle as reported in the dataset
    #[serde(rename = "Cash_Conversion_Cycle")]
    pub cash_conversion_cycle: Option<f64>,

    /// Bureau credit score
    #[serde(rename = "Credit_Score")]
    pub credit_score: Option<f64>,

    /// Debt to revenue ratio
    #[serde(rename = "Debt_to_Revenue_Ratio")]
    pub debt_to_revenue: Option<f64>,

    /// Monthly EMI obligation
    #[serde(rename = "EMI_Obligation")]
    pub emi_obligation: Option<f64>,

    /// Ground-truth default flag (0/1), when the dataset carries one
    #[serde(rename = "Default", default)]
    pub default_flag: Option<u8>,
}

/// One fully validated business-period observation.
///
/// Records are produced once per run by the cleaning pass and are read-only
/// thereafter; every downstream stage borrows them immutably.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    /// Unique business identifier
    pub business_id: String,

    /// Business sector
    pub sector: BusinessSector,

    /// Average daily revenue
    pub revenue_per_day: f64,

    /// Average daily expense
    pub expense_per_day: f64,

    /// Monthly revenue
    pub monthly_revenue: f64,

    /// Monthly expense
    pub monthly_expense: f64,

    /// Seasonally adjusted cash inflow
    pub cash_inflow_adjusted: f64,

    /// Seasonally adjusted cash outflow
    pub cash_outflow_adjusted: f64,

    /// Overdraft limit required by the business
    pub od_required: f64,

    /// Fraction of the sanctioned OD limit currently drawn (0..=1)
    pub od_utilization: f64,

    /// Days of inventory on hand
    pub inventory_days: f64,

    /// Days sales outstanding
    pub receivable_days: f64,

    /// Days payables outstanding
    pub payable_days: f64,

    /// Cash conversion cycle as reported in the dataset
    pub cash_conversion_cycle: f64,

    /// Bureau credit score
    pub credit_score: f64,

    /// Debt to revenue ratio
    pub debt_to_revenue: f64,

    /// Monthly EMI obligation
    pub emi_obligation: f64,

    /// Ground-truth default label, when the dataset carries one
    pub defaulted: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_raw_row(id: &str) -> RawRow {
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
    fn test_raw_row_csv_round_trip() {
        let row = sample_raw_row("B001");

        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.serialize(&row).unwrap();
        let data = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        assert!(data.contains("Business_ID"));
        assert!(data.contains("OD_Utilization"));

        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        let parsed: RawRow = rdr.deserialize().next().unwrap().unwrap();
        assert_eq!(parsed, row);
    }

    #[test]
    fn test_raw_row_missing_numeric_is_none() {
        let data = "\
Business_ID,Business_Type,Revenue_per_Day,Expense_per_Day,Monthly_Revenue,Monthly_Expense,Cash_Inflow_Adjusted,Cash_Outflow_Adjusted,OD_Required,OD_Utilization,Inventory_Days,Receivable_Days,Payable_Days,Cash_Conversion_Cycle,Credit_Score,Debt_to_Revenue_Ratio,EMI_Obligation,Default
B002,Retail,400,280,,8400,5000,4200,10000,0.55,30,45,20,55,690,0.12,900,0";
        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        let parsed: RawRow = rdr.deserialize().next().unwrap().unwrap();
        assert_eq!(parsed.monthly_revenue, None);
        assert_eq!(parsed.monthly_expense, Some(8_400.0));
    }
}
