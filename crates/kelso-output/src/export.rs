//! Export functionality for pipeline outputs.
//!
//! CSV and JSON export for per-business strategy rows and the sector
//! report, to strings or files.

use crate::rows::StrategyRow;
use crate::summary::SectorReport;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn csv_from_records<S: serde::Serialize>(records: &[S]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in records {
        wtr.serialize(record)?;
    }
    let data = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}

impl Exporter for Vec<StrategyRow> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => csv_from_records(self),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for SectorReport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                // Header comment carries the run date the rows share.
                let mut output = format!("# Generated: {}\n", self.generated);
                output.push_str(&csv_from_records(&self.rows)?);
                Ok(output)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kelso_strategy::{RateAction, RiskTier, TierLabel};

    fn sample_rows() -> Vec<StrategyRow> {
        vec![
            StrategyRow::new(
                "B0001".to_string(),
                "Retail".to_string(),
                0,
                TierLabel::Named(RiskTier::Stable),
                0.10,
                0.45,
                0.80,
                0.5,
                3_000.0,
                0.3,
                RateAction::ReduceRate,
            ),
            StrategyRow::new(
                "B0002".to_string(),
                "Logistics".to_string(),
                3,
                TierLabel::Named(RiskTier::HighRisk),
                0.75,
                0.08,
                0.40,
                0.32,
                -300.0,
                -0.07,
                RateAction::MaintainRate,
            ),
        ]
    }

    #[test]
    fn test_rows_export_csv() {
        let csv = sample_rows().export_to_string(ExportFormat::Csv).unwrap();
        assert!(csv.contains("business_id"));
        assert!(csv.contains("B0001"));
        assert!(csv.contains("Reduce Rate"));
        assert!(csv.contains("High-Risk"));
    }

    #[test]
    fn test_rows_export_json() {
        let json = sample_rows().export_to_string(ExportFormat::Json).unwrap();
        assert!(json.contains("\"B0001\""));
        assert!(json.contains("\"od_score\""));
    }

    #[test]
    fn test_rows_export_pretty_json() {
        let json = sample_rows()
            .export_to_string(ExportFormat::PrettyJson)
            .unwrap();
        assert!(json.contains("\"B0001\""));
        assert!(json.contains("  ")); // Indentation indicates pretty format
    }

    #[test]
    fn test_report_export_csv_has_header_comment() {
        let report = SectorReport::summarize(
            &sample_rows(),
            NaiveDate::from_ymd_opt(2026, 8, 28).unwrap(),
        );
        let csv = report.export_to_string(ExportFormat::Csv).unwrap();
        assert!(csv.starts_with("# Generated: 2026-08-28"));
        assert!(csv.contains("Retail"));
        assert!(csv.contains("mean_pd"));
    }

    #[test]
    fn test_report_export_json() {
        let report = SectorReport::summarize(
            &sample_rows(),
            NaiveDate::from_ymd_opt(2026, 8, 28).unwrap(),
        );
        let json = report.export_to_string(ExportFormat::Json).unwrap();
        assert!(json.contains("\"generated\""));
        assert!(json.contains("\"Logistics\""));
    }

    #[test]
    fn test_export_to_file() {
        use std::io::Read;

        let rows = sample_rows();
        let temp_dir = std::env::temp_dir();
        let csv_path = temp_dir.join("kelso_test_export.csv");

        rows.export_to_file(&csv_path, ExportFormat::Csv).unwrap();
        let mut content = String::new();
        File::open(&csv_path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert!(content.contains("B0001"));

        std::fs::remove_file(csv_path).ok();
    }

    #[test]
    fn test_export_format_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::PrettyJson.extension(), "json");
    }
}
