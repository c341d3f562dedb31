//! Tolerant CSV ingestion.
//!
//! Malformed rows (non-numeric values, wrong arity) are rejected
//! individually rather than aborting the whole load. The load fails only
//! when the rejected fraction exceeds the configured tolerance, since a high
//! rejection rate usually means the wrong file or a schema drift.

use crate::error::{DataError, Result};
use crate::record::RawRow;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// How many rejection messages to retain for diagnostics.
const MAX_REJECTION_SAMPLES: usize = 10;

/// Loader configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Maximum tolerated fraction of rejected rows before the load aborts
    /// (default: 0.05).
    pub max_rejected_fraction: f64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_rejected_fraction: 0.05,
        }
    }
}

/// Outcome of an ingestion pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadReport {
    /// Total data rows seen (excluding the header)
    pub total_rows: usize,

    /// Rows rejected because they failed deserialization
    pub rejected_rows: usize,

    /// A sample of rejection messages, capped for readability
    pub rejection_samples: Vec<String>,
}

impl LoadReport {
    /// Rejected fraction of all rows seen (0.0 for an empty file).
    pub fn rejected_fraction(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            self.rejected_rows as f64 / self.total_rows as f64
        }
    }
}

/// Load raw rows from any reader.
///
/// # Errors
///
/// Returns [`DataError::RejectionToleranceExceeded`] when too many rows fail
/// deserialization, or [`DataError::EmptyDataset`] when no row survives.
pub fn load_reader<R: Read>(reader: R, config: &LoaderConfig) -> Result<(Vec<RawRow>, LoadReport)> {
    let mut rdr = csv::ReaderBuilder::new().flexible(false).from_reader(reader);

    let mut rows = Vec::new();
    let mut report = LoadReport {
        total_rows: 0,
        rejected_rows: 0,
        rejection_samples: Vec::new(),
    };

    for result in rdr.deserialize::<RawRow>() {
        report.total_rows += 1;
        match result {
            Ok(row) => rows.push(row),
            Err(err) => {
                report.rejected_rows += 1;
                if report.rejection_samples.len() < MAX_REJECTION_SAMPLES {
                    report.rejection_samples.push(err.to_string());
                }
            }
        }
    }

    let fraction = report.rejected_fraction();
    if fraction > config.max_rejected_fraction {
        return Err(DataError::RejectionToleranceExceeded {
            rejected: report.rejected_rows,
            total: report.total_rows,
            fraction: fraction * 100.0,
        });
    }

    if rows.is_empty() {
        return Err(DataError::EmptyDataset);
    }

    Ok((rows, report))
}

/// Load raw rows from a CSV file on disk.
///
/// # Errors
///
/// Returns an IO error if the file cannot be opened, otherwise the same
/// errors as [`load_reader`].
pub fn load_csv<P: AsRef<Path>>(path: P, config: &LoaderConfig) -> Result<(Vec<RawRow>, LoadReport)> {
    let file = File::open(path)?;
    load_reader(file, config)
}
