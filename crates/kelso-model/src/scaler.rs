//! Standard scaling: (x − mean) / std per feature.
//!
//! `fit` learns per-feature statistics from the training matrix only;
//! `transform` applies them to any matrix with the same column order.
//! A zero-variance feature uses a unit denominator instead of dividing by
//! zero, so constant columns scale to constant zeros.

use crate::error::{ModelError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Per-feature standardization statistics learned at fit time.
///
/// The type itself is the proof of fitting: a `FittedScaler` cannot exist
/// without training statistics, so there is no "not yet fit" state to guard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedScaler {
    mean: Array1<f64>,
    std: Array1<f64>,
}

impl FittedScaler {
    /// Learn per-feature mean and standard deviation from training data.
    ///
    /// Standard deviation is the population estimate (divide by n), matching
    /// the source pipeline's scaler.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyInput`] for a matrix with no rows and
    /// [`ModelError::Numeric`] if the statistics come out non-finite.
    pub fn fit(x: &Array2<f64>) -> Result<Self> {
        let n = x.nrows();
        if n == 0 {
            return Err(ModelError::EmptyInput("scaler fit"));
        }

        let mean = x
            .mean_axis(Axis(0))
            .ok_or(ModelError::EmptyInput("scaler fit"))?;

        let mut std = Array1::<f64>::zeros(x.ncols());
        for (j, column) in x.axis_iter(Axis(1)).enumerate() {
            let var = column.iter().map(|v| (v - mean[j]).powi(2)).sum::<f64>() / n as f64;
            // Zero-variance guard: unit denominator instead of NaN.
            let s = var.sqrt();
            std[j] = if s > 0.0 { s } else { 1.0 };
        }

        if mean.iter().chain(std.iter()).any(|v| !v.is_finite()) {
            return Err(ModelError::Numeric(
                "non-finite scaling statistics".to_string(),
            ));
        }

        Ok(Self { mean, std })
    }

    /// Number of features the scaler was fit on.
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Per-feature means learned at fit time.
    pub const fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// Per-feature standard deviations learned at fit time (zero-variance
    /// features report 1.0).
    pub const fn std(&self) -> &Array1<f64> {
        &self.std
    }

    /// Standardize a matrix using the training-time statistics.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::SchemaMismatch`] when the input width differs
    /// from the fit-time feature count.
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.n_features() {
            return Err(ModelError::SchemaMismatch {
                expected: self.n_features(),
                actual: x.ncols(),
            });
        }
        Ok((x - &self.mean) / &self.std)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_training_set_scales_to_zero_mean_unit_std() {
        let x = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0], [4.0, 40.0]];
        let scaler = FittedScaler::fit(&x).unwrap();
        let scaled = scaler.transform(&x).unwrap();

        for j in 0..2 {
            let col = scaled.column(j);
            let mean = col.sum() / col.len() as f64;
            let var = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / col.len() as f64;
            assert_relative_eq!(mean, 0.0, epsilon = 1e-12);
            assert_relative_eq!(var.sqrt(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_transform_uses_training_statistics_only() {
        let train = array![[0.0], [2.0]]; // mean 1, std 1
        let scaler = FittedScaler::fit(&train).unwrap();

        let eval = array![[3.0]];
        let scaled = scaler.transform(&eval).unwrap();
        assert_relative_eq!(scaled[[0, 0]], 2.0);
    }

    #[test]
    fn test_zero_variance_feature_guarded() {
        let x = array![[5.0, 1.0], [5.0, 2.0], [5.0, 3.0]];
        let scaler = FittedScaler::fit(&x).unwrap();
        assert_relative_eq!(scaler.std()[0], 1.0);

        let scaled = scaler.transform(&x).unwrap();
        for i in 0..3 {
            assert_relative_eq!(scaled[[i, 0]], 0.0);
            assert!(scaled[[i, 0]].is_finite());
        }
    }

    #[test]
    fn test_schema_mismatch_rejected() {
        let scaler = FittedScaler::fit(&array![[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let err = scaler.transform(&array![[1.0]]).unwrap_err();
        assert!(matches!(
            err,
            ModelError::SchemaMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let x = array![[1.0, 10.0], [2.0, 20.0], [3.0, 35.0]];
        let scaler = FittedScaler::fit(&x).unwrap();

        let json = serde_json::to_string(&scaler).unwrap();
        let restored: FittedScaler = serde_json::from_str(&json).unwrap();

        let a = scaler.transform(&x).unwrap();
        let b = restored.transform(&x).unwrap();
        for (left, right) in a.iter().zip(b.iter()) {
            assert_relative_eq!(left, right);
        }
    }
}
