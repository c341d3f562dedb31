//! Principal component analysis with variance-threshold selection.
//!
//! `fit` builds the covariance matrix of the (already standardized) training
//! features, eigendecomposes it with cyclic Jacobi rotations, and keeps the
//! smallest prefix of descending-variance components whose cumulative
//! explained-variance ratio reaches the configured threshold. `transform`
//! projects any matrix with the same column order onto that basis.
//!
//! Jacobi is used because the covariance matrix is small (features ×
//! features), symmetric, and the method is fully deterministic, which the
//! reproducibility contract requires.

use crate::error::{ModelError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Convergence tolerance for the off-diagonal norm, relative to the matrix scale.
const JACOBI_TOL: f64 = 1e-12;

/// Maximum Jacobi sweeps before giving up.
const JACOBI_MAX_SWEEPS: usize = 100;

/// PCA configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PcaConfig {
    /// Minimum cumulative explained-variance ratio to retain (default: 0.95).
    /// Must lie in (0, 1].
    pub variance_threshold: f64,
}

impl Default for PcaConfig {
    fn default() -> Self {
        Self {
            variance_threshold: 0.95,
        }
    }
}

/// An orthonormal projection learned from training data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPca {
    /// Feature means at fit time (d)
    mean: Array1<f64>,
    /// Selected components, one per row (k × d)
    components: Array2<f64>,
    /// Explained-variance ratio of each selected component
    explained_variance_ratio: Vec<f64>,
}

/// Eigendecomposition of a symmetric matrix by cyclic Jacobi rotations.
///
/// Returns (eigenvalues, eigenvectors-as-columns), unsorted.
fn symmetric_eigen(matrix: &Array2<f64>) -> Result<(Array1<f64>, Array2<f64>)> {
    let d = matrix.nrows();
    let mut a = matrix.clone();
    let mut v = Array2::<f64>::eye(d);

    let scale: f64 = matrix.iter().map(|x| x * x).sum::<f64>().sqrt();
    if !scale.is_finite() {
        return Err(ModelError::Numeric(
            "non-finite covariance matrix".to_string(),
        ));
    }
    let tol = JACOBI_TOL * scale.max(1.0);

    for _ in 0..JACOBI_MAX_SWEEPS {
        let mut off_diagonal = 0.0;
        for p in 0..d {
            for q in (p + 1)..d {
                off_diagonal += a[[p, q]].powi(2);
            }
        }
        if off_diagonal.sqrt() < tol {
            break;
        }

        for p in 0..d {
            for q in (p + 1)..d {
                if a[[p, q]].abs() < tol / (d as f64) {
                    continue;
                }

                let theta = 0.5 * (2.0 * a[[p, q]]).atan2(a[[q, q]] - a[[p, p]]);
                let (s, c) = theta.sin_cos();

                // Rotate rows/columns p and q of A.
                for i in 0..d {
                    let aip = a[[i, p]];
                    let aiq = a[[i, q]];
                    a[[i, p]] = c * aip - s * aiq;
                    a[[i, q]] = s * aip + c * aiq;
                }
                for i in 0..d {
                    let api = a[[p, i]];
                    let aqi = a[[q, i]];
                    a[[p, i]] = c * api - s * aqi;
                    a[[q, i]] = s * api + c * aqi;
                }

                // Accumulate the rotation into the eigenvector matrix.
                for i in 0..d {
                    let vip = v[[i, p]];
                    let viq = v[[i, q]];
                    v[[i, p]] = c * vip - s * viq;
                    v[[i, q]] = s * vip + c * viq;
                }
            }
        }
    }

    Ok((a.diag().to_owned(), v))
}

impl FittedPca {
    /// Fit the projection on standardized training data.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidConfig`] for a threshold outside (0, 1],
    /// [`ModelError::EmptyInput`] for fewer than two rows, and
    /// [`ModelError::Numeric`] when the covariance degenerates.
    pub fn fit(x: &Array2<f64>, config: &PcaConfig) -> Result<Self> {
        let threshold = config.variance_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ModelError::InvalidConfig(format!(
                "variance threshold must lie in (0, 1], got {threshold}"
            )));
        }

        let n = x.nrows();
        let d = x.ncols();
        if n < 2 {
            return Err(ModelError::EmptyInput("pca fit needs at least two rows"));
        }

        let mean = x
            .mean_axis(Axis(0))
            .ok_or(ModelError::EmptyInput("pca fit"))?;
        let centered = x - &mean;

        // Covariance: Σ = Xᵀ X / (n − 1)
        let cov = centered.t().dot(&centered) / (n - 1) as f64;

        let (eigenvalues, eigenvectors) = symmetric_eigen(&cov)?;

        // Descending variance order; clamp tiny negative round-off to zero.
        let mut order: Vec<usize> = (0..d).collect();
        order.sort_by(|&i, &j| {
            eigenvalues[j]
                .partial_cmp(&eigenvalues[i])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let variances: Vec<f64> = order.iter().map(|&i| eigenvalues[i].max(0.0)).collect();

        let total: f64 = variances.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            return Err(ModelError::Numeric(
                "total variance is zero or non-finite".to_string(),
            ));
        }

        // Smallest prefix whose cumulative ratio reaches the threshold.
        let mut cumulative = 0.0;
        let mut n_components = d;
        for (k, variance) in variances.iter().enumerate() {
            cumulative += variance / total;
            if cumulative + 1e-12 >= threshold {
                n_components = k + 1;
                break;
            }
        }

        let mut components = Array2::<f64>::zeros((n_components, d));
        let mut explained_variance_ratio = Vec::with_capacity(n_components);
        for (row, &idx) in order.iter().take(n_components).enumerate() {
            explained_variance_ratio.push(eigenvalues[idx].max(0.0) / total);
            for col in 0..d {
                components[[row, col]] = eigenvectors[[col, idx]];
            }
            // Sign convention: largest-magnitude loading is positive.
            let mut lead = 0;
            for col in 1..d {
                if components[[row, col]].abs() > components[[row, lead]].abs() {
                    lead = col;
                }
            }
            if components[[row, lead]] < 0.0 {
                for col in 0..d {
                    components[[row, col]] = -components[[row, col]];
                }
            }
        }

        Ok(Self {
            mean,
            components,
            explained_variance_ratio,
        })
    }

    /// Number of retained components (output dimensionality).
    pub fn n_components(&self) -> usize {
        self.components.nrows()
    }

    /// Number of input features the projection was fit on.
    pub fn n_features(&self) -> usize {
        self.components.ncols()
    }

    /// Explained-variance ratio of each retained component.
    pub fn explained_variance_ratio(&self) -> &[f64] {
        &self.explained_variance_ratio
    }

    /// Total variance fraction retained by the selected components.
    pub fn retained_variance(&self) -> f64 {
        self.explained_variance_ratio.iter().sum()
    }

    /// The component matrix (k × d), rows orthonormal.
    pub const fn components(&self) -> &Array2<f64> {
        &self.components
    }

    /// Project a matrix onto the fitted basis.
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
        let centered = x - &self.mean;
        Ok(centered.dot(&self.components.t()))
    }
}
