//! K-means segmentation over reduced features.
//!
//! Lloyd's algorithm with k-means++ initialization. Every source of
//! randomness comes from the seeded RNG in the config, and the two
//! degenerate situations have fixed deterministic policies:
//!
//! - a point equidistant to several centroids joins the lowest-indexed one;
//! - a cluster that empties during refinement is reseeded to the point
//!   currently farthest from its assigned centroid (lowest row index on
//!   ties).
//!
//! Hitting the iteration budget is not an error: the model keeps the best
//! state reached and reports `converged = false` for the caller to log.

use crate::error::{ModelError, Result};
use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// K-means configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KMeansConfig {
    /// Number of clusters (default: 4).
    pub k: usize,

    /// Iteration budget for Lloyd refinement (default: 300).
    pub max_iter: usize,

    /// Centroid shift below which refinement stops early (default: 1e-6).
    pub tol: f64,

    /// RNG seed for k-means++ initialization (default: 42).
    pub seed: u64,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: 4,
            max_iter: 300,
            tol: 1e-6,
            seed: 42,
        }
    }
}

/// A fitted segmentation: K centroids in reduced-feature space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterModel {
    centroids: Array2<f64>,
    /// Iterations actually run
    pub n_iter: usize,
    /// Whether assignments stabilized within the iteration budget
    pub converged: bool,
    /// Sum of squared distances of points to their assigned centroid
    pub inertia: f64,
}

fn squared_distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Nearest centroid by Euclidean distance; ties resolve to the lower index
/// because only a strictly smaller distance displaces the running best.
fn nearest_centroid(point: ArrayView1<'_, f64>, centroids: &Array2<f64>) -> (usize, f64) {
    let mut best = 0;
    let mut best_d2 = squared_distance(point, centroids.row(0));
    for c in 1..centroids.nrows() {
        let d2 = squared_distance(point, centroids.row(c));
        if d2 < best_d2 {
            best = c;
            best_d2 = d2;
        }
    }
    (best, best_d2)
}

/// k-means++ seeding: the first centroid is a uniform draw, each later one
/// is drawn with probability proportional to its squared distance from the
/// nearest centroid chosen so far.
fn plus_plus_init(x: &Array2<f64>, k: usize, rng: &mut StdRng) -> Array2<f64> {
    let n = x.nrows();
    let d = x.ncols();
    let mut centroids = Array2::<f64>::zeros((k, d));

    let first = rng.gen_range(0..n);
    centroids.row_mut(0).assign(&x.row(first));

    let mut dist2: Vec<f64> = (0..n)
        .map(|i| squared_distance(x.row(i), centroids.row(0)))
        .collect();

    for c in 1..k {
        let total: f64 = dist2.iter().sum();
        let chosen = if total > 0.0 {
            let target = rng.r#gen::<f64>() * total;
            let mut cumulative = 0.0;
            let mut pick = n - 1;
            for (i, &d2) in dist2.iter().enumerate() {
                cumulative += d2;
                if cumulative >= target {
                    pick = i;
                    break;
                }
            }
            pick
        } else {
            // All points coincide with an existing centroid.
            rng.gen_range(0..n)
        };
        centroids.row_mut(c).assign(&x.row(chosen));

        for i in 0..n {
            let d2 = squared_distance(x.row(i), centroids.row(c));
            if d2 < dist2[i] {
                dist2[i] = d2;
            }
        }
    }

    centroids
}

impl ClusterModel {
    /// Fit K centroids on reduced training features.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidConfig`] when `k` is zero or exceeds the
    /// number of rows, and [`ModelError::EmptyInput`] for an empty matrix.
    pub fn fit(x: &Array2<f64>, config: &KMeansConfig) -> Result<Self> {
        let n = x.nrows();
        if n == 0 {
            return Err(ModelError::EmptyInput("k-means fit"));
        }
        if config.k == 0 || config.k > n {
            return Err(ModelError::InvalidConfig(format!(
                "k must lie in 1..={n}, got {}",
                config.k
            )));
        }
        if config.tol < 0.0 {
            return Err(ModelError::InvalidConfig(format!(
                "tolerance must be non-negative, got {}",
                config.tol
            )));
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut centroids = plus_plus_init(x, config.k, &mut rng);
        let mut labels = vec![usize::MAX; n];

        let mut n_iter = 0;
        let mut converged = false;
        while n_iter < config.max_iter {
            n_iter += 1;

            // Assignment step.
            let mut changed = false;
            for i in 0..n {
                let (label, _) = nearest_centroid(x.row(i), &centroids);
                if labels[i] != label {
                    labels[i] = label;
                    changed = true;
                }
            }
            if !changed {
                converged = true;
                break;
            }

            // Update step.
            let mut counts = vec![0usize; config.k];
            let mut sums = Array2::<f64>::zeros(centroids.raw_dim());
            for i in 0..n {
                counts[labels[i]] += 1;
                let mut row = sums.row_mut(labels[i]);
                row += &x.row(i);
            }

            let previous = centroids.clone();
            for c in 0..config.k {
                if counts[c] > 0 {
                    let mut row = centroids.row_mut(c);
                    row.assign(&(&sums.row(c) / counts[c] as f64));
                } else {
                    // Reseed an emptied cluster to the point farthest from
                    // its assigned centroid (lowest index on ties).
                    let mut farthest = 0;
                    let mut farthest_d2 = -1.0;
                    for i in 0..n {
                        let d2 = squared_distance(x.row(i), centroids.row(labels[i]));
                        if d2 > farthest_d2 {
                            farthest = i;
                            farthest_d2 = d2;
                        }
                    }
                    centroids.row_mut(c).assign(&x.row(farthest));
                }
            }

            // Centroid movement below tolerance also counts as convergence.
            let max_shift = (0..config.k)
                .map(|c| squared_distance(previous.row(c), centroids.row(c)).sqrt())
                .fold(0.0, f64::max);
            if max_shift < config.tol {
                converged = true;
                break;
            }
        }

        let inertia = (0..n)
            .map(|i| nearest_centroid(x.row(i), &centroids).1)
            .sum();

        Ok(Self {
            centroids,
            n_iter,
            converged,
            inertia,
        })
    }

    /// Number of clusters.
    pub fn k(&self) -> usize {
        self.centroids.nrows()
    }

    /// Dimensionality of the centroid space.
    pub fn n_features(&self) -> usize {
        self.centroids.ncols()
    }

    /// The centroid matrix (k × d).
    pub const fn centroids(&self) -> &Array2<f64> {
        &self.centroids
    }

    /// Assign each row to its nearest centroid.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::SchemaMismatch`] when the input width differs
    /// from the centroid dimensionality.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>> {
        if x.ncols() != self.n_features() {
            return Err(ModelError::SchemaMismatch {
                expected: self.n_features(),
                actual: x.ncols(),
            });
        }
        Ok((0..x.nrows())
            .map(|i| nearest_centroid(x.row(i), &self.centroids).0)
            .collect())
    }
}
