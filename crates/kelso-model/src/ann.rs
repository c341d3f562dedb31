//! Feed-forward default-probability classifier.
//!
//! A fully-connected network with ReLU hidden layers and a sigmoid output,
//! trained with mini-batch Adam on binary cross-entropy. The default
//! topology is three hidden layers of 256/128/64 units over the reduced
//! features plus the cluster label.
//!
//! Training is deterministic for a fixed seed and input ordering: weight
//! initialization, the validation split and per-epoch shuffling all draw
//! from one seeded RNG. Class imbalance is handled by an explicit weighting
//! policy rather than a library default.

use crate::error::{ModelError, Result};
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

const ADAM_BETA1: f64 = 0.9;
const ADAM_BETA2: f64 = 0.999;
const ADAM_EPS: f64 = 1e-8;

/// Floor inside the cross-entropy logarithms.
const LOG_EPS: f64 = 1e-12;

/// Minimum validation-loss improvement that resets early-stopping patience.
const IMPROVEMENT_TOL: f64 = 1e-6;

/// How per-sample losses are weighted across classes during training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClassWeighting {
    /// Every sample weighs 1.0
    Uniform,

    /// Each class weighs n / (2 · n_class), so rare defaults are not drowned
    /// out by the majority class
    #[default]
    Balanced,
}

/// Risk model training configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskModelConfig {
    /// Hidden-layer widths, input to output (default: [256, 128, 64]).
    pub hidden_layers: Vec<usize>,

    /// Training epochs (default: 30).
    pub epochs: usize,

    /// Mini-batch size (default: 256).
    pub batch_size: usize,

    /// Adam learning rate (default: 1e-3).
    pub learning_rate: f64,

    /// Fraction of the training set held out for early stopping
    /// (default: 0.2; 0 disables early stopping).
    pub validation_fraction: f64,

    /// Epochs without validation improvement before stopping (default: 5).
    pub early_stopping_patience: usize,

    /// Class weighting policy (default: balanced).
    pub class_weighting: ClassWeighting,

    /// RNG seed for initialization, splitting and shuffling (default: 42).
    pub seed: u64,
}

impl Default for RiskModelConfig {
    fn default() -> Self {
        Self {
            hidden_layers: vec![256, 128, 64],
            epochs: 30,
            batch_size: 256,
            learning_rate: 1e-3,
            validation_fraction: 0.2,
            early_stopping_patience: 5,
            class_weighting: ClassWeighting::Balanced,
            seed: 42,
        }
    }
}

impl RiskModelConfig {
    fn validate(&self, n_rows: usize) -> Result<()> {
        if self.epochs == 0 {
            return Err(ModelError::InvalidConfig("epochs must be positive".into()));
        }
        if self.batch_size == 0 {
            return Err(ModelError::InvalidConfig(
                "batch size must be positive".into(),
            ));
        }
        if self.learning_rate <= 0.0 {
            return Err(ModelError::InvalidConfig(
                "learning rate must be positive".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.validation_fraction) {
            return Err(ModelError::InvalidConfig(format!(
                "validation fraction must lie in [0, 1), got {}",
                self.validation_fraction
            )));
        }
        if self.hidden_layers.contains(&0) {
            return Err(ModelError::InvalidConfig(
                "hidden layer width must be positive".into(),
            ));
        }
        if n_rows < 2 {
            return Err(ModelError::EmptyInput("risk model fit needs at least two rows"));
        }
        Ok(())
    }
}

/// A trained classifier: layer weights, biases and training diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedRiskModel {
    /// Weight matrix per layer, shaped (fan_in × fan_out)
    weights: Vec<Array2<f64>>,
    /// Bias vector per layer
    biases: Vec<Array1<f64>>,
    /// Epochs actually run
    pub epochs_run: usize,
    /// Whether validation loss stopped improving before the epoch budget ran
    /// out (false means the budget was exhausted; the best state is kept
    /// either way)
    pub converged: bool,
    /// Best validation loss observed (NaN-free; infinity when no validation
    /// split was configured)
    pub best_validation_loss: f64,
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Forward pass; returns pre-activations and activations per layer.
fn forward(
    weights: &[Array2<f64>],
    biases: &[Array1<f64>],
    x: &Array2<f64>,
) -> (Vec<Array2<f64>>, Vec<Array2<f64>>) {
    let n_layers = weights.len();
    let mut pre = Vec::with_capacity(n_layers);
    let mut act = Vec::with_capacity(n_layers);

    let mut current = x.clone();
    for l in 0..n_layers {
        let z = current.dot(&weights[l]) + &biases[l];
        let a = if l + 1 == n_layers {
            z.mapv(sigmoid)
        } else {
            z.mapv(|v| v.max(0.0))
        };
        pre.push(z);
        act.push(a.clone());
        current = a;
    }

    (pre, act)
}

/// Weighted binary cross-entropy.
fn bce_loss(probs: &Array2<f64>, y: &Array1<f64>, w_pos: f64, w_neg: f64) -> f64 {
    let n = y.len() as f64;
    let mut total = 0.0;
    for (i, &target) in y.iter().enumerate() {
        let p = probs[[i, 0]].clamp(LOG_EPS, 1.0 - LOG_EPS);
        total -= if target > 0.5 {
            w_pos * p.ln()
        } else {
            w_neg * (1.0 - p).ln()
        };
    }
    total / n
}

/// Adam state for one parameter tensor.
#[derive(Debug, Clone)]
struct Adam2 {
    m: Array2<f64>,
    v: Array2<f64>,
}

#[derive(Debug, Clone)]
struct Adam1 {
    m: Array1<f64>,
    v: Array1<f64>,
}

impl TrainedRiskModel {
    /// Train the classifier on reduced training features and labels.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DegenerateLabels`] when only one class is
    /// present, [`ModelError::InvalidConfig`] for bad hyperparameters, and
    /// [`ModelError::Numeric`] if the loss diverges to NaN.
    pub fn fit(x: &Array2<f64>, labels: &[bool], config: &RiskModelConfig) -> Result<Self> {
        let n = x.nrows();
        if labels.len() != n {
            return Err(ModelError::SchemaMismatch {
                expected: n,
                actual: labels.len(),
            });
        }
        config.validate(n)?;

        let n_pos = labels.iter().filter(|&&l| l).count();
        let n_neg = n - n_pos;
        if n_pos == 0 || n_neg == 0 {
            return Err(ModelError::DegenerateLabels(
                "training labels contain a single class",
            ));
        }

        let mut rng = StdRng::seed_from_u64(config.seed);

        // Layer dimensions: input, hidden..., single sigmoid output.
        let d = x.ncols();
        let mut dims = Vec::with_capacity(config.hidden_layers.len() + 2);
        dims.push(d);
        dims.extend_from_slice(&config.hidden_layers);
        dims.push(1);

        // He-uniform initialization, biases at zero.
        let mut weights: Vec<Array2<f64>> = Vec::with_capacity(dims.len() - 1);
        let mut biases: Vec<Array1<f64>> = Vec::with_capacity(dims.len() - 1);
        for l in 0..dims.len() - 1 {
            let limit = (6.0 / dims[l] as f64).sqrt();
            let w = Array2::from_shape_fn((dims[l], dims[l + 1]), |_| {
                rng.gen_range(-limit..limit)
            });
            weights.push(w);
            biases.push(Array1::zeros(dims[l + 1]));
        }

        // Validation split for early stopping.
        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(&mut rng);
        let n_val = (n as f64 * config.validation_fraction).round() as usize;
        let n_val = n_val.min(n - 1);
        let (val_idx, train_idx) = indices.split_at(n_val);
        let train_idx = train_idx.to_vec();
        let val_idx = val_idx.to_vec();

        let y: Array1<f64> = labels.iter().map(|&l| f64::from(u8::from(l))).collect();

        let (w_pos, w_neg) = match config.class_weighting {
            ClassWeighting::Uniform => (1.0, 1.0),
            ClassWeighting::Balanced => {
                let pos = train_idx.iter().filter(|&&i| labels[i]).count();
                let neg = train_idx.len() - pos;
                (
                    train_idx.len() as f64 / (2.0 * pos.max(1) as f64),
                    train_idx.len() as f64 / (2.0 * neg.max(1) as f64),
                )
            }
        };

        let mut adam_w: Vec<Adam2> = weights
            .iter()
            .map(|w| Adam2 {
                m: Array2::zeros(w.raw_dim()),
                v: Array2::zeros(w.raw_dim()),
            })
            .collect();
        let mut adam_b: Vec<Adam1> = biases
            .iter()
            .map(|b| Adam1 {
                m: Array1::zeros(b.raw_dim()),
                v: Array1::zeros(b.raw_dim()),
            })
            .collect();
        let mut adam_t = 0usize;

        let x_val = x.select(Axis(0), &val_idx);
        let y_val: Array1<f64> = val_idx.iter().map(|&i| y[i]).collect();

        let mut best_weights = weights.clone();
        let mut best_biases = biases.clone();
        let mut best_val_loss = f64::INFINITY;
        let mut patience_left = config.early_stopping_patience;
        let mut epochs_run = 0;
        let mut converged = false;

        let mut epoch_order = train_idx;
        for _ in 0..config.epochs {
            epochs_run += 1;
            epoch_order.shuffle(&mut rng);

            for batch in epoch_order.chunks(config.batch_size) {
                let xb = x.select(Axis(0), batch);
                let yb: Array1<f64> = batch.iter().map(|&i| y[i]).collect();
                let b = batch.len() as f64;

                let (pre, act) = forward(&weights, &biases, &xb);
                let n_layers = weights.len();

                // Sigmoid + BCE: δ_out = (p − y) · w_class / b
                let mut delta = act[n_layers - 1].clone();
                for (i, &target) in yb.iter().enumerate() {
                    let w_sample = if target > 0.5 { w_pos } else { w_neg };
                    delta[[i, 0]] = (delta[[i, 0]] - target) * w_sample / b;
                }

                adam_t += 1;
                let bc1 = 1.0 - ADAM_BETA1.powi(adam_t as i32);
                let bc2 = 1.0 - ADAM_BETA2.powi(adam_t as i32);

                for l in (0..n_layers).rev() {
                    let input = if l == 0 { &xb } else { &act[l - 1] };
                    let grad_w = input.t().dot(&delta);
                    let grad_b = delta.sum_axis(Axis(0));

                    if l > 0 {
                        let relu_mask = pre[l - 1].mapv(|v| if v > 0.0 { 1.0 } else { 0.0 });
                        delta = delta.dot(&weights[l].t()) * relu_mask;
                    }

                    let aw = &mut adam_w[l];
                    aw.m = &aw.m * ADAM_BETA1 + &grad_w * (1.0 - ADAM_BETA1);
                    aw.v = &aw.v * ADAM_BETA2 + &grad_w.mapv(|g| g * g) * (1.0 - ADAM_BETA2);
                    let step_w = (&aw.m / bc1) / ((&aw.v / bc2).mapv(f64::sqrt) + ADAM_EPS);
                    weights[l] = &weights[l] - &(step_w * config.learning_rate);

                    let ab = &mut adam_b[l];
                    ab.m = &ab.m * ADAM_BETA1 + &grad_b * (1.0 - ADAM_BETA1);
                    ab.v = &ab.v * ADAM_BETA2 + &grad_b.mapv(|g| g * g) * (1.0 - ADAM_BETA2);
                    let step_b = (&ab.m / bc1) / ((&ab.v / bc2).mapv(f64::sqrt) + ADAM_EPS);
                    biases[l] = &biases[l] - &(step_b * config.learning_rate);
                }
            }

            if !val_idx.is_empty() {
                let (_, val_act) = forward(&weights, &biases, &x_val);
                let val_loss = bce_loss(&val_act[weights.len() - 1], &y_val, 1.0, 1.0);
                if !val_loss.is_finite() {
                    return Err(ModelError::Numeric(
                        "validation loss diverged to a non-finite value".to_string(),
                    ));
                }

                if best_val_loss - val_loss > IMPROVEMENT_TOL {
                    best_val_loss = val_loss;
                    best_weights = weights.clone();
                    best_biases = biases.clone();
                    patience_left = config.early_stopping_patience;
                } else if patience_left == 0 {
                    converged = true;
                    break;
                } else {
                    patience_left -= 1;
                }
            }
        }

        let (weights, biases) = if val_idx.is_empty() {
            (weights, biases)
        } else {
            (best_weights, best_biases)
        };

        Ok(Self {
            weights,
            biases,
            epochs_run,
            converged,
            best_validation_loss: best_val_loss,
        })
    }

    /// Number of input features the model was trained on.
    pub fn n_features(&self) -> usize {
        self.weights[0].nrows()
    }

    /// Predict the probability of default for each row; outputs lie in [0, 1].
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::SchemaMismatch`] when the input width differs
    /// from the training feature count, and [`ModelError::Numeric`] if the
    /// forward pass produces a non-finite probability.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.n_features() {
            return Err(ModelError::SchemaMismatch {
                expected: self.n_features(),
                actual: x.ncols(),
            });
        }

        let (_, act) = forward(&self.weights, &self.biases, x);
        let probs = act[self.weights.len() - 1].column(0).to_owned();
        if probs.iter().any(|p| !p.is_finite()) {
            return Err(ModelError::Numeric(
                "prediction produced a non-finite probability".to_string(),
            ));
        }
        Ok(probs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array2;

    /// Two well-separated point clouds, linearly separable.
    fn separable_data() -> (Array2<f64>, Vec<bool>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..24 {
            let jitter = (i as f64) * 0.01;
            rows.push([0.0 + jitter, 0.5 - jitter]);
            labels.push(false);
            rows.push([4.0 - jitter, 4.5 + jitter]);
            labels.push(true);
        }
        let n = rows.len();
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        (Array2::from_shape_vec((n, 2), flat).unwrap(), labels)
    }

    fn small_config() -> RiskModelConfig {
        RiskModelConfig {
            hidden_layers: vec![8],
            epochs: 200,
            batch_size: 16,
            learning_rate: 0.05,
            validation_fraction: 0.2,
            early_stopping_patience: 20,
            ..Default::default()
        }
    }

    #[test]
    fn test_learns_separable_classes() {
        let (x, labels) = separable_data();
        let model = TrainedRiskModel::fit(&x, &labels, &small_config()).unwrap();

        let probs = model.predict(&x).unwrap();
        let mut correct = 0;
        for (p, &label) in probs.iter().zip(labels.iter()) {
            if (*p > 0.5) == label {
                correct += 1;
            }
        }
        assert!(
            correct as f64 / labels.len() as f64 > 0.95,
            "accuracy {correct}/{}",
            labels.len()
        );
    }

    #[test]
    fn test_outputs_stay_in_unit_interval() {
        let (x, labels) = separable_data();
        let model = TrainedRiskModel::fit(&x, &labels, &small_config()).unwrap();
        let probs = model.predict(&(x * 1000.0)).unwrap();
        for &p in probs.iter() {
            assert!((0.0..=1.0).contains(&p), "pd out of range: {p}");
        }
    }

    #[test]
    fn test_deterministic_given_seed() {
        let (x, labels) = separable_data();
        let a = TrainedRiskModel::fit(&x, &labels, &small_config()).unwrap();
        let b = TrainedRiskModel::fit(&x, &labels, &small_config()).unwrap();

        let pa = a.predict(&x).unwrap();
        let pb = b.predict(&x).unwrap();
        for (left, right) in pa.iter().zip(pb.iter()) {
            assert_relative_eq!(left, right);
        }
    }

    #[test]
    fn test_single_class_rejected() {
        let (x, _) = separable_data();
        let labels = vec![false; x.nrows()];
        let err = TrainedRiskModel::fit(&x, &labels, &small_config()).unwrap_err();
        assert!(matches!(err, ModelError::DegenerateLabels(_)));
    }

    #[test]
    fn test_predict_schema_mismatch() {
        let (x, labels) = separable_data();
        let model = TrainedRiskModel::fit(&x, &labels, &small_config()).unwrap();
        let err = model
            .predict(&Array2::<f64>::zeros((1, 5)))
            .unwrap_err();
        assert!(matches!(err, ModelError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let (x, labels) = separable_data();
        let model = TrainedRiskModel::fit(&x, &labels, &small_config()).unwrap();

        let json = serde_json::to_string(&model).unwrap();
        let restored: TrainedRiskModel = serde_json::from_str(&json).unwrap();

        let a = model.predict(&x).unwrap();
        let b = restored.predict(&x).unwrap();
        for (left, right) in a.iter().zip(b.iter()) {
            assert_relative_eq!(left, right);
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let (x, labels) = separable_data();
        let config = RiskModelConfig {
            learning_rate: 0.0,
            ..small_config()
        };
        let err = TrainedRiskModel::fit(&x, &labels, &config).unwrap_err();
        assert!(matches!(err, ModelError::InvalidConfig(_)));
    }
}
