#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/kelso-credit/kelso/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod ann;
pub mod error;
pub mod evaluation;
pub mod kmeans;
pub mod pca;
pub mod scaler;
pub mod split;

// Re-export main types
pub use ann::{ClassWeighting, RiskModelConfig, TrainedRiskModel};
pub use error::{ModelError, Result};
pub use evaluation::{ConfusionMatrix, EvaluationReport, evaluate};
pub use kmeans::{ClusterModel, KMeansConfig};
pub use pca::{FittedPca, PcaConfig};
pub use scaler::FittedScaler;
pub use split::stratified_split;
