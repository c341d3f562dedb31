#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/kelso-credit/kelso/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod engineer;
pub mod error;
pub mod label;
pub mod matrix;

// Re-export main types
pub use engineer::{CASH_RATIO_CAP, EngineeredFeatures, engineer};
pub use error::{FeatureError, Result};
pub use label::{LabelPolicy, proxy_high_risk, training_labels};
pub use matrix::{FEATURE_NAMES, FeatureMatrix, n_features};
