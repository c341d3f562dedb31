#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/kelso-credit/kelso/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod interest;
pub mod scoring;
pub mod tiers;

// Re-export main types
pub use error::{Result, StrategyError};
pub use interest::{RateAction, StrategyConfig, recommend_rate};
pub use scoring::{od_suitability, score_all};
pub use tiers::{RiskTier, TierLabel, assign_tiers};
