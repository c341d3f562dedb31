#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/kelso-credit/kelso/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod clean;
pub mod error;
pub mod loader;
pub mod record;
pub mod sector;

// Re-export main types
pub use clean::{CleanReport, clean_rows};
pub use error::{DataError, Result};
pub use loader::{LoadReport, LoaderConfig, load_csv, load_reader};
pub use record::{BusinessRecord, RawRow};
pub use sector::BusinessSector;
