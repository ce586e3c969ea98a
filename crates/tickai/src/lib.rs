#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/tickai/tickai/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Fundamentals collection for equity financial statements.
//!
//! This crate ties the workspace together. It re-exports the core types and
//! the record merger, and provides a [`FundamentalsCollector`] that walks a
//! ticker list through user-supplied sources with retry and backoff.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tickai::{CollectorConfig, FundamentalsCollector, RetryPolicy};
//!
//! #[tokio::main]
//! async fn main() -> tickai::Result<()> {
//!     let config = CollectorConfig::from_json(r#"{ "concurrency": 2 }"#)?;
//!     let collector = FundamentalsCollector::new(Arc::new(BrowserStatements::connect()?))
//!         .with_listings(Arc::new(BrowserListings::sp500()))
//!         .with_config(config);
//!
//!     let dataset = collector.run().await?;
//!     println!("{:?}", dataset.test().to_dataframe("period")?);
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use tickai_core::*;

// Record merging
pub use tickai_merge::{
    ColumnOrder, DEFAULT_MAX_RECORDS, MergerOptions, RecordMerger, RecordTable, SharedMerger,
};

mod collector;
mod config;
mod dataset;
mod retry;

pub use collector::FundamentalsCollector;
pub use config::CollectorConfig;
pub use dataset::Dataset;
pub use retry::{RetryPolicy, retry};
