#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/tickai/tickai/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Period-keyed record merging.
//!
//! This crate assembles financial line items of differing shape into aligned
//! tabular output:
//!
//! - [`RecordMerger`] - Owned accumulator with an explicit finalization step
//! - [`SharedMerger`] - The same accumulator behind an async lock
//! - [`RecordTable`] - Dense rows under the union of all labels
//! - [`MergerOptions`] - Strict duplicate detection and column ordering

/// The record merger.
pub mod merger;
/// Merger options.
pub mod options;
/// Lock-guarded merger.
pub mod shared;
/// Dense table of merged records.
pub mod table;

pub use merger::RecordMerger;
pub use options::{ColumnOrder, DEFAULT_MAX_RECORDS, MergerOptions};
pub use shared::SharedMerger;
pub use table::RecordTable;
