#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/tickai/tickai/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for collecting financial fundamentals.
//!
//! This crate provides the foundational pieces shared by the merger and the
//! collection pipeline:
//!
//! - [`TickaiError`](error::TickaiError) - Error type for every tickai crate
//! - [`PeriodRecord`](types::PeriodRecord) - Line items for one reporting period
//! - [`parse_value`](value::parse_value) - Lossy text-to-number normalization
//! - [`ReportingPeriod`](period::ReportingPeriod) - Period bucketing from headers
//! - [`StatementSource`](source::StatementSource) - Seam to the page extractor

/// Error types for tickai operations.
pub mod error;
/// Reporting period definitions and header parsing.
pub mod period;
/// Source traits for extracted statements, prices and listings.
pub mod source;
/// Core data types (Symbol, StatementRow, PeriodRecord, etc.).
pub mod types;
/// Text-to-number normalization.
pub mod value;

// Re-export commonly used items at crate root
pub use error::{Result, TickaiError};
pub use period::{
    DEFAULT_PERIOD_LIMIT, PeriodType, ReportingPeriod, parse_period_header, periods_from_headers,
};
pub use source::{ListingSource, PriceHistorySource, StatementSource};
pub use types::{
    LabeledValue, PeriodRecord, PriceBar, PriceSummary, StatementPage, StatementRow,
    StatementTable, Symbol, TickerListing,
};
pub use value::{parse_range, parse_value, sum_values};
