//! Source traits for the external collaborators that extract data.
//!
//! Browser automation and page traversal live outside this workspace. These
//! traits are the seam: an implementation hands back already-extracted text,
//! and everything downstream works on plain values.
//!
//! - [`StatementSource`] - Statement tables for a listing
//! - [`PriceHistorySource`] - Daily prices for a reporting period
//! - [`ListingSource`] - The list of tickers to collect

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    period::{PeriodType, ReportingPeriod},
    types::{PriceBar, StatementPage, StatementTable, Symbol, TickerListing},
};

/// Provider of extracted financial statement tables.
#[async_trait]
pub trait StatementSource: Send + Sync + Debug {
    /// Returns the name of this source (e.g., "investing.com").
    fn name(&self) -> &str;

    /// Fetches one statement page for a listing, showing `period_type`
    /// columns.
    ///
    /// Transient failures (page not rendered yet, element missing) should be
    /// reported as [`TickaiError::Source`](crate::error::TickaiError::Source)
    /// so callers can retry them.
    async fn fetch_statement(
        &self,
        listing: &TickerListing,
        page: StatementPage,
        period_type: PeriodType,
    ) -> Result<StatementTable>;
}

/// Provider of historical daily prices.
#[async_trait]
pub trait PriceHistorySource: Send + Sync + Debug {
    /// Returns the name of this source.
    fn name(&self) -> &str;

    /// Fetches the daily bars inside `period`.
    ///
    /// Returns [`TickaiError::DataNotAvailable`](crate::error::TickaiError::DataNotAvailable)
    /// when the symbol's history does not reach back to the period.
    async fn fetch_bars(&self, symbol: &Symbol, period: &ReportingPeriod) -> Result<Vec<PriceBar>>;
}

/// Provider of the ticker universe to collect.
#[async_trait]
pub trait ListingSource: Send + Sync + Debug {
    /// Returns the name of this source.
    fn name(&self) -> &str;

    /// Fetches the current list of tickers and their overview pages.
    async fn fetch_listings(&self) -> Result<Vec<TickerListing>>;
}
