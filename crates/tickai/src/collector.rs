//! Fundamentals collector driving the external sources.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tickai_core::{
    ListingSource, PriceHistorySource, PriceSummary, Result, StatementSource, TickaiError,
    TickerListing, periods_from_headers,
};
use tickai_merge::{RecordMerger, RecordTable};
use tracing::{debug, info, instrument, warn};

use crate::config::CollectorConfig;
use crate::dataset::Dataset;
use crate::retry::retry;

/// Collects per-period fundamentals for tickers.
///
/// For each ticker the collector reads every configured statement page,
/// merges the pages into one record per period, and optionally attaches a
/// price summary (`High`, `Low`, `avg Volume`) to each period.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use tickai::{CollectorConfig, FundamentalsCollector};
///
/// let collector = FundamentalsCollector::new(Arc::new(my_statement_source))
///     .with_prices(Arc::new(my_price_source))
///     .with_listings(Arc::new(my_listing_source))
///     .with_config(CollectorConfig::default().with_concurrency(4));
///
/// let dataset = collector.run().await?;
/// let train = dataset.train().to_dataframe("period")?;
/// ```
pub struct FundamentalsCollector {
    statements: Arc<dyn StatementSource>,
    prices: Option<Arc<dyn PriceHistorySource>>,
    listings: Option<Arc<dyn ListingSource>>,
    config: CollectorConfig,
}

impl std::fmt::Debug for FundamentalsCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FundamentalsCollector")
            .field("statements", &self.statements.name())
            .field("prices", &self.prices.as_ref().map(|p| p.name()))
            .field("listings", &self.listings.as_ref().map(|l| l.name()))
            .field("config", &self.config)
            .finish()
    }
}

impl FundamentalsCollector {
    /// Creates a collector reading statements from `statements`.
    #[must_use]
    pub fn new(statements: Arc<dyn StatementSource>) -> Self {
        Self {
            statements,
            prices: None,
            listings: None,
            config: CollectorConfig::default(),
        }
    }

    /// Sets the price history source used for per-period summaries.
    #[must_use]
    pub fn with_prices(mut self, prices: Arc<dyn PriceHistorySource>) -> Self {
        self.prices = Some(prices);
        self
    }

    /// Sets the source of the ticker list.
    #[must_use]
    pub fn with_listings(mut self, listings: Arc<dyn ListingSource>) -> Self {
        self.listings = Some(listings);
        self
    }

    /// Sets the collector configuration.
    #[must_use]
    pub fn with_config(mut self, config: CollectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the collector configuration.
    #[must_use]
    pub const fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Fetches the ticker list, one listing per symbol, sorted by symbol.
    ///
    /// When a symbol is listed more than once the last listing wins.
    pub async fn listings(&self) -> Result<Vec<TickerListing>> {
        let source = self.listings.as_ref().ok_or_else(|| {
            TickaiError::Config("No listing source configured".to_string())
        })?;

        let fetched =
            retry(&self.config.retry, "fetch listings", || source.fetch_listings()).await?;
        let total = fetched.len();

        let unique: BTreeMap<_, _> = fetched
            .into_iter()
            .map(|listing| (listing.symbol.clone(), listing))
            .collect();

        debug!(source = source.name(), total, unique = unique.len(), "Fetched listings");
        Ok(unique.into_values().collect())
    }

    /// Collects one ticker's fundamentals as a table with one row per period,
    /// latest first.
    ///
    /// With a price source, only periods that received a price summary are
    /// kept: at most `period_limit` of them, and none at or past the first
    /// period the price history does not reach.
    #[instrument(skip(self, listing), fields(symbol = %listing.symbol))]
    pub async fn collect(&self, listing: &TickerListing) -> Result<RecordTable> {
        self.config.validate()?;

        let mut merger = RecordMerger::with_options(self.config.merger.clone());
        let mut headers = Vec::new();

        for &page in &self.config.pages {
            let operation = format!(
                "fetch {} {page} for {}",
                self.config.period_type, listing.symbol
            );
            let table = retry(&self.config.retry, &operation, || {
                self.statements
                    .fetch_statement(listing, page, self.config.period_type)
            })
            .await?;
            merger.absorb(&table)?;
            headers = table.period_headers;
        }

        if let Some(prices) = &self.prices {
            self.put_price_summaries(prices.as_ref(), listing, &headers, &mut merger)
                .await?;
        }

        let table = merger.to_table();
        debug!(rows = table.height(), columns = table.width(), "Collected fundamentals");
        Ok(table)
    }

    /// Collects every listing and splits the rows into a [`Dataset`].
    ///
    /// Up to `concurrency` tickers are collected at once; results are added
    /// in input order. Tickers the statement source does not know are
    /// skipped. Any other failure aborts the run.
    pub async fn collect_all(&self, listings: &[TickerListing]) -> Result<Dataset> {
        self.config.validate()?;

        let results: Vec<_> = stream::iter(listings)
            .map(|listing| async move { (listing, self.collect(listing).await) })
            .buffered(self.config.concurrency)
            .collect()
            .await;

        let mut dataset = Dataset::new();
        for (listing, result) in results {
            match result {
                Ok(table) => dataset.push(&table),
                Err(TickaiError::SymbolNotFound(symbol)) => {
                    warn!(symbol = %symbol, url = %listing.url, "Skipping unknown symbol");
                }
                Err(e) => return Err(e),
            }
        }

        info!(tickers = dataset.tickers(), "Collected fundamentals");
        Ok(dataset)
    }

    /// Fetches the ticker list and collects every ticker on it.
    pub async fn run(&self) -> Result<Dataset> {
        let listings = self.listings().await?;
        self.collect_all(&listings).await
    }

    async fn put_price_summaries(
        &self,
        prices: &dyn PriceHistorySource,
        listing: &TickerListing,
        headers: &[String],
        merger: &mut RecordMerger,
    ) -> Result<()> {
        let periods = periods_from_headers(headers, self.config.period_limit)?;
        let mut kept = periods.len();

        for (index, period) in periods.iter().enumerate() {
            let operation = format!(
                "fetch prices {}..{} for {}",
                period.start, period.end, listing.symbol
            );
            let bars = match retry(&self.config.retry, &operation, || {
                prices.fetch_bars(&listing.symbol, period)
            })
            .await
            {
                Ok(bars) => bars,
                Err(TickaiError::DataNotAvailable { .. }) => Vec::new(),
                Err(e) => return Err(e),
            };

            match PriceSummary::from_bars(&bars) {
                Some(summary) => {
                    merger.merge(index, summary.to_labeled().map(<(String, f64)>::from))?;
                }
                None => {
                    debug!(index, start = %period.start, "Price history ends, truncating periods");
                    kept = index;
                    break;
                }
            }
        }

        // Records without a price summary are dropped rather than zero-filled.
        merger.truncate(kept)
    }
}
