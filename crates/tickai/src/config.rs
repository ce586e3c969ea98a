//! Collector configuration.

use serde::{Deserialize, Serialize};
use tickai_core::{DEFAULT_PERIOD_LIMIT, PeriodType, Result, StatementPage, TickaiError};
use tickai_merge::MergerOptions;

use crate::retry::RetryPolicy;

/// Default number of tickers collected at once.
const DEFAULT_CONCURRENCY: usize = 1;

/// Configuration for a [`FundamentalsCollector`](crate::FundamentalsCollector).
///
/// Every field has a default, so a JSON document only needs the fields it
/// overrides:
///
/// ```
/// use tickai::CollectorConfig;
///
/// let json = r#"{ "concurrency": 4, "merger": { "strict": true } }"#;
/// let config = CollectorConfig::from_json(json)?;
/// assert_eq!(config.concurrency, 4);
/// assert!(config.merger.strict);
/// assert_eq!(config.pages.len(), 3);
/// # Ok::<(), tickai::TickaiError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Statement pages to read for each ticker, in order.
    pub pages: Vec<StatementPage>,
    /// Whether statement pages show annual or quarterly columns.
    pub period_type: PeriodType,
    /// Maximum number of periods to attach price summaries to.
    pub period_limit: usize,
    /// Number of tickers collected concurrently.
    pub concurrency: usize,
    /// Retry policy applied to every source call.
    pub retry: RetryPolicy,
    /// Options for each ticker's record merger.
    pub merger: MergerOptions,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            pages: StatementPage::ALL.to_vec(),
            period_type: PeriodType::default(),
            period_limit: DEFAULT_PERIOD_LIMIT,
            concurrency: DEFAULT_CONCURRENCY,
            retry: RetryPolicy::default(),
            merger: MergerOptions::default(),
        }
    }
}

impl CollectorConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| TickaiError::Config(format!("Invalid collector config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration can be executed.
    pub fn validate(&self) -> Result<()> {
        if self.pages.is_empty() {
            return Err(TickaiError::Config("At least one statement page is required".to_string()));
        }
        if self.period_limit == 0 {
            return Err(TickaiError::Config("period_limit must be at least 1".to_string()));
        }
        if self.concurrency == 0 {
            return Err(TickaiError::Config("concurrency must be at least 1".to_string()));
        }
        if self.merger.max_records == 0 {
            return Err(TickaiError::Config("merger.max_records must be at least 1".to_string()));
        }
        self.retry.validate()
    }

    /// Sets the statement pages to read.
    #[must_use]
    pub fn with_pages(mut self, pages: impl Into<Vec<StatementPage>>) -> Self {
        self.pages = pages.into();
        self
    }

    /// Sets the reporting frequency to request.
    #[must_use]
    pub const fn with_period_type(mut self, period_type: PeriodType) -> Self {
        self.period_type = period_type;
        self
    }

    /// Sets the number of tickers collected concurrently.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the merger options.
    #[must_use]
    pub fn with_merger(mut self, merger: MergerOptions) -> Self {
        self.merger = merger;
        self
    }
}
