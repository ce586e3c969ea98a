//! Core data types for scraped financial fundamentals.
//!
//! This module defines the data structures exchanged between the external
//! sources and the record merger:
//!
//! - [`Symbol`] - Trading symbol/ticker
//! - [`TickerListing`] - A ticker and the page it was listed under
//! - [`StatementPage`] - Which financial statement a table came from
//! - [`StatementRow`] / [`StatementTable`] - Raw extracted statement text
//! - [`LabeledValue`] - One normalized line item for one period
//! - [`PeriodRecord`] - All line items collected for one period
//! - [`PriceBar`] / [`PriceSummary`] - Daily prices and their per-period summary

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map;
use std::fmt;
use std::str::FromStr;

use crate::value::parse_value;

/// A trading symbol/ticker.
///
/// Symbols are automatically uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A ticker together with the URL of its equity overview page.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickerListing {
    /// The listed symbol.
    pub symbol: Symbol,
    /// Overview page URL, without query string.
    pub url: String,
}

impl TickerListing {
    /// Creates a listing, dropping any query string from `url`.
    #[must_use]
    pub fn new(symbol: impl Into<Symbol>, url: &str) -> Self {
        let url = url.split('?').next().unwrap_or_default();
        Self {
            symbol: symbol.into(),
            url: url.to_string(),
        }
    }

    /// Returns the URL of one of the listing's statement pages.
    #[must_use]
    pub fn statement_url(&self, page: StatementPage) -> String {
        format!("{}{}", self.url, page.url_suffix())
    }
}

/// The financial statement a table was scraped from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementPage {
    /// Income statement.
    IncomeStatement,
    /// Balance sheet.
    BalanceSheet,
    /// Cash flow statement.
    CashFlow,
}

impl StatementPage {
    /// All statement pages in the order they are collected.
    pub const ALL: [Self; 3] = [Self::IncomeStatement, Self::BalanceSheet, Self::CashFlow];

    /// Suffix appended to a listing URL to reach this page.
    #[must_use]
    pub const fn url_suffix(&self) -> &'static str {
        match self {
            Self::IncomeStatement => "-income-statement",
            Self::BalanceSheet => "-balance-sheet",
            Self::CashFlow => "-cash-flow",
        }
    }
}

impl fmt::Display for StatementPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::IncomeStatement => "income statement",
            Self::BalanceSheet => "balance sheet",
            Self::CashFlow => "cash flow",
        };
        f.write_str(name)
    }
}

/// A single line item for a single period, already normalized to a number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabeledValue {
    /// Row header of the line item (e.g. "Net Income").
    pub label: String,
    /// Normalized value.
    pub value: f64,
}

impl LabeledValue {
    /// Creates a labeled value from an already parsed number.
    #[must_use]
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    /// Creates a labeled value by normalizing raw cell text.
    ///
    /// Non-numeric text collapses to `0`; see [`parse_value`].
    #[must_use]
    pub fn parse(label: impl Into<String>, raw: &str) -> Self {
        Self::new(label, parse_value(raw))
    }
}

/// One extracted statement row: the label cell followed by one raw cell per period.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRow {
    /// Text of the first cell.
    pub label: String,
    /// Raw text of the remaining cells, latest period first.
    pub cells: Vec<String>,
}

impl StatementRow {
    /// Creates a row from a label and its raw period cells.
    #[must_use]
    pub fn new<I, S>(label: impl Into<String>, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.into(),
            cells: cells.into_iter().map(Into::into).collect(),
        }
    }

    /// Iterates over `(period_index, value)` pairs with each cell normalized.
    pub fn values(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (i, parse_value(cell)))
    }

    /// Returns the normalized value for one period, if the row has that column.
    #[must_use]
    pub fn labeled(&self, period_index: usize) -> Option<LabeledValue> {
        self.cells
            .get(period_index)
            .map(|cell| LabeledValue::parse(self.label.clone(), cell))
    }
}

/// One statement page as extracted by a [`StatementSource`](crate::source::StatementSource).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementTable {
    /// Raw period header text (e.g. `"2023\n31/12"`), latest first.
    pub period_headers: Vec<String>,
    /// Data rows; header and separator rows are already excluded.
    pub rows: Vec<StatementRow>,
}

impl StatementTable {
    /// Creates a table from its period headers and rows.
    #[must_use]
    pub const fn new(period_headers: Vec<String>, rows: Vec<StatementRow>) -> Self {
        Self {
            period_headers,
            rows,
        }
    }

    /// Number of period columns, taken as the widest row.
    #[must_use]
    pub fn period_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }
}

/// All line items collected for one reporting period.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    values: HashMap<String, f64>,
}

impl PeriodRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a label's value, returning the value it replaced.
    pub fn insert(&mut self, label: impl Into<String>, value: f64) -> Option<f64> {
        self.values.insert(label.into(), value)
    }

    /// Returns the value recorded for a label.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<f64> {
        self.values.get(label).copied()
    }

    /// Returns true if the label has a value in this record.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.values.contains_key(label)
    }

    /// Number of labels in this record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(label, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<'a> IntoIterator for &'a PeriodRecord {
    type Item = (&'a String, &'a f64);
    type IntoIter = hash_map::Iter<'a, String, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for PeriodRecord {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl From<LabeledValue> for (String, f64) {
    fn from(lv: LabeledValue) -> Self {
        (lv.label, lv.value)
    }
}

/// A daily price bar.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading date.
    pub date: NaiveDate,
    /// Opening price.
    pub open: f64,
    /// Highest price during the day.
    pub high: f64,
    /// Lowest price during the day.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Trading volume.
    pub volume: f64,
}

impl PriceBar {
    /// Creates a new price bar.
    #[must_use]
    pub const fn new(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Price extremes and average volume over one reporting period.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    /// Highest high over the period.
    pub high: f64,
    /// Lowest low over the period.
    pub low: f64,
    /// Mean daily volume over the period.
    pub avg_volume: f64,
}

impl PriceSummary {
    /// Label under which [`Self::high`] is recorded.
    pub const HIGH_LABEL: &'static str = "High";
    /// Label under which [`Self::low`] is recorded.
    pub const LOW_LABEL: &'static str = "Low";
    /// Label under which [`Self::avg_volume`] is recorded.
    pub const AVG_VOLUME_LABEL: &'static str = "avg Volume";

    /// Summarizes a slice of bars. Returns `None` for an empty slice.
    #[must_use]
    pub fn from_bars(bars: &[PriceBar]) -> Option<Self> {
        if bars.is_empty() {
            return None;
        }
        let high = bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let low = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let avg_volume = bars.iter().map(|b| b.volume).sum::<f64>() / bars.len() as f64;
        Some(Self {
            high,
            low,
            avg_volume,
        })
    }

    /// Returns the summary as labeled line items.
    #[must_use]
    pub fn to_labeled(&self) -> [LabeledValue; 3] {
        [
            LabeledValue::new(Self::HIGH_LABEL, self.high),
            LabeledValue::new(Self::LOW_LABEL, self.low),
            LabeledValue::new(Self::AVG_VOLUME_LABEL, self.avg_volume),
        ]
    }
}
