//! Reporting period definitions and header bucketing.
//!
//! Statement tables label each period column with a header such as
//! `"2023\n31/12"`. This module turns those headers into [`ReportingPeriod`]s
//! covering the trailing year that ends on the header date, which is the window
//! used for the per-period price summary.

use std::fmt;

use chrono::{Datelike, Months, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TickaiError};

/// Number of period columns a statement page shows.
pub const DEFAULT_PERIOD_LIMIT: usize = 4;

/// Reporting frequency shown on a statement page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    /// Annual reporting period.
    #[default]
    Annual,
    /// Quarterly reporting period.
    Quarterly,
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Annual => write!(f, "annual"),
            Self::Quarterly => write!(f, "quarterly"),
        }
    }
}

/// A closed date range covered by one reporting period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportingPeriod {
    /// First day of the window.
    pub start: NaiveDate,
    /// Last day of the window (the statement date).
    pub end: NaiveDate,
}

impl ReportingPeriod {
    /// Creates a period from explicit bounds.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(TickaiError::InvalidArgument(format!(
                "Period start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// The year ending on `end`, with the start moved forward to the next Monday.
    ///
    /// A start that already falls on a Monday moves a full week forward.
    pub fn trailing_year(end: NaiveDate) -> Result<Self> {
        let year_before = end
            .checked_sub_months(Months::new(12))
            .ok_or_else(|| TickaiError::InvalidArgument(format!("No year before {end}")))?;
        let shift = 7 - i64::from(year_before.weekday().num_days_from_monday());
        let start = year_before + TimeDelta::days(shift);
        Ok(Self { start, end })
    }

    /// Returns true if `date` falls inside the period.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Parses a period header of the form `"year\nday/month"`.
pub fn parse_period_header(header: &str) -> Result<NaiveDate> {
    let (year, day_month) = header
        .trim()
        .split_once('\n')
        .ok_or_else(|| TickaiError::Parse(format!("Malformed period header {header:?}")))?;
    let text = format!("{}/{}", day_month.trim(), year.trim());
    NaiveDate::parse_from_str(&text, "%d/%m/%Y")
        .map_err(|e| TickaiError::Parse(format!("Invalid period date {text:?}: {e}")))
}

/// Maps up to `limit` period headers to trailing-year periods, latest first.
pub fn periods_from_headers<S: AsRef<str>>(
    headers: &[S],
    limit: usize,
) -> Result<Vec<ReportingPeriod>> {
    headers
        .iter()
        .take(limit)
        .map(|h| parse_period_header(h.as_ref()).and_then(ReportingPeriod::trailing_year))
        .collect()
}
