//! Merger options.

use serde::{Deserialize, Serialize};

/// Default ceiling on the number of records a merger will hold.
pub const DEFAULT_MAX_RECORDS: usize = 1024;

/// Column ordering policy for materialized tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnOrder {
    /// Labels appear in the order they were first inserted anywhere in the series.
    #[default]
    FirstSeen,
    /// Labels are sorted lexically.
    Lexical,
}

/// Options controlling how a [`RecordMerger`](crate::RecordMerger) accepts values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergerOptions {
    /// Reject a second value for the same `(record, label)` instead of overwriting it.
    pub strict: bool,
    /// Column ordering of the materialized table.
    pub column_order: ColumnOrder,
    /// Record indices at or above this are rejected as nonsensical.
    pub max_records: usize,
}

impl Default for MergerOptions {
    fn default() -> Self {
        Self {
            strict: false,
            column_order: ColumnOrder::default(),
            max_records: DEFAULT_MAX_RECORDS,
        }
    }
}

impl MergerOptions {
    /// Enables duplicate detection.
    #[must_use]
    pub const fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Sets the column ordering policy.
    #[must_use]
    pub const fn with_column_order(mut self, column_order: ColumnOrder) -> Self {
        self.column_order = column_order;
        self
    }

    /// Sets the record ceiling.
    #[must_use]
    pub const fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = max_records;
        self
    }
}
