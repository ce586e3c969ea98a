//! Train/test split of collected fundamentals.

use serde::{Deserialize, Serialize};
use tickai_merge::RecordTable;

/// Fundamentals for many tickers, split by period recency.
///
/// Each ticker's latest period goes to `test` and its older periods go to
/// `train`. `combined` keeps every row in push order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    train: RecordTable,
    test: RecordTable,
    combined: RecordTable,
    tickers: usize,
}

impl Dataset {
    /// Creates an empty dataset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one ticker's table, latest period first.
    ///
    /// A table with no rows adds nothing and is not counted as a ticker.
    pub fn push(&mut self, table: &RecordTable) {
        if table.is_empty() {
            return;
        }
        let (latest, older) = table.split_first();
        self.test.append(&latest);
        self.train.append(&older);
        self.combined.append(table);
        self.tickers += 1;
    }

    /// Rows for every period except each ticker's latest.
    #[must_use]
    pub const fn train(&self) -> &RecordTable {
        &self.train
    }

    /// Each ticker's latest period.
    #[must_use]
    pub const fn test(&self) -> &RecordTable {
        &self.test
    }

    /// Every row in push order.
    #[must_use]
    pub const fn combined(&self) -> &RecordTable {
        &self.combined
    }

    /// Number of tickers that contributed rows.
    #[must_use]
    pub const fn tickers(&self) -> usize {
        self.tickers
    }

    /// Returns true if no ticker has been pushed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tickers == 0
    }

    /// Consumes the dataset, returning `(train, test)`.
    #[must_use]
    pub fn into_split(self) -> (RecordTable, RecordTable) {
        (self.train, self.test)
    }
}
