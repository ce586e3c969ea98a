//! Lock-guarded merger for concurrent writers.

use std::fmt::Debug;
use std::sync::Arc;

use tickai_core::{Result, StatementTable};
use tokio::sync::Mutex;

use crate::{MergerOptions, RecordMerger, RecordTable};

/// A [`RecordMerger`] shared between tasks.
///
/// Every call takes the lock, so writes to the same record index are
/// serialized. Materialize with [`to_table`](Self::to_table) only after all
/// writers have finished; any write after that fails with
/// [`TickaiError::InvalidState`](tickai_core::TickaiError::InvalidState).
#[derive(Clone, Debug, Default)]
pub struct SharedMerger {
    inner: Arc<Mutex<RecordMerger>>,
}

impl SharedMerger {
    /// Creates an empty shared merger with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty shared merger with the given options.
    #[must_use]
    pub fn with_options(options: MergerOptions) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RecordMerger::with_options(options))),
        }
    }

    /// See [`RecordMerger::insert`].
    pub async fn insert<I>(&self, index: I, label: impl Into<String>, value: f64) -> Result<()>
    where
        I: TryInto<usize> + Copy + Debug,
    {
        self.inner.lock().await.insert(index, label, value)
    }

    /// See [`RecordMerger::merge`].
    pub async fn merge<I, K>(
        &self,
        index: I,
        incoming: impl IntoIterator<Item = (K, f64)>,
    ) -> Result<()>
    where
        I: TryInto<usize> + Copy + Debug,
        K: Into<String>,
    {
        self.inner.lock().await.merge(index, incoming)
    }

    /// See [`RecordMerger::absorb`].
    pub async fn absorb(&self, table: &StatementTable) -> Result<()> {
        self.inner.lock().await.absorb(table)
    }

    /// See [`RecordMerger::truncate`].
    pub async fn truncate(&self, len: usize) -> Result<()> {
        self.inner.lock().await.truncate(len)
    }

    /// See [`RecordMerger::to_table`].
    pub async fn to_table(&self) -> RecordTable {
        self.inner.lock().await.to_table()
    }

    /// Number of records in the series.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Returns true if no record has been created.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickai_core::TickaiError;

    #[tokio::test]
    async fn test_concurrent_pages_share_series() {
        let merger = SharedMerger::new();

        let mut handles = Vec::new();
        for (page, label) in ["Total Revenue", "Total Assets", "Net Change in Cash"]
            .into_iter()
            .enumerate()
        {
            let merger = merger.clone();
            handles.push(tokio::spawn(async move {
                for period in 0..4usize {
                    merger
                        .insert(period, label, (page * 10 + period) as f64)
                        .await
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let table = merger.to_table().await;
        assert_eq!(table.height(), 4);
        assert_eq!(table.width(), 3);
        assert_eq!(table.value(3, "Total Assets"), Some(13.0));
        assert_eq!(table.value(2, "Net Change in Cash"), Some(22.0));
    }

    #[tokio::test]
    async fn test_write_after_close_fails() {
        let merger = SharedMerger::new();
        merger.merge(0, [("A", 1.0)]).await.unwrap();
        let _ = merger.to_table().await;

        let err = merger.insert(1, "B", 2.0).await.unwrap_err();
        assert!(matches!(err, TickaiError::InvalidState(_)));
    }
}
