//! Period-keyed record merger.
//!
//! [`RecordMerger`] keeps a sparse `record index -> {label -> value}` mapping
//! while statement pages are being read, then pivots it into a dense
//! [`RecordTable`] whose columns are the union of every label seen. Index 0 is
//! the most recent period.

use std::collections::HashSet;
use std::fmt::Debug;

use tickai_core::{PeriodRecord, Result, StatementTable, TickaiError};
use tracing::{debug, instrument};

use crate::options::{ColumnOrder, MergerOptions};
use crate::table::RecordTable;

/// Accumulates per-period line items and materializes them as a table.
///
/// The merger is open for insertion until [`to_table`](Self::to_table) is
/// called. After that every mutating call fails with
/// [`TickaiError::InvalidState`].
#[derive(Debug, Default)]
pub struct RecordMerger {
    records: Vec<PeriodRecord>,
    labels: Vec<String>,
    seen: HashSet<String>,
    options: MergerOptions,
    snapshot: Option<RecordTable>,
}

impl RecordMerger {
    /// Creates an empty merger with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty merger with the given options.
    #[must_use]
    pub fn with_options(options: MergerOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Returns the options this merger was created with.
    #[must_use]
    pub const fn options(&self) -> &MergerOptions {
        &self.options
    }

    /// Sets `series[index][label] = value`.
    ///
    /// The series grows with empty records if `index` is past its end. A
    /// repeated `(index, label)` silently replaces the earlier value unless
    /// the merger is strict, in which case it fails with
    /// [`TickaiError::DuplicateLabel`].
    pub fn insert<I>(&mut self, index: I, label: impl Into<String>, value: f64) -> Result<()>
    where
        I: TryInto<usize> + Copy + Debug,
    {
        self.ensure_open()?;
        let index = self.checked_index(index)?;
        let label = label.into();
        if self.options.strict && self.has_value(index, &label) {
            return Err(TickaiError::DuplicateLabel { index, label });
        }
        self.put(index, label, value);
        Ok(())
    }

    /// Inserts every `(label, value)` pair of `incoming` at `index`.
    ///
    /// Equivalent to calling [`insert`](Self::insert) for each pair. In strict
    /// mode the whole batch is checked first, so a rejected batch leaves the
    /// record untouched.
    pub fn merge<I, K>(
        &mut self,
        index: I,
        incoming: impl IntoIterator<Item = (K, f64)>,
    ) -> Result<()>
    where
        I: TryInto<usize> + Copy + Debug,
        K: Into<String>,
    {
        self.ensure_open()?;
        let index = self.checked_index(index)?;
        let incoming: Vec<(String, f64)> =
            incoming.into_iter().map(|(k, v)| (k.into(), v)).collect();

        if self.options.strict {
            let mut batch = HashSet::with_capacity(incoming.len());
            for (label, _) in &incoming {
                if self.has_value(index, label) || !batch.insert(label.as_str()) {
                    return Err(TickaiError::DuplicateLabel {
                        index,
                        label: label.clone(),
                    });
                }
            }
        }

        for (label, value) in incoming {
            self.put(index, label, value);
        }
        Ok(())
    }

    /// Merges a whole [`PeriodRecord`] into the record at `index`.
    pub fn merge_record<I>(&mut self, index: I, record: &PeriodRecord) -> Result<()>
    where
        I: TryInto<usize> + Copy + Debug,
    {
        self.merge(index, record.iter())
    }

    /// Folds one extracted statement page into the series.
    ///
    /// Cell `i` of every row is normalized and inserted at record `i` under the
    /// row's label. The page is checked as a whole first, so a rejected page
    /// leaves the series untouched.
    #[instrument(skip(self, table), fields(rows = table.rows.len()))]
    pub fn absorb(&mut self, table: &StatementTable) -> Result<()> {
        self.ensure_open()?;

        let periods = table.period_count();
        if periods > self.options.max_records {
            return Err(TickaiError::InvalidArgument(format!(
                "Statement has {periods} periods, more than the limit of {} records",
                self.options.max_records
            )));
        }

        if self.options.strict {
            let mut batch = HashSet::new();
            for row in &table.rows {
                for index in 0..row.cells.len() {
                    if self.has_value(index, &row.label)
                        || !batch.insert((index, row.label.as_str()))
                    {
                        return Err(TickaiError::DuplicateLabel {
                            index,
                            label: row.label.clone(),
                        });
                    }
                }
            }
        }

        for row in &table.rows {
            for (index, value) in row.values() {
                self.put(index, row.label.clone(), value);
            }
        }
        debug!(
            records = self.records.len(),
            labels = self.labels.len(),
            "Absorbed statement table"
        );
        Ok(())
    }

    /// Drops every record at or past `len`.
    ///
    /// Labels that no remaining record carries are dropped from the column set.
    pub fn truncate(&mut self, len: usize) -> Result<()> {
        self.ensure_open()?;
        if len >= self.records.len() {
            return Ok(());
        }
        debug!(from = self.records.len(), to = len, "Truncating record series");
        self.records.truncate(len);

        let records = &self.records;
        self.labels
            .retain(|label| records.iter().any(|r| r.contains(label)));
        self.seen = self.labels.iter().cloned().collect();
        Ok(())
    }

    /// Closes the merger and returns the dense table.
    ///
    /// Columns are the union of all labels, ordered by the configured
    /// [`ColumnOrder`]. Rows follow record order, and a label missing from a
    /// record reads as `0`. Calling this again returns the same snapshot.
    pub fn to_table(&mut self) -> RecordTable {
        if let Some(table) = &self.snapshot {
            return table.clone();
        }

        let mut columns = self.labels.clone();
        if self.options.column_order == ColumnOrder::Lexical {
            columns.sort();
        }

        let rows: Vec<Vec<f64>> = self
            .records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|label| record.get(label).unwrap_or(0.0))
                    .collect()
            })
            .collect();

        debug!(rows = rows.len(), columns = columns.len(), "Materialized record table");
        let table = RecordTable::from_parts(columns, rows);
        self.snapshot = Some(table.clone());
        table
    }

    /// Number of records in the series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no record has been created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns true once [`to_table`](Self::to_table) has been called.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Returns the record at `index`.
    #[must_use]
    pub fn record(&self, index: usize) -> Option<&PeriodRecord> {
        self.records.get(index)
    }

    /// Labels seen so far, in first-seen order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(TickaiError::InvalidState(
                "Record merger is closed; the table has already been materialized".to_string(),
            ));
        }
        Ok(())
    }

    fn checked_index<I>(&self, index: I) -> Result<usize>
    where
        I: TryInto<usize> + Copy + Debug,
    {
        let checked = index.try_into().map_err(|_| {
            TickaiError::InvalidArgument(format!("Record index {index:?} must be non-negative"))
        })?;
        if checked >= self.options.max_records {
            return Err(TickaiError::InvalidArgument(format!(
                "Record index {checked} exceeds the limit of {} records",
                self.options.max_records
            )));
        }
        Ok(checked)
    }

    fn has_value(&self, index: usize, label: &str) -> bool {
        self.records.get(index).is_some_and(|r| r.contains(label))
    }

    fn put(&mut self, index: usize, label: String, value: f64) {
        if index >= self.records.len() {
            self.records.resize_with(index + 1, PeriodRecord::new);
        }
        if !self.seen.contains(&label) {
            self.seen.insert(label.clone());
            self.labels.push(label.clone());
        }
        if let Some(previous) = self.records[index].insert(label.as_str(), value) {
            debug!(index, label = %label, previous, value, "Overwrote existing value");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tickai_core::StatementRow;

    #[test]
    fn test_overwrite_keeps_last_value() {
        let mut merger = RecordMerger::new();
        merger.insert(0, "Revenue", 10.0).unwrap();
        merger.insert(0, "Revenue", 20.0).unwrap();

        let table = merger.to_table();
        assert_eq!(table.height(), 1);
        assert_eq!(table.value(0, "Revenue"), Some(20.0));
    }

    #[test]
    fn test_union_of_labels() {
        let mut merger = RecordMerger::new();
        merger.insert(0, "A", 1.0).unwrap();
        merger.insert(1, "B", 2.0).unwrap();

        let table = merger.to_table();
        assert_eq!(table.height(), 2);
        assert_eq!(table.columns(), &["A".to_string(), "B".to_string()]);
        assert_eq!(table.row(0), Some(&[1.0, 0.0][..]));
        assert_eq!(table.row(1), Some(&[0.0, 2.0][..]));
    }

    #[test]
    fn test_auto_extension() {
        let mut merger = RecordMerger::new();
        merger.insert(2, "X", 5.0).unwrap();
        assert_eq!(merger.len(), 3);

        let table = merger.to_table();
        assert_eq!(table.height(), 3);
        assert_eq!(table.row(0), Some(&[0.0][..]));
        assert_eq!(table.row(1), Some(&[0.0][..]));
        assert_eq!(table.value(2, "X"), Some(5.0));
    }

    #[test]
    fn test_merge_matches_inserts() {
        let mut merged = RecordMerger::new();
        merged.merge(0, [("A", 1.0), ("B", 2.0)]).unwrap();

        let mut inserted = RecordMerger::new();
        inserted.insert(0, "A", 1.0).unwrap();
        inserted.insert(0, "B", 2.0).unwrap();

        assert_eq!(merged.to_table(), inserted.to_table());
    }

    #[test]
    fn test_merge_from_map() {
        let mut incoming = HashMap::new();
        incoming.insert("Total Assets".to_string(), 300.0);
        incoming.insert("Total Liabilities".to_string(), 120.0);

        let mut merger = RecordMerger::new();
        merger.merge(1, incoming).unwrap();

        let record = merger.record(1).unwrap();
        assert_eq!(record.get("Total Assets"), Some(300.0));
        assert!(merger.record(0).unwrap().is_empty());
    }

    #[test]
    fn test_insert_after_close_fails() {
        let mut merger = RecordMerger::new();
        merger.insert(0, "A", 1.0).unwrap();
        let first = merger.to_table();

        let err = merger.insert(0, "A", 2.0).unwrap_err();
        assert!(matches!(err, TickaiError::InvalidState(_)));
        assert!(matches!(merger.merge(0, [("B", 1.0)]), Err(TickaiError::InvalidState(_))));
        assert!(matches!(merger.truncate(0), Err(TickaiError::InvalidState(_))));

        // A second materialization returns the same snapshot.
        assert_eq!(merger.to_table(), first);
    }

    #[test]
    fn test_negative_index_rejected() {
        let mut merger = RecordMerger::new();
        let err = merger.insert(-1, "A", 1.0).unwrap_err();
        assert!(matches!(err, TickaiError::InvalidArgument(_)));
        assert!(merger.is_empty());
    }

    #[test]
    fn test_index_past_limit_rejected() {
        let mut merger = RecordMerger::with_options(MergerOptions::default().with_max_records(4));
        assert!(merger.insert(3, "A", 1.0).is_ok());
        assert!(matches!(
            merger.insert(4, "A", 1.0),
            Err(TickaiError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_strict_mode_rejects_duplicates() {
        let mut merger = RecordMerger::with_options(MergerOptions::default().strict());
        merger.insert(0, "Revenue", 10.0).unwrap();

        let err = merger.insert(0, "Revenue", 20.0).unwrap_err();
        assert!(matches!(err, TickaiError::DuplicateLabel { index: 0, .. }));

        // The batch is rejected as a whole.
        let err = merger.merge(0, [("Net Income", 1.0), ("Revenue", 30.0)]);
        assert!(err.is_err());
        let record = merger.record(0).unwrap();
        assert_eq!(record.get("Revenue"), Some(10.0));
        assert!(!record.contains("Net Income"));

        // The same label in another period is fine.
        assert!(merger.insert(1, "Revenue", 5.0).is_ok());
    }

    #[test]
    fn test_lexical_column_order() {
        let options = MergerOptions::default().with_column_order(ColumnOrder::Lexical);
        let mut merger = RecordMerger::with_options(options);
        merger.insert(0, "Total Revenue", 1.0).unwrap();
        merger.insert(0, "Cash", 2.0).unwrap();
        merger.insert(0, "Net Income", 3.0).unwrap();

        let table = merger.to_table();
        assert_eq!(table.columns(), &["Cash", "Net Income", "Total Revenue"]);
        assert_eq!(table.row(0), Some(&[2.0, 3.0, 1.0][..]));
    }

    #[test]
    fn test_absorb_statement_table() {
        let income = StatementTable::new(
            vec!["2023\n31/12".to_string(), "2022\n31/12".to_string()],
            vec![
                StatementRow::new("Total Revenue", ["1,000", "900"]),
                StatementRow::new("Net Income", ["100", "-"]),
            ],
        );
        let balance = StatementTable::new(
            vec!["2023\n31/12".to_string(), "2022\n31/12".to_string()],
            vec![StatementRow::new("Total Debt to Equity", ["45%", "50%"])],
        );

        let mut merger = RecordMerger::new();
        merger.absorb(&income).unwrap();
        merger.absorb(&balance).unwrap();

        let table = merger.to_table();
        assert_eq!(table.height(), 2);
        assert_eq!(table.width(), 3);
        assert_eq!(table.value(0, "Total Revenue"), Some(1000.0));
        assert_eq!(table.value(1, "Net Income"), Some(0.0));
        assert_eq!(table.value(1, "Total Debt to Equity"), Some(0.5));
    }

    #[test]
    fn test_strict_absorb_rejects_whole_page() {
        let mut merger = RecordMerger::with_options(MergerOptions::default().strict());
        merger.insert(0, "Net Income", 1.0).unwrap();

        let cash_flow = StatementTable::new(
            vec!["2023\n31/12".to_string(), "2022\n31/12".to_string()],
            vec![
                StatementRow::new("Operating Cash", ["5", "4"]),
                StatementRow::new("Net Income", ["2", "3"]),
            ],
        );
        let err = merger.absorb(&cash_flow).unwrap_err();
        assert!(matches!(err, TickaiError::DuplicateLabel { index: 0, .. }));

        assert_eq!(merger.len(), 1);
        let record = merger.record(0).unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("Net Income"), Some(1.0));
        assert_eq!(merger.labels(), &["Net Income".to_string()]);
        assert!(!merger.is_closed());
    }

    #[test]
    fn test_strict_absorb_rejects_repeated_row() {
        let mut merger = RecordMerger::with_options(MergerOptions::default().strict());
        let page = StatementTable::new(
            vec!["2023\n31/12".to_string()],
            vec![
                StatementRow::new("Revenue", ["10"]),
                StatementRow::new("Revenue", ["11"]),
            ],
        );

        assert!(matches!(
            merger.absorb(&page),
            Err(TickaiError::DuplicateLabel { index: 0, .. })
        ));
        assert!(merger.is_empty());
    }

    #[test]
    fn test_absorb_rejects_page_past_limit() {
        let mut merger = RecordMerger::with_options(MergerOptions::default().with_max_records(2));
        let page = StatementTable::new(
            Vec::new(),
            vec![
                StatementRow::new("Revenue", ["1", "2"]),
                StatementRow::new("Net Income", ["1", "2", "3"]),
            ],
        );

        assert!(matches!(
            merger.absorb(&page),
            Err(TickaiError::InvalidArgument(_))
        ));
        assert!(merger.is_empty());
        assert!(merger.labels().is_empty());
    }

    #[test]
    fn test_merge_record_combines_records() {
        let earlier: PeriodRecord = [("Total Assets", 300.0), ("Cash", 40.0)].into_iter().collect();
        let later: PeriodRecord = [("Cash", 45.0)].into_iter().collect();

        let mut merger = RecordMerger::new();
        merger.merge_record(0, &earlier).unwrap();
        merger.merge_record(0, &later).unwrap();

        let record = merger.record(0).unwrap();
        assert_eq!(record.get("Total Assets"), Some(300.0));
        assert_eq!(record.get("Cash"), Some(45.0));
        assert_eq!(merger.len(), 1);
    }

    #[test]
    fn test_truncate_drops_orphan_labels() {
        let mut merger = RecordMerger::new();
        merger.insert(0, "A", 1.0).unwrap();
        merger.insert(2, "B", 2.0).unwrap();

        merger.truncate(1).unwrap();
        assert_eq!(merger.len(), 1);
        assert_eq!(merger.labels(), &["A".to_string()]);

        let table = merger.to_table();
        assert_eq!(table.columns(), &["A"]);
    }

    #[test]
    fn test_empty_merger_table() {
        let mut merger = RecordMerger::new();
        let table = merger.to_table();
        assert!(table.is_empty());
        assert_eq!(table.width(), 0);
        assert!(merger.is_closed());
    }
}
