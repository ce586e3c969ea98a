//! Dense, rectangular view of merged records.

use std::collections::{HashMap, HashSet};

use polars::prelude::{Column, DataFrame, PlSmallStr};
use serde::{Deserialize, Serialize};
use tickai_core::{Result, TickaiError};

/// Rows of period values under a shared set of label columns.
///
/// Every row has exactly one value per column. Row order is period order
/// (latest first) for a single ticker, or push order once tables are stacked
/// with [`append`](Self::append).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRecordTable")]
pub struct RecordTable {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

/// Unchecked wire form of [`RecordTable`].
#[derive(Debug, Deserialize)]
struct RawRecordTable {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl TryFrom<RawRecordTable> for RecordTable {
    type Error = TickaiError;

    fn try_from(raw: RawRecordTable) -> Result<Self> {
        Self::new(raw.columns, raw.rows)
    }
}

impl RecordTable {
    /// Creates an empty table with no rows or columns.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a table, checking that column names are unique and every row
    /// has one value per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        let mut names = HashSet::with_capacity(columns.len());
        if let Some(dup) = columns.iter().find(|c| !names.insert(c.as_str())) {
            return Err(TickaiError::Table(format!("Duplicate column {dup:?}")));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns.len()) {
            return Err(TickaiError::Table(format!(
                "Row {i} has {} values, expected {}",
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    pub(crate) const fn from_parts(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Self {
        Self { columns, rows }
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of label columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column labels in table order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns one row's values, in column order.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Iterates over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Returns the value at `row` under `label`.
    #[must_use]
    pub fn value(&self, row: usize, label: &str) -> Option<f64> {
        let col = self.position(label)?;
        self.rows.get(row).map(|r| r[col])
    }

    /// Returns every row's value under `label`.
    #[must_use]
    pub fn column(&self, label: &str) -> Option<Vec<f64>> {
        let col = self.position(label)?;
        Some(self.rows.iter().map(|r| r[col]).collect())
    }

    /// Stacks `other` below this table.
    ///
    /// The column set becomes the union of both tables: this table's columns
    /// first, then labels only `other` has, in `other`'s order. Cells with no
    /// value on either side are `0`.
    pub fn append(&mut self, other: &Self) {
        let mut index: HashMap<String, usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();

        for label in &other.columns {
            if !index.contains_key(label) {
                index.insert(label.clone(), self.columns.len());
                self.columns.push(label.clone());
            }
        }

        let width = self.columns.len();
        for row in &mut self.rows {
            row.resize(width, 0.0);
        }

        let mapping: Vec<usize> = other.columns.iter().map(|c| index[c]).collect();
        for source in &other.rows {
            let mut row = vec![0.0; width];
            for (value, &col) in source.iter().zip(&mapping) {
                row[col] = *value;
            }
            self.rows.push(row);
        }
    }

    /// Splits off the first row.
    ///
    /// Returns `(first, rest)`, both with this table's columns. `first` is
    /// empty if the table has no rows.
    #[must_use]
    pub fn split_first(&self) -> (Self, Self) {
        let split = self.rows.len().min(1);
        let (head, tail) = self.rows.split_at(split);
        (
            Self::from_parts(self.columns.clone(), head.to_vec()),
            Self::from_parts(self.columns.clone(), tail.to_vec()),
        )
    }

    /// Builds a polars [`DataFrame`].
    ///
    /// The first column is a `u32` row index named `index_column`, followed by
    /// one `f64` column per label.
    pub fn to_dataframe(&self, index_column: &str) -> Result<DataFrame> {
        if self.position(index_column).is_some() {
            return Err(TickaiError::Table(format!(
                "Index column {index_column:?} collides with a label"
            )));
        }

        let mut columns = Vec::with_capacity(self.width() + 1);
        let index: Vec<u32> = (0..self.height()).map(|i| i as u32).collect();
        columns.push(Column::new(PlSmallStr::from(index_column), index));

        for (col, label) in self.columns.iter().enumerate() {
            let values: Vec<f64> = self.rows.iter().map(|r| r[col]).collect();
            columns.push(Column::new(PlSmallStr::from(label.as_str()), values));
        }

        DataFrame::new(columns).map_err(|e| TickaiError::Table(e.to_string()))
    }

    fn position(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }
}
