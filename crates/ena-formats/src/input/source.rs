//! In-memory shapes produced by the tabular reader.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One sample: attribute name to cell value.
///
/// A `None` value means the cell was absent from the row (the row was
/// shorter than the header). Empty cells are kept as `Some("")`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRow {
    cells: IndexMap<String, Option<String>>,
}

impl SampleRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell, keeping insertion order.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        self.cells.insert(name.into(), value);
    }

    /// Whether the row carries the given attribute at all.
    pub fn contains(&self, name: &str) -> bool {
        self.cells.contains_key(name)
    }

    /// Raw cell lookup. Outer `None` = no such attribute, inner `None` = null cell.
    pub fn cell(&self, name: &str) -> Option<Option<&str>> {
        self.cells.get(name).map(|v| v.as_deref())
    }

    /// Cell value with absent and null collapsed together.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cells.get(name).and_then(|v| v.as_deref())
    }

    /// Iterate over cells in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SampleRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = SampleRow::new();
        for (k, v) in iter {
            row.insert(k, Some(v.into()));
        }
        row
    }
}

/// Ordered rows of a sample metadata file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleTable {
    /// Column headers, in file order.
    pub headers: Vec<String>,
    /// Rows, in file order.
    pub rows: Vec<SampleRow>,
}

impl SampleTable {
    /// Create a new sample table.
    pub fn new(headers: Vec<String>, rows: Vec<SampleRow>) -> Self {
        Self { headers, rows }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether a column with this name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// All raw cells of a column, one per row. `None` if the column is unknown.
    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        if !self.has_column(name) {
            return None;
        }
        Some(
            self.rows
                .iter()
                .map(|row| row.cell(name).flatten())
                .collect(),
        )
    }
}

/// The key-value pairs of a study metadata file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyRecord {
    values: IndexMap<String, Option<String>>,
}

impl StudyRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key. Returns the previous value if the key was already present.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: Option<String>,
    ) -> Option<Option<String>> {
        self.values.insert(key.into(), value)
    }

    /// Whether the key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Raw lookup. Outer `None` = no such key, inner `None` = null value.
    pub fn cell(&self, key: &str) -> Option<Option<&str>> {
        self.values.get(key).map(|v| v.as_deref())
    }

    /// Value with absent and null collapsed together.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|v| v.as_deref())
    }

    /// Keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    /// Iterate over entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StudyRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = StudyRecord::new();
        for (k, v) in iter {
            record.insert(k, Some(v.into()));
        }
        record
    }
}
