//! Domain types for template data, mappings, and generated documents.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of a placeholder token, trimmed of surrounding whitespace.
pub type PlaceholderKey = String;

/// One record of the tabular data source.
///
/// Fields keep the source column order so the first column can be used
/// for output naming.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataRow {
    fields: Vec<(String, String)>,
}

impl DataRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field. A later field with the same column name replaces the earlier value.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some(field) => field.1 = value,
            None => self.fields.push((column, value)),
        }
    }

    /// Builder-style variant of [`DataRow::push`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(column, value);
        self
    }

    /// Look up the value of a column, if the row has it.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Value of the first column in source order.
    pub fn first_value(&self) -> Option<&str> {
        self.fields.first().map(|(_, value)| value.as_str())
    }

    /// Column names in source order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DataRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = DataRow::new();
        for (column, value) in iter {
            row.push(column, value);
        }
        row
    }
}

/// Assignment of each placeholder key to a data column, or `None` when unmapped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    entries: BTreeMap<PlaceholderKey, Option<String>>,
}

impl ColumnMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite one entry. The column name is not checked against the data source.
    pub fn set(&mut self, key: impl Into<PlaceholderKey>, column: Option<String>) {
        self.entries.insert(key.into(), column);
    }

    /// Map a key to a column.
    pub fn assign(&mut self, key: impl Into<PlaceholderKey>, column: impl Into<String>) {
        self.set(key, Some(column.into()));
    }

    /// Mark a key as explicitly unmapped.
    pub fn clear(&mut self, key: impl Into<PlaceholderKey>) {
        self.set(key, None);
    }

    /// Column assigned to `key`, if any.
    pub fn column_for(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(|column| column.as_deref())
    }

    /// Whether the mapping has an entry (mapped or not) for `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys that currently have no column.
    pub fn unmapped_keys(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, column)| column.is_none())
            .map(|(key, _)| key.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(key, column)| (key.as_str(), column.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Progress of a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingStats {
    /// Number of rows in the batch.
    pub total: usize,

    /// Rows fully produced so far.
    pub completed: usize,

    /// A batch is currently running.
    pub in_progress: bool,

    /// The last batch ran to completion.
    pub complete: bool,
}

impl ProcessingStats {
    /// Reset for a new run over `total` rows.
    pub fn start(&mut self, total: usize) {
        *self = Self {
            total,
            completed: 0,
            in_progress: true,
            complete: false,
        };
    }

    /// Record one completed row. Never exceeds `total`.
    pub fn record_row(&mut self) {
        self.completed = (self.completed + 1).min(self.total);
    }

    /// Mark the run as finished successfully.
    pub fn finish(&mut self) {
        self.in_progress = false;
        self.complete = true;
    }

    /// Mark the run as aborted.
    pub fn abort(&mut self) {
        self.in_progress = false;
        self.complete = false;
    }
}

/// A fully substituted document package for one data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArchive {
    /// Deterministic file name derived from the row index and first column value.
    pub file_name: String,

    /// Serialized package bytes.
    pub bytes: Vec<u8>,
}

impl OutputArchive {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}
