//! Tabular data source loading.
//!
//! The first record is the header row. Header names are trimmed, blank
//! records are skipped, and ragged records are accepted: a short record
//! simply lacks its trailing columns.

use crate::error::{Error, Result};
use crate::types::DataRow;
use std::io::Read;

/// Rows of named string fields plus the ordered column list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTable {
    columns: Vec<String>,
    rows: Vec<DataRow>,
}

impl DataTable {
    /// Parse delimited text from a reader.
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| Error::MalformedData(format!("Failed to read header row: {}", e)))?
            .iter()
            .map(|name| name.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record = record.map_err(|e| {
                Error::MalformedData(format!("Failed to read record {}: {}", idx + 1, e))
            })?;

            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }

            let row: DataRow = columns
                .iter()
                .zip(record.iter())
                .map(|(column, value)| (column.as_str(), value))
                .collect();
            rows.push(row);
        }

        log::debug!("Parsed {} columns, {} rows", columns.len(), rows.len());

        Ok(Self { columns, rows })
    }

    /// Parse delimited text from a string.
    pub fn from_str_with_delimiter(text: &str, delimiter: u8) -> Result<Self> {
        Self::from_reader(text.as_bytes(), delimiter)
    }

    /// Column names in header order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Data rows in source order.
    pub fn rows(&self) -> &[DataRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Fail with [`Error::EmptyDataSource`] when there are no rows.
    pub fn ensure_not_empty(&self) -> Result<()> {
        if self.rows.is_empty() {
            return Err(Error::EmptyDataSource);
        }
        Ok(())
    }
}
