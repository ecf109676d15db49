//! Batch substitution engine.
//!
//! Produces one PPTX per data row. Rows run strictly in order and every
//! row decodes its own copy of the template bytes, so no substituted
//! state can leak from one row into the next.

use crate::archive::TemplateArchive;
use slidemerge_core::{
    substitute_placeholders, ColumnMapping, DataRow, Error, OutputArchive, Result,
};
use std::borrow::Cow;

/// Longest sanitized excerpt of the first column kept in a file name.
const MAX_NAME_EXCERPT: usize = 50;

/// Generator for per-row documents.
#[derive(Debug, Clone)]
pub struct BatchGenerator {
    /// File stem used when a row's first value is empty.
    fallback_name: String,

    /// Extension of each generated file.
    extension: String,
}

impl Default for BatchGenerator {
    fn default() -> Self {
        Self {
            fallback_name: "presentation".to_string(),
            extension: "pptx".to_string(),
        }
    }
}

impl BatchGenerator {
    /// Create a generator with default naming.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the file stem used for rows without a usable first value.
    pub fn with_fallback_name(mut self, name: impl Into<String>) -> Self {
        self.fallback_name = name.into();
        self
    }

    /// Set the extension of generated files (without the dot).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    /// Generate one archive per row.
    ///
    /// `on_progress(done, total)` fires once per row, in order, after that
    /// row's archive is fully serialized. Any failure aborts the whole batch
    /// and discards rows already produced.
    pub fn generate<F>(
        &self,
        template: &[u8],
        rows: &[DataRow],
        mapping: &ColumnMapping,
        mut on_progress: F,
    ) -> Result<Vec<OutputArchive>>
    where
        F: FnMut(usize, usize),
    {
        if rows.is_empty() {
            return Err(Error::EmptyDataSource);
        }

        let total = rows.len();
        log::info!("Generating {} documents", total);

        let mut outputs = Vec::with_capacity(total);
        for (idx, row) in rows.iter().enumerate() {
            let bytes = self.render_row(template, row, mapping).map_err(|e| {
                log::error!("Row {} failed, aborting batch: {}", idx + 1, e);
                e
            })?;

            outputs.push(OutputArchive::new(self.output_file_name(idx, row), bytes));
            on_progress(idx + 1, total);
        }

        log::info!("Generated {} documents", outputs.len());
        Ok(outputs)
    }

    /// Substitute one row into a fresh decode of `template`.
    pub fn render_row(
        &self,
        template: &[u8],
        row: &DataRow,
        mapping: &ColumnMapping,
    ) -> Result<Vec<u8>> {
        let mut archive = TemplateArchive::open(template)?;

        for path in archive.slide_parts() {
            let content = archive.read_text(&path)?;

            if let Cow::Owned(replaced) = substitute_placeholders(&content, mapping, row) {
                log::debug!("Rewrote placeholders in {}", path);
                archive.write_text(&path, replaced);
            }
        }

        archive.serialize()
    }

    /// File name for the row at 0-based `index`.
    ///
    /// The 1-based row prefix keeps names unique, so rows sharing a first
    /// value (two "John Doe" rows) still produce separate bundle entries.
    pub fn output_file_name(&self, index: usize, row: &DataRow) -> String {
        let stem = row
            .first_value()
            .map(sanitize_name)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.fallback_name.clone());

        format!("{}_{}.{}", index + 1, stem, self.extension)
    }
}

/// Replace every non-alphanumeric character with `_`, keeping a bounded excerpt.
fn sanitize_name(value: &str) -> String {
    value
        .chars()
        .take(MAX_NAME_EXCERPT)
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
