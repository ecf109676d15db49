//! A single template + data merge request.
//!
//! The session owns everything a run needs: the untouched template bytes,
//! the parsed data, the editable mapping, and progress for the latest run.

use crate::aggregate::aggregate;
use crate::generator::BatchGenerator;
use crate::scanner::scan_template;
use slidemerge_core::{
    auto_map, ColumnMapping, DataTable, PlaceholderKey, ProcessingStats, Result,
};
use std::collections::BTreeSet;

/// Template, data, and mapping for one merge.
#[derive(Debug, Clone)]
pub struct MergeSession {
    template: Vec<u8>,
    table: DataTable,
    placeholders: BTreeSet<PlaceholderKey>,
    mapping: ColumnMapping,
    stats: ProcessingStats,
    generator: BatchGenerator,
}

impl MergeSession {
    /// Scan the template and propose a mapping against the data columns.
    pub fn new(template: Vec<u8>, table: DataTable) -> Self {
        let placeholders = scan_template(&template);
        let mapping = auto_map(&placeholders, table.columns());

        Self {
            template,
            table,
            placeholders,
            mapping,
            stats: ProcessingStats::default(),
            generator: BatchGenerator::new(),
        }
    }

    /// Use a custom generator configuration.
    pub fn with_generator(mut self, generator: BatchGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Placeholder keys found on the primary slide.
    pub fn placeholders(&self) -> &BTreeSet<PlaceholderKey> {
        &self.placeholders
    }

    /// Column names of the data source.
    pub fn columns(&self) -> &[String] {
        self.table.columns()
    }

    pub fn table(&self) -> &DataTable {
        &self.table
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    /// Override one mapping entry. `None` marks the key unmapped.
    pub fn set_mapping(&mut self, key: impl Into<PlaceholderKey>, column: Option<String>) {
        self.mapping.set(key, column);
    }

    /// Progress of the latest run.
    pub fn stats(&self) -> ProcessingStats {
        self.stats
    }

    /// Generate every row and bundle the results.
    ///
    /// `on_progress` sees the stats after each completed row. On failure no
    /// output is returned and the stats are left neither running nor complete.
    pub fn run<F>(&mut self, mut on_progress: F) -> Result<Vec<u8>>
    where
        F: FnMut(&ProcessingStats),
    {
        let Self {
            template,
            table,
            mapping,
            stats,
            generator,
            ..
        } = self;

        if let Err(e) = table.ensure_not_empty() {
            stats.abort();
            return Err(e);
        }

        stats.start(table.len());

        let result = generator
            .generate(template, table.rows(), mapping, |_, _| {
                stats.record_row();
                on_progress(stats);
            })
            .and_then(|outputs| aggregate(&outputs));

        match result {
            Ok(bundle) => {
                stats.finish();
                Ok(bundle)
            }
            Err(e) => {
                stats.abort();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::TemplateArchive;
    use crate::test_support::{build_package, slide_xml};
    use slidemerge_core::Error;

    fn table(text: &str) -> DataTable {
        DataTable::from_str_with_delimiter(text, b',').unwrap()
    }

    #[test]
    fn test_session_auto_maps_on_creation() {
        let template = build_package(&[slide_xml("{{NAME}} {{CITY}} {{EMAIL}}")]);
        let session = MergeSession::new(template, table("Name,City,Age\nAna,Rio,30\n"));

        assert_eq!(session.placeholders().len(), 3);
        assert_eq!(session.mapping().column_for("NAME"), Some("Name"));
        assert_eq!(session.mapping().column_for("CITY"), Some("City"));
        assert_eq!(session.mapping().unmapped_keys(), vec!["EMAIL"]);
        assert_eq!(session.stats(), ProcessingStats::default());
    }

    #[test]
    fn test_session_run_bundles_every_row() {
        let template = build_package(&[slide_xml("{{NAME}}")]);
        let mut session = MergeSession::new(template, table("Name\nAna\nBob\nCy\n"));

        let mut seen = Vec::new();
        let bundle = session.run(|stats| seen.push(stats.completed)).unwrap();

        assert_eq!(seen, vec![1, 2, 3]);
        let stats = session.stats();
        assert_eq!(stats.completed, 3);
        assert!(stats.complete);
        assert!(!stats.in_progress);

        let outer = TemplateArchive::open(&bundle).unwrap();
        assert_eq!(
            outer.part_names().collect::<Vec<_>>(),
            vec!["1_Ana.pptx", "2_Bob.pptx", "3_Cy.pptx"]
        );

        let inner = TemplateArchive::open(outer.read_bytes("2_Bob.pptx").unwrap()).unwrap();
        assert!(inner.read_text("ppt/slides/slide1.xml").unwrap().contains(">Bob<"));
    }

    #[test]
    fn test_session_manual_override() {
        let template = build_package(&[slide_xml("{{WHO}}")]);
        let mut session = MergeSession::new(template, table("Name,Nick\nAna,Annie\n"));
        assert_eq!(session.mapping().column_for("WHO"), None);

        session.set_mapping("WHO", Some("Nick".to_string()));
        let bundle = session.run(|_| {}).unwrap();

        let outer = TemplateArchive::open(&bundle).unwrap();
        let inner = TemplateArchive::open(outer.read_bytes("1_Ana.pptx").unwrap()).unwrap();
        assert!(inner.read_text("ppt/slides/slide1.xml").unwrap().contains(">Annie<"));
    }

    #[test]
    fn test_session_custom_generator() {
        let template = build_package(&[slide_xml("{{NAME}}")]);
        let generator = BatchGenerator::new()
            .with_fallback_name("deck")
            .with_extension("potx");
        let mut session =
            MergeSession::new(template, table("Name,City\n,Rio\n")).with_generator(generator);

        let bundle = session.run(|_| {}).unwrap();
        let outer = TemplateArchive::open(&bundle).unwrap();
        assert_eq!(outer.part_names().collect::<Vec<_>>(), vec!["1_deck.potx"]);
    }

    #[test]
    fn test_session_empty_data_fails() {
        let template = build_package(&[slide_xml("{{NAME}}")]);
        let mut session = MergeSession::new(template, table("Name\n"));

        let err = session.run(|_| {}).unwrap_err();
        assert!(matches!(err, Error::EmptyDataSource));
        assert!(!session.stats().complete);
    }

    #[test]
    fn test_session_corrupt_template_scans_empty_then_fails() {
        let mut session = MergeSession::new(b"not a package".to_vec(), table("Name\nAna\n"));
        assert!(session.placeholders().is_empty());

        let err = session.run(|_| {}).unwrap_err();
        assert!(matches!(err, Error::CorruptArchive(_)));
        let stats = session.stats();
        assert!(!stats.in_progress);
        assert!(!stats.complete);
    }
}
