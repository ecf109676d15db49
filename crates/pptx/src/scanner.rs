//! Placeholder discovery in slide XML.
//!
//! Scanning is permissive: a missing primary slide or an unreadable
//! package yields an empty key set instead of an error, so templates
//! without placeholders can still be processed.

use crate::archive::TemplateArchive;
use crate::slides::primary_slide_path;
use slidemerge_core::{extract_keys_from_text, PlaceholderKey};
use std::collections::BTreeSet;

/// Placeholder keys of the primary (first) slide.
pub fn extract_keys(archive: &TemplateArchive) -> BTreeSet<PlaceholderKey> {
    let path = primary_slide_path(archive);

    match archive.read_text(&path) {
        Ok(content) => {
            let keys = extract_keys_from_text(&content);
            log::debug!("Found {} placeholders in {}", keys.len(), path);
            keys
        }
        Err(e) => {
            log::warn!("Primary slide unavailable, assuming no placeholders: {}", e);
            BTreeSet::new()
        }
    }
}

/// Placeholder keys across every slide text part.
pub fn extract_all_keys(archive: &TemplateArchive) -> BTreeSet<PlaceholderKey> {
    let mut keys = BTreeSet::new();

    for path in archive.slide_parts() {
        match archive.read_text(&path) {
            Ok(content) => keys.extend(extract_keys_from_text(&content)),
            Err(e) => log::warn!("Skipping {}: {}", path, e),
        }
    }

    keys
}

/// Decode `template` and scan its primary slide.
///
/// An undecodable template is reported as having no placeholders; the
/// failure resurfaces as a hard error when generation decodes it again.
pub fn scan_template(template: &[u8]) -> BTreeSet<PlaceholderKey> {
    match TemplateArchive::open(template) {
        Ok(archive) => extract_keys(&archive),
        Err(e) => {
            log::warn!("Template could not be scanned: {}", e);
            BTreeSet::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{build_package, build_package_with_order, slide_xml, zip_bytes};

    fn keys(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_scan_primary_slide_only() {
        let slides = [slide_xml("{{NAME}} from {{ CITY }}"), slide_xml("{{EMAIL}}")];
        let bytes = build_package(&slides);

        assert_eq!(scan_template(&bytes), keys(&["NAME", "CITY"]));

        let archive = TemplateArchive::open(&bytes).unwrap();
        assert_eq!(extract_all_keys(&archive), keys(&["NAME", "CITY", "EMAIL"]));
    }

    #[test]
    fn test_scan_uses_presentation_order() {
        let slides = [slide_xml("{{SECOND}}"), slide_xml("{{FIRST}}")];
        let bytes = build_package_with_order(&slides, &[2, 1]);
        assert_eq!(scan_template(&bytes), keys(&["FIRST"]));
    }

    #[test]
    fn test_scan_is_idempotent() {
        let bytes = build_package(&[slide_xml("{{A}}{{B}}{{A}}")]);
        assert_eq!(scan_template(&bytes), scan_template(&bytes));
    }

    #[test]
    fn test_scan_missing_primary_slide_is_empty() {
        let bytes = zip_bytes(&[("docProps/app.xml".to_string(), b"<Properties/>".to_vec())]);
        assert!(scan_template(&bytes).is_empty());
    }

    #[test]
    fn test_scan_corrupt_template_is_empty() {
        assert!(scan_template(b"not a zip at all").is_empty());
    }
}
