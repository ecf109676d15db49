//! Bundle generated documents into one outer ZIP.

use slidemerge_core::{Error, OutputArchive, Result};
use std::collections::HashMap;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Package every output under its file name into a single archive.
///
/// Entries sharing a name collapse into one: the last archive's bytes win,
/// at the position where the name first appeared.
pub fn aggregate(outputs: &[OutputArchive]) -> Result<Vec<u8>> {
    let mut entries: Vec<(&str, &[u8])> = Vec::with_capacity(outputs.len());
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for output in outputs {
        let name = output.file_name.as_str();
        match positions.get(name) {
            Some(&pos) => {
                log::warn!("Duplicate output name '{}', keeping the later document", name);
                entries[pos].1 = output.bytes.as_slice();
            }
            None => {
                positions.insert(name, entries.len());
                entries.push((name, output.bytes.as_slice()));
            }
        }
    }

    // Inner packages are already compressed.
    let options = FileOptions::default().compression_method(CompressionMethod::Stored);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for (name, bytes) in entries {
        writer
            .start_file(name, options)
            .map_err(|e| Error::ZipError(format!("Failed to start '{}': {}", name, e)))?;
        writer.write_all(bytes)?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| Error::ZipError(format!("Failed to finalize ZIP: {}", e)))?;

    log::info!("Bundled {} documents", positions.len());
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::TemplateArchive;

    #[test]
    fn test_aggregate_keeps_order_and_bytes() {
        let outputs = vec![
            OutputArchive::new("1_Ana.pptx", b"first".to_vec()),
            OutputArchive::new("2_Bob.pptx", b"second".to_vec()),
        ];

        let bundle = aggregate(&outputs).unwrap();
        let archive = TemplateArchive::open(&bundle).unwrap();

        assert_eq!(
            archive.part_names().collect::<Vec<_>>(),
            vec!["1_Ana.pptx", "2_Bob.pptx"]
        );
        assert_eq!(archive.read_bytes("2_Bob.pptx").unwrap(), b"second");
    }

    #[test]
    fn test_aggregate_name_collision_last_wins() {
        let outputs = vec![
            OutputArchive::new("John_Doe.pptx", b"row one".to_vec()),
            OutputArchive::new("Jane.pptx", b"row two".to_vec()),
            OutputArchive::new("John_Doe.pptx", b"row three".to_vec()),
        ];

        let bundle = aggregate(&outputs).unwrap();
        let archive = TemplateArchive::open(&bundle).unwrap();

        assert_eq!(
            archive.part_names().collect::<Vec<_>>(),
            vec!["John_Doe.pptx", "Jane.pptx"]
        );
        assert_eq!(archive.read_bytes("John_Doe.pptx").unwrap(), b"row three");
    }

    #[test]
    fn test_aggregate_empty() {
        let bundle = aggregate(&[]).unwrap();
        let archive = TemplateArchive::open(&bundle).unwrap();
        assert_eq!(archive.part_names().count(), 0);
    }
}
