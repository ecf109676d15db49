//! In-memory PPTX package codec.
//!
//! A package is decoded once into a list of named parts. Text parts can be
//! read and replaced; the whole package is then re-serialized to bytes.
//! Decoding never touches the source buffer, so every row can start from
//! a pristine decode of the same template bytes.

use slidemerge_core::{Error, Result};
use std::io::{Cursor, Read, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Path prefix shared by all slide text parts.
pub const SLIDE_PART_PREFIX: &str = "ppt/slides/slide";

/// Path suffix shared by all slide text parts.
pub const SLIDE_PART_SUFFIX: &str = ".xml";

/// Content of a single part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartContent {
    /// Raw bytes as read from the package.
    Bytes(Vec<u8>),
    /// Decoded text written back by the caller.
    Text(String),
}

impl PartContent {
    fn as_bytes(&self) -> &[u8] {
        match self {
            PartContent::Bytes(bytes) => bytes,
            PartContent::Text(text) => text.as_bytes(),
        }
    }
}

#[derive(Debug, Clone)]
struct Part {
    name: String,
    content: PartContent,
    compression: CompressionMethod,
    is_dir: bool,
}

/// A decoded document package.
#[derive(Debug, Clone, Default)]
pub struct TemplateArchive {
    parts: Vec<Part>,
}

impl TemplateArchive {
    /// Decode a package from bytes.
    pub fn open(bytes: &[u8]) -> Result<Self> {
        let mut zip = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| Error::CorruptArchive(format!("Failed to open ZIP: {}", e)))?;

        let mut parts = Vec::with_capacity(zip.len());
        for i in 0..zip.len() {
            let mut file = zip
                .by_index(i)
                .map_err(|e| Error::CorruptArchive(format!("Failed to read entry {}: {}", i, e)))?;

            let name = file.name().to_string();
            let is_dir = file.is_dir();
            let compression = match file.compression() {
                CompressionMethod::Stored => CompressionMethod::Stored,
                _ => CompressionMethod::Deflated,
            };

            let mut data = Vec::new();
            if !is_dir {
                file.read_to_end(&mut data).map_err(|e| {
                    Error::CorruptArchive(format!("Failed to read '{}': {}", name, e))
                })?;
            }

            parts.push(Part {
                name,
                content: PartContent::Bytes(data),
                compression,
                is_dir,
            });
        }

        log::debug!("Decoded package with {} parts", parts.len());

        Ok(Self { parts })
    }

    /// Names of all parts in package order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    /// Raw content of a part.
    pub fn read_bytes(&self, path: &str) -> Result<&[u8]> {
        self.find(path)
            .map(|p| p.content.as_bytes())
            .ok_or_else(|| Error::MissingPart(path.to_string()))
    }

    /// Content of a part decoded as UTF-8 text.
    pub fn read_text(&self, path: &str) -> Result<String> {
        let part = self
            .find(path)
            .ok_or_else(|| Error::MissingPart(path.to_string()))?;

        match &part.content {
            PartContent::Text(text) => Ok(text.clone()),
            PartContent::Bytes(bytes) => String::from_utf8(bytes.clone())
                .map_err(|_| Error::InvalidText(path.to_string())),
        }
    }

    /// Replace a part's content, or append a new deflated part if absent.
    pub fn write_text(&mut self, path: &str, content: impl Into<String>) {
        let content = PartContent::Text(content.into());
        match self.parts.iter_mut().find(|p| !p.is_dir && p.name == path) {
            Some(part) => part.content = content,
            None => self.parts.push(Part {
                name: path.to_string(),
                content,
                compression: CompressionMethod::Deflated,
                is_dir: false,
            }),
        }
    }

    /// Slide text parts (`ppt/slides/slideN.xml`), ordered by slide number.
    pub fn slide_parts(&self) -> Vec<String> {
        let mut slides: Vec<&str> = self
            .parts
            .iter()
            .filter(|p| !p.is_dir && is_slide_part(&p.name))
            .map(|p| p.name.as_str())
            .collect();

        slides.sort_by(|a, b| match (slide_number(a), slide_number(b)) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.cmp(b),
        });

        slides.into_iter().map(str::to_string).collect()
    }

    /// Encode the package back to bytes, keeping part order and compression.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for part in &self.parts {
            let options = FileOptions::default().compression_method(part.compression);

            if part.is_dir {
                writer
                    .add_directory(part.name.clone(), options)
                    .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", part.name, e)))?;
                continue;
            }

            writer
                .start_file(part.name.clone(), options)
                .map_err(|e| Error::ZipError(format!("Failed to start '{}': {}", part.name, e)))?;
            writer.write_all(part.content.as_bytes())?;
        }

        let cursor = writer
            .finish()
            .map_err(|e| Error::ZipError(format!("Failed to finalize ZIP: {}", e)))?;

        Ok(cursor.into_inner())
    }

    fn find(&self, path: &str) -> Option<&Part> {
        self.parts.iter().find(|p| !p.is_dir && p.name == path)
    }
}

/// Whether `path` names a slide text part.
pub fn is_slide_part(path: &str) -> bool {
    path.starts_with(SLIDE_PART_PREFIX) && path.ends_with(SLIDE_PART_SUFFIX)
}

/// Extract the slide number from a string like "rId2" or "ppt/slides/slide3.xml".
pub(crate) fn slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".rels").trim_end_matches(".xml");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}
