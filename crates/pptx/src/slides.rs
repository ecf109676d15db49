//! Presentation slide order.
//!
//! The real order lives in `ppt/presentation.xml` (`p:sldIdLst`), whose
//! entries point at relationship ids resolved through
//! `ppt/_rels/presentation.xml.rels`.

use crate::archive::{slide_number, TemplateArchive};
use quick_xml::events::Event;
use quick_xml::Reader;
use slidemerge_core::{Error, Result};
use std::collections::HashMap;

const PRESENTATION_PATH: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PATH: &str = "ppt/_rels/presentation.xml.rels";

/// Part used when the package does not declare its slide order.
pub const DEFAULT_PRIMARY_SLIDE: &str = "ppt/slides/slide1.xml";

/// Get the ordered list of slide part paths declared by the presentation.
///
/// Falls back to numeric part order when `presentation.xml` has no slide list.
pub fn slide_order(archive: &TemplateArchive) -> Result<Vec<String>> {
    let rels = slide_relationships(archive)?;

    let ids = match archive.read_text(PRESENTATION_PATH) {
        Ok(content) => slide_id_list(&content)?,
        Err(Error::MissingPart(_)) => Vec::new(),
        Err(e) => return Err(e),
    };

    if ids.is_empty() {
        let mut targets: Vec<String> = rels.into_values().collect();
        targets.sort_by_key(|t| slide_number(t).unwrap_or(usize::MAX));
        return Ok(targets);
    }

    Ok(ids.iter().filter_map(|id| rels.get(id).cloned()).collect())
}

/// Resolve the primary slide: the first slide in presentation order, or
/// [`DEFAULT_PRIMARY_SLIDE`] when the order cannot be read.
pub fn primary_slide_path(archive: &TemplateArchive) -> String {
    match slide_order(archive) {
        Ok(order) => order
            .into_iter()
            .next()
            .unwrap_or_else(|| DEFAULT_PRIMARY_SLIDE.to_string()),
        Err(e) => {
            log::debug!("Slide order unavailable ({}), using {}", e, DEFAULT_PRIMARY_SLIDE);
            DEFAULT_PRIMARY_SLIDE.to_string()
        }
    }
}

/// Map of relationship id to slide part path.
fn slide_relationships(archive: &TemplateArchive) -> Result<HashMap<String, String>> {
    let content = archive.read_text(PRESENTATION_RELS_PATH)?;
    let mut slides = HashMap::new();

    let mut reader = Reader::from_str(&content);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let mut rel_type = String::new();
                let mut target = String::new();
                let mut id = String::new();

                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).to_string();
                    match attr.key.as_ref() {
                        b"Type" => rel_type = value,
                        b"Target" => target = value,
                        b"Id" => id = value,
                        _ => {}
                    }
                }

                if rel_type.ends_with("/slide") {
                    slides.insert(id, resolve_target(&target));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(slides)
}

/// Relationship ids of `p:sldId` entries, in document order.
fn slide_id_list(content: &str) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldId" =>
            {
                let rel_id = e
                    .attributes()
                    .flatten()
                    .find(|attr| {
                        // `r:id`, not the numeric `id`
                        local_name(attr.key.as_ref()) == b"id" && attr.key.as_ref() != b"id"
                    })
                    .map(|attr| String::from_utf8_lossy(&attr.value).to_string());

                if let Some(rel_id) = rel_id {
                    ids.push(rel_id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing presentation: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(ids)
}

/// Turn a relationship target into a package part path.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("ppt/{}", target.trim_start_matches("./")),
    }
}

/// Extract the local name from a potentially namespaced XML name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}
