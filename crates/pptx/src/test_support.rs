//! In-memory PPTX fixtures for tests.

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Bytes of a tiny fake PNG, deliberately not valid UTF-8.
pub const IMAGE_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0xFF, 0x00];

/// Layout part carrying a token that must never be substituted.
pub const LAYOUT_XML: &str = r#"<p:sldLayout xmlns:p="p" xmlns:a="a"><a:t>{{NAME}}</a:t></p:sldLayout>"#;

/// Minimal slide XML with one text run.
pub fn slide_xml(text: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:sp><p:txBody><a:p><a:r><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#,
        text
    )
}

/// Build a package whose presentation order matches slide numbering.
pub fn build_package<S: AsRef<str>>(slides: &[S]) -> Vec<u8> {
    let order: Vec<usize> = (1..=slides.len()).collect();
    build_package_with_order(slides, &order)
}

/// Build a package. `order` lists 1-based slide numbers in presentation order.
pub fn build_package_with_order<S: AsRef<str>>(slides: &[S], order: &[usize]) -> Vec<u8> {
    let mut parts: Vec<(String, Vec<u8>)> = Vec::new();

    parts.push((
        "[Content_Types].xml".to_string(),
        br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#.to_vec(),
    ));

    let sld_ids: String = order
        .iter()
        .enumerate()
        .map(|(i, n)| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, n + 1))
        .collect();
    parts.push((
        "ppt/presentation.xml".to_string(),
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><p:sldIdLst>{}</p:sldIdLst></p:presentation>"#,
            sld_ids
        )
        .into_bytes(),
    ));

    let rels: String = (1..=slides.len())
        .map(|n| {
            format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{}.xml"/>"#,
                n + 1,
                n
            )
        })
        .collect();
    parts.push((
        "ppt/_rels/presentation.xml.rels".to_string(),
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>{}</Relationships>"#,
            rels
        )
        .into_bytes(),
    ));

    for (i, slide) in slides.iter().enumerate() {
        parts.push((
            format!("ppt/slides/slide{}.xml", i + 1),
            slide.as_ref().as_bytes().to_vec(),
        ));
    }

    parts.push((
        "ppt/slideLayouts/slideLayout1.xml".to_string(),
        LAYOUT_XML.as_bytes().to_vec(),
    ));
    parts.push(("ppt/media/image1.png".to_string(), IMAGE_BYTES.to_vec()));

    zip_bytes(&parts)
}

/// Write named parts into a ZIP byte stream.
pub fn zip_bytes(parts: &[(String, Vec<u8>)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for (name, bytes) in parts {
        let method = if name.ends_with(".png") {
            CompressionMethod::Stored
        } else {
            CompressionMethod::Deflated
        };
        let options = FileOptions::default().compression_method(method);
        writer.start_file(name.clone(), options).unwrap();
        writer.write_all(bytes).unwrap();
    }

    writer.finish().unwrap().into_inner()
}
