//! WASM-compatible wrapper for templated slide generation.
//!
//! This crate exposes placeholder scanning, automatic mapping, and batch
//! generation to JavaScript for use in browsers and workers.

use serde::{Deserialize, Serialize};
use slidemerge_core::{ColumnMapping, DataTable};
use slidemerge_pptx::{scan_template, MergeSession};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Result of inspecting a template against a data source.
#[derive(Debug, Serialize, Deserialize)]
pub struct InspectionResult {
    /// Placeholder keys found on the first slide.
    pub placeholders: Vec<String>,
    /// Column names of the data source, in header order.
    pub columns: Vec<String>,
    /// Number of data rows.
    pub row_count: usize,
    /// Proposed mapping; `null` marks an unmapped key.
    pub mapping: ColumnMapping,
}

/// List the placeholders on the first slide of a template.
///
/// Never throws: an unreadable template yields an empty list.
#[wasm_bindgen]
pub fn scan_placeholders(template: &[u8]) -> Result<JsValue, JsValue> {
    let keys: Vec<String> = scan_template(template).into_iter().collect();

    serde_wasm_bindgen::to_value(&keys)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Scan a template, parse CSV text, and propose a mapping.
#[wasm_bindgen]
pub fn inspect(template: &[u8], csv_text: &str) -> Result<JsValue, JsValue> {
    let result = inspect_impl(template, csv_text).map_err(|e| JsValue::from_str(&e))?;

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn inspect_impl(template: &[u8], csv_text: &str) -> Result<InspectionResult, String> {
    let table = parse_table(csv_text)?;
    let session = MergeSession::new(template.to_vec(), table);

    Ok(InspectionResult {
        placeholders: session.placeholders().iter().cloned().collect(),
        columns: session.columns().to_vec(),
        row_count: session.table().len(),
        mapping: session.mapping().clone(),
    })
}

/// Generate one presentation per CSV row and return the ZIP bundle.
///
/// # Arguments
/// * `template` - The raw bytes of the PPTX template
/// * `csv_text` - The data source, first line is the header
/// * `mapping` - Object of placeholder key to column name (or `null`);
///   `undefined` uses the automatic mapping
/// * `on_progress` - Called as `(done, total)` after each row; if it throws,
///   the whole batch fails
#[wasm_bindgen]
pub fn generate(
    template: &[u8],
    csv_text: &str,
    mapping: JsValue,
    on_progress: &js_sys::Function,
) -> Result<Vec<u8>, JsValue> {
    let overrides: Option<ColumnMapping> = if mapping.is_undefined() || mapping.is_null() {
        None
    } else {
        Some(
            serde_wasm_bindgen::from_value(mapping)
                .map_err(|e| JsValue::from_str(&format!("Invalid mapping: {}", e)))?,
        )
    };

    generate_impl(template, csv_text, overrides.as_ref(), |done, total| {
        on_progress
            .call2(
                &JsValue::NULL,
                &JsValue::from(done as u32),
                &JsValue::from(total as u32),
            )
            .map(|_| ())
            .map_err(|e| e.as_string().unwrap_or_else(|| format!("{:?}", e)))
    })
    .map_err(|e| JsValue::from_str(&e))
}

fn generate_impl<F>(
    template: &[u8],
    csv_text: &str,
    overrides: Option<&ColumnMapping>,
    mut on_progress: F,
) -> Result<Vec<u8>, String>
where
    F: FnMut(usize, usize) -> Result<(), String>,
{
    let table = parse_table(csv_text)?;
    let mut session = MergeSession::new(template.to_vec(), table);

    if let Some(overrides) = overrides {
        for (key, column) in overrides.iter() {
            session.set_mapping(key, column.map(str::to_string));
        }
    }

    // The first callback failure is kept and fails the batch once it returns.
    let mut callback_error: Option<String> = None;
    let bundle = session
        .run(|stats| {
            if callback_error.is_none() {
                if let Err(e) = on_progress(stats.completed, stats.total) {
                    callback_error = Some(e);
                }
            }
        })
        .map_err(|e| format!("Generation failed: {}", e))?;

    match callback_error {
        Some(e) => Err(format!("Generation failed: progress callback error: {}", e)),
        None => Ok(bundle),
    }
}

fn parse_table(csv_text: &str) -> Result<DataTable, String> {
    let table = DataTable::from_str_with_delimiter(csv_text, b',')
        .map_err(|e| format!("Data parsing error: {}", e))?;

    if table.is_empty() {
        return Err("Data source contains no rows".to_string());
    }
    Ok(table)
}
