//! Placeholder tokenization and substitution.
//!
//! Tokens look like `{{KEY}}`. The key is everything between the braces
//! (matched non-greedily) with surrounding whitespace trimmed. Discovery
//! and substitution share the same regex so a key found at scan time
//! always substitutes identically at generation time.

use crate::types::{ColumnMapping, DataRow, PlaceholderKey};
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Regex matching a single `{{ ... }}` token.
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(.*?)\}\}").unwrap());

/// Extract the set of unique placeholder keys in `text`.
pub fn extract_keys_from_text(text: &str) -> BTreeSet<PlaceholderKey> {
    PLACEHOLDER_REGEX
        .captures_iter(text)
        .map(|caps| caps[1].trim().to_string())
        .collect()
}

/// Replace every placeholder in `text` with the mapped value from `row`.
///
/// Tokens whose key is unmapped, or whose mapped column is absent from the
/// row, are left verbatim. Substituted values are markup-escaped.
pub fn substitute_placeholders<'a>(
    text: &'a str,
    mapping: &ColumnMapping,
    row: &DataRow,
) -> Cow<'a, str> {
    PLACEHOLDER_REGEX.replace_all(text, |caps: &Captures| {
        let key = caps[1].trim();
        match mapping.column_for(key).and_then(|column| row.get(column)) {
            Some(value) => escape_markup(value),
            None => caps[0].to_string(),
        }
    })
}

/// Escape the five markup-sensitive characters.
///
/// `&` goes first so entities introduced by later replacements are not
/// escaped twice.
pub fn escape_markup(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
