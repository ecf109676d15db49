//! Default placeholder-to-column assignment.

use crate::types::{ColumnMapping, PlaceholderKey};

/// Compare two names for mapping purposes: trimmed, case-insensitive, exact.
fn names_match(key: &str, column: &str) -> bool {
    key.trim().to_lowercase() == column.trim().to_lowercase()
}

/// Propose a mapping for `keys` against the ordered `columns`.
///
/// Each key is assigned the first column whose trimmed name equals the
/// trimmed key ignoring case, or left unmapped. No partial matching.
pub fn auto_map<'a, K, C>(keys: K, columns: &[C]) -> ColumnMapping
where
    K: IntoIterator<Item = &'a PlaceholderKey>,
    C: AsRef<str>,
{
    let mut mapping = ColumnMapping::new();

    for key in keys {
        let column = columns
            .iter()
            .map(AsRef::<str>::as_ref)
            .find(|column| names_match(key, column))
            .map(str::to_string);

        if column.is_none() {
            log::debug!("No column matches placeholder '{}'", key);
        }
        mapping.set(key.clone(), column);
    }

    mapping
}
