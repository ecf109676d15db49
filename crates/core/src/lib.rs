//! Core domain types, placeholder tokenization, and column mapping
//! for templated slide generation.

pub mod data;
pub mod error;
pub mod mapping;
pub mod placeholder;
pub mod types;

pub use data::DataTable;
pub use error::{Error, Result};
pub use mapping::auto_map;
pub use placeholder::{escape_markup, extract_keys_from_text, substitute_placeholders};
pub use types::{ColumnMapping, DataRow, OutputArchive, PlaceholderKey, ProcessingStats};
