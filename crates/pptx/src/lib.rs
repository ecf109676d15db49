//! PPTX (Office Open XML) backend for templated slide generation.
//!
//! Decodes .pptx packages (ZIP archives of XML parts), substitutes
//! placeholders per data row, and bundles the results.

pub mod aggregate;
pub mod archive;
pub mod generator;
pub mod scanner;
pub mod session;
pub mod slides;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregate::aggregate;
pub use archive::TemplateArchive;
pub use generator::BatchGenerator;
pub use scanner::{extract_all_keys, extract_keys, scan_template};
pub use session::MergeSession;
