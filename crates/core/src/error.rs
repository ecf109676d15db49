//! Error types for templated slide generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while scanning, mapping, or generating documents.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read an input or write an output.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The template bytes are not a valid compressed package.
    #[error("Invalid or corrupted archive: {0}")]
    CorruptArchive(String),

    /// A named part does not exist in the package.
    #[error("Part not found in archive: {0}")]
    MissingPart(String),

    /// A part could not be decoded as UTF-8 text.
    #[error("Part '{0}' is not valid UTF-8 text")]
    InvalidText(String),

    /// The data source produced zero rows.
    #[error("Data source contains no rows")]
    EmptyDataSource,

    /// The data source could not be parsed.
    #[error("Malformed data source: {0}")]
    MalformedData(String),

    /// ZIP archive error while writing.
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    XmlError(String),
}

impl Error {
    /// Whether this error is a precondition failure detected before any row ran.
    pub fn is_fatal_precondition(&self) -> bool {
        matches!(self, Error::EmptyDataSource | Error::MalformedData(_))
    }
}
