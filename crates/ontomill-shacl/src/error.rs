//! SHACL error types

use ontomill_core::RdfError;
use thiserror::Error;

/// Result type for SHACL operations
pub type Result<T> = std::result::Result<T, ShaclError>;

/// Which input document failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Document {
    Data,
    Shapes,
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Data => f.write_str("data"),
            Self::Shapes => f.write_str("shapes"),
        }
    }
}

/// SHACL compilation and parsing errors.
///
/// Non-conformance is not an error; it is a report with `conforms == false`.
#[derive(Debug, Error)]
pub enum ShaclError {
    #[error("Failed to parse {document} document: {source}")]
    Parse {
        document: Document,
        #[source]
        source: RdfError,
    },

    #[error("Invalid shape {shape}: {message}")]
    InvalidShape { shape: String, message: String },

    #[error("Invalid regex pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Failed to serialize validation report: {0}")]
    Report(#[source] RdfError),
}
