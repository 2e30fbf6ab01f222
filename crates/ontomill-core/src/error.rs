use thiserror::Error;

/// Errors raised while reading or writing RDF text.
#[derive(Error, Debug)]
pub enum RdfError {
    #[error("Turtle parse error: {0}")]
    Turtle(#[from] rio_turtle::TurtleError),

    #[error("Unsupported RDF construct: {0}")]
    Unsupported(String),

    #[error("Turtle serialization error: {0}")]
    Serialize(#[from] std::io::Error),
}

/// Errors raised when minting catalog URIs.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Empty key for entity kind {kind}")]
    EmptyKey { kind: String },

    #[error("Invalid catalog prefix: {0:?}")]
    InvalidPrefix(String),
}
