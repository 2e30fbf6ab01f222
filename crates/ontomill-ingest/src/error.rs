//! Error types for the ontomill-ingest crate.

use thiserror::Error;

use ontomill_core::{CatalogError, Triple};
use ontomill_graph::StoreError;
use ontomill_shacl::ShaclError;

/// Failures of single (non-bulk) mutation calls.
#[derive(Error, Debug)]
pub enum MutationError {
    /// The store refused the relationship: an endpoint is missing or the
    /// write was rejected as a bad query.
    #[error("Failed to create triple {triple}: {reason}")]
    TripleCreate {
        triple: Triple,
        reason: String,
        #[source]
        source: Option<StoreError>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid triple: {0}")]
    InvalidTriple(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl MutationError {
    /// HTTP-style status class for callers exposing the engine over a network.
    pub fn status_class(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::TripleCreate { .. } => 400,
            Self::InvalidTriple(_) | Self::Catalog(_) => 400,
            Self::Store(e) => e.status_class(),
        }
    }

    /// Whether the same call may succeed if retried unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_retryable())
    }
}

/// Failures of the validate-then-import gate.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Validation error: {0}")]
    Shacl(#[from] ShaclError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MutationError>;
