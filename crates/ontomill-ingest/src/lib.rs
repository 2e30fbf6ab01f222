//! Ontomill Ingest: ontology ingestion and triple mutation engine.
//!
//! Ties the graph store, shape validator and catalog policy together:
//! - [`Ingestor`] gates RDF imports behind SHACL validation
//! - [`TripleMutator`] creates, reads and deletes triples, singly or in bulk,
//!   and registers work orders and quality records
//! - [`BootstrapLoader`] prepares the store and loads the ontology directory

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod ingest;
pub mod mutator;

pub use bootstrap::{BootstrapLoader, BootstrapReport, OntologyLoad, VocabularyStatus};
pub use config::OntomillConfig;
pub use error::{IngestError, MutationError};
pub use ingest::Ingestor;
pub use mutator::TripleMutator;
