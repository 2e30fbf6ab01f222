//! ontomill-core: Shared types for the Ontomill manufacturing ontology engine.
//!
//! This crate provides the foundational pieces used across all Ontomill components:
//! - Triple, filter, and bulk-operation types exchanged with callers
//! - An owned RDF model with a Turtle reader and writer
//! - The vocabulary-shortening policy applied when RDF enters the property graph
//! - The catalog policy that mints resource URIs for manufacturing entities
//! - Common error types

pub mod catalog;
pub mod error;
pub mod rdf;
pub mod types;
pub mod vocab;

pub use catalog::{Catalog, EntityKind};
pub use error::{CatalogError, RdfError};
pub use rdf::{Literal, RdfGraph, Statement, Term};
pub use types::{
    BulkItemError, BulkItemKind, BulkOperationResult, BulkTripleOperation, ImportResult,
    ImportSummary, Link, LinkDirection, NewResource, PropertyValue, QualityRecord, Triple,
    TripleFilter, TripleRecord, WorkOrder,
};
pub use vocab::{Shortener, VocabUris, VocabularyPolicy};
