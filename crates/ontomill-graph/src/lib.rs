//! Ontomill Graph: triple store backends for the manufacturing knowledge graph.
//!
//! This crate is the single mutation point for the property graph. All graph
//! reads and writes flow through the [`TripleStore`] seam, implemented by the
//! Neo4j [`GraphClient`] and by the process-local [`MemoryStore`].

pub mod client;
pub mod memory;
pub mod mutations;
pub mod queries;
pub mod store;

pub use client::{GraphClient, GraphConfig, StoreError};
pub use memory::MemoryStore;
pub use queries::TripleQuery;
pub use store::{NodeRemoval, ResourceOutcome, TripleStore};
