//! ontomill-shacl: SHACL validation gate for incoming RDF documents.
//!
//! A shapes graph is compiled once into [`ShaclEngine`]; each data graph is
//! extended by RDFS inference (schema read from both graphs) and checked
//! against every active, targeted shape. The engine is read-only and never
//! touches a store.
//!
//! ```ignore
//! let outcome = ontomill_shacl::validate(data_ttl, shapes_ttl)?;
//! if !outcome.conforms {
//!     eprintln!("{}", outcome.report.unwrap_or_default());
//! }
//! ```

pub mod compile;
pub mod error;
pub mod inference;
pub mod report;
pub mod sh;
pub mod validate;

pub use compile::{Constraint, NodeKind, Path, PropertyShape, Severity, Shape, Target};
pub use error::{Document, Result, ShaclError};
pub use inference::Hierarchy;
pub use report::{ValidationOutcome, ValidationReport, ValidationResult};
pub use validate::ShaclEngine;

use ontomill_core::RdfGraph;

/// Validate a Turtle data document against a Turtle shapes document.
///
/// Non-conformance is an `Ok` outcome; errors are reserved for documents that
/// do not parse and shapes that cannot be compiled.
pub fn validate(data_ttl: &str, shapes_ttl: &str) -> Result<ValidationOutcome> {
    let shapes = RdfGraph::parse_turtle(shapes_ttl).map_err(|source| ShaclError::Parse {
        document: Document::Shapes,
        source,
    })?;
    let data = RdfGraph::parse_turtle(data_ttl).map_err(|source| ShaclError::Parse {
        document: Document::Data,
        source,
    })?;

    let engine = ShaclEngine::from_shapes(&shapes)?;
    ValidationOutcome::from_report(engine.validate(&data))
}
