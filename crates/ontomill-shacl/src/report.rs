//! Validation report types and their `sh:ValidationReport` serialization.

use std::fmt;

use ontomill_core::rdf::ns;
use ontomill_core::{Literal, RdfGraph, Statement, Term};

use crate::compile::{Path, Severity};
use crate::error::{Result, ShaclError};
use crate::sh;

/// One constraint violation (or warning/info) found during validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub focus_node: Term,
    pub result_path: Option<Path>,
    pub source_shape: Term,
    /// IRI of the constraint component that produced this result
    pub component: &'static str,
    pub severity: Severity,
    pub message: String,
    pub value: Option<Term>,
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: focus {}", self.severity, self.focus_node)?;
        if let Some(path) = &self.result_path {
            write!(f, ", path {path}")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Outcome of validating one data graph against a set of shapes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// True iff there are no results, whatever their severity
    pub conforms: bool,
    pub results: Vec<ValidationResult>,
}

impl ValidationReport {
    pub fn new(results: Vec<ValidationResult>) -> Self {
        let conforms = results.is_empty();
        Self { conforms, results }
    }

    pub fn violation_count(&self) -> usize {
        self.count(Severity::Violation)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.results.iter().filter(|r| r.severity == severity).count()
    }

    /// The report as an RDF graph rooted at a `sh:ValidationReport` node.
    pub fn to_graph(&self) -> RdfGraph {
        let mut graph = RdfGraph::new();
        let report = Term::Blank("report".to_string());
        graph.insert(Statement::new(
            report.clone(),
            ns::RDF_TYPE,
            Term::iri(sh::VALIDATION_REPORT),
        ));
        graph.insert(Statement::new(
            report.clone(),
            sh::CONFORMS,
            Term::Literal(Literal::typed(self.conforms.to_string(), ns::XSD_BOOLEAN)),
        ));

        for (i, result) in self.results.iter().enumerate() {
            let node = Term::Blank(format!("result{i}"));
            graph.insert(Statement::new(report.clone(), sh::RESULT, node.clone()));
            graph.insert(Statement::new(
                node.clone(),
                ns::RDF_TYPE,
                Term::iri(sh::VALIDATION_RESULT),
            ));
            graph.insert(Statement::new(
                node.clone(),
                sh::FOCUS_NODE,
                result.focus_node.clone(),
            ));
            match &result.result_path {
                Some(Path::Predicate(p)) => {
                    graph.insert(Statement::new(node.clone(), sh::RESULT_PATH, Term::iri(p)));
                }
                Some(Path::Inverse(p)) => {
                    let path = Term::Blank(format!("path{i}"));
                    graph.insert(Statement::new(node.clone(), sh::RESULT_PATH, path.clone()));
                    graph.insert(Statement::new(path, sh::INVERSE_PATH, Term::iri(p)));
                }
                None => {}
            }
            if let Some(value) = &result.value {
                graph.insert(Statement::new(node.clone(), sh::VALUE, value.clone()));
            }
            graph.insert(Statement::new(
                node.clone(),
                sh::SOURCE_SHAPE,
                result.source_shape.clone(),
            ));
            graph.insert(Statement::new(
                node.clone(),
                sh::SOURCE_CONSTRAINT_COMPONENT,
                Term::iri(result.component),
            ));
            graph.insert(Statement::new(
                node.clone(),
                sh::RESULT_SEVERITY,
                Term::iri(result.severity.iri()),
            ));
            graph.insert(Statement::new(
                node,
                sh::RESULT_MESSAGE,
                Term::Literal(Literal::string(&result.message)),
            ));
        }
        graph
    }

    pub fn to_turtle(&self) -> Result<String> {
        self.to_graph().to_turtle().map_err(ShaclError::Report)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation Report")?;
        writeln!(f, "Conforms: {}", self.conforms)?;
        if !self.results.is_empty() {
            writeln!(f, "Results ({}):", self.results.len())?;
            for r in &self.results {
                writeln!(f, "  {r}")?;
            }
        }
        Ok(())
    }
}

/// The validator's answer to one `(data, shapes)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub conforms: bool,
    /// Serialized report; absent when the data conforms.
    pub report: Option<String>,
    pub details: ValidationReport,
}

impl ValidationOutcome {
    pub fn from_report(details: ValidationReport) -> Result<Self> {
        let report = if details.conforms {
            None
        } else {
            Some(details.to_turtle()?)
        };
        Ok(Self {
            conforms: details.conforms,
            report,
            details,
        })
    }
}
