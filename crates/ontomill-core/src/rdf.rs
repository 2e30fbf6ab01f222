//! Owned RDF model with a Turtle reader and writer.
//!
//! Parsing goes through `rio_turtle`; terms are copied into owned values so a
//! parsed graph can outlive the source text. The graph is a set: inserting a
//! statement twice keeps one copy.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use rio_api::formatter::TriplesFormatter;
use rio_api::model;
use rio_api::parser::TriplesParser;
use rio_turtle::{TurtleFormatter, TurtleParser};

use crate::error::RdfError;

/// Well-known vocabulary IRIs.
pub mod ns {
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
    pub const SH: &str = "http://www.w3.org/ns/shacl#";

    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    pub const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
    pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
    pub const RDFS_CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";
    pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    pub const RDFS_SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
    pub const RDFS_SUB_PROPERTY_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subPropertyOf";
    pub const RDFS_DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";
    pub const RDFS_RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
    pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
    pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
}

// ── Terms ─────────────────────────────────────────────────────────

/// A literal value. `datatype` is always set (`xsd:string` for plain
/// literals, `rdf:langString` for language-tagged ones).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    pub value: String,
    pub datatype: String,
    pub language: Option<String>,
}

impl Literal {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: ns::XSD_STRING.to_string(),
            language: None,
        }
    }

    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: datatype.into(),
            language: None,
        }
    }

    pub fn integer(value: i64) -> Self {
        Self::typed(value.to_string(), ns::XSD_INTEGER)
    }
}

/// An RDF term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Iri(String),
    Blank(String),
    Literal(Literal),
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Iri(iri.into())
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(l) => Some(l),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{iri}>"),
            Self::Blank(id) => write!(f, "_:{id}"),
            Self::Literal(l) => match (&l.language, l.datatype.as_str()) {
                (Some(lang), _) => write!(f, "{:?}@{lang}", l.value),
                (None, ns::XSD_STRING) => write!(f, "{:?}", l.value),
                (None, dt) => write!(f, "{:?}^^<{dt}>", l.value),
            },
        }
    }
}

/// One RDF statement. Subjects are IRIs or blank nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Statement {
    pub subject: Term,
    pub predicate: String,
    pub object: Term,
}

impl Statement {
    pub fn new(subject: Term, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }

    fn from_rio(t: &model::Triple<'_>) -> Result<Self, RdfError> {
        let subject = match t.subject {
            model::Subject::NamedNode(n) => Term::Iri(n.iri.to_string()),
            model::Subject::BlankNode(b) => Term::Blank(b.id.to_string()),
            _ => return Err(RdfError::Unsupported("quoted triple as subject".into())),
        };
        let object = match t.object {
            model::Term::NamedNode(n) => Term::Iri(n.iri.to_string()),
            model::Term::BlankNode(b) => Term::Blank(b.id.to_string()),
            model::Term::Literal(model::Literal::Simple { value }) => {
                Term::Literal(Literal::string(value))
            }
            model::Term::Literal(model::Literal::LanguageTaggedString { value, language }) => {
                Term::Literal(Literal {
                    value: value.to_string(),
                    datatype: ns::RDF_LANG_STRING.to_string(),
                    language: Some(language.to_ascii_lowercase()),
                })
            }
            model::Term::Literal(model::Literal::Typed { value, datatype }) => {
                Term::Literal(Literal::typed(value, datatype.iri))
            }
            _ => return Err(RdfError::Unsupported("quoted triple as object".into())),
        };
        Ok(Self::new(subject, t.predicate.iri, object))
    }
}

// ── Graph ─────────────────────────────────────────────────────────

/// An in-memory set of statements plus the prefixes declared by its source
/// document.
#[derive(Debug, Clone, Default)]
pub struct RdfGraph {
    statements: Vec<Statement>,
    seen: HashSet<Statement>,
    by_subject: HashMap<Term, Vec<usize>>,
    by_object: HashMap<Term, Vec<usize>>,
    prefixes: BTreeMap<String, String>,
}

impl RdfGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a Turtle document.
    pub fn parse_turtle(input: &str) -> Result<Self, RdfError> {
        let mut graph = Self::new();
        let mut parser = TurtleParser::new(input.as_bytes(), None);

        parser.parse_all(&mut |t| -> Result<(), RdfError> {
            graph.insert(Statement::from_rio(&t)?);
            Ok(())
        })?;

        for (prefix, iri) in parser.prefixes() {
            graph.prefixes.insert(prefix.clone(), iri.clone());
        }

        tracing::debug!(
            statements = graph.len(),
            prefixes = graph.prefixes.len(),
            "Parsed Turtle document"
        );
        Ok(graph)
    }

    /// Insert a statement. Returns false if it was already present.
    pub fn insert(&mut self, statement: Statement) -> bool {
        if self.seen.contains(&statement) {
            return false;
        }
        let idx = self.statements.len();
        self.by_subject
            .entry(statement.subject.clone())
            .or_default()
            .push(idx);
        self.by_object
            .entry(statement.object.clone())
            .or_default()
            .push(idx);
        self.seen.insert(statement.clone());
        self.statements.push(statement);
        true
    }

    pub fn contains(&self, statement: &Statement) -> bool {
        self.seen.contains(statement)
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn prefixes(&self) -> &BTreeMap<String, String> {
        &self.prefixes
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// All statements with the given subject.
    pub fn about<'a>(&'a self, subject: &Term) -> impl Iterator<Item = &'a Statement> + 'a {
        self.by_subject
            .get(subject)
            .into_iter()
            .flatten()
            .map(move |&i| &self.statements[i])
    }

    /// Objects of `(subject, predicate, ?)`.
    pub fn objects<'a>(
        &'a self,
        subject: &Term,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.about(subject)
            .filter(move |s| s.predicate == predicate)
            .map(|s| &s.object)
    }

    /// First object of `(subject, predicate, ?)`, if any.
    pub fn object<'a>(&'a self, subject: &Term, predicate: &'a str) -> Option<&'a Term> {
        self.objects(subject, predicate).next()
    }

    /// Subjects of `(?, predicate, object)`.
    pub fn subjects<'a>(
        &'a self,
        predicate: &'a str,
        object: &Term,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.by_object
            .get(object)
            .into_iter()
            .flatten()
            .map(move |&i| &self.statements[i])
            .filter(move |s| s.predicate == predicate)
            .map(|s| &s.subject)
    }

    /// All statements using `predicate`.
    pub fn with_predicate<'a>(
        &'a self,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Statement> + 'a {
        self.statements.iter().filter(move |s| s.predicate == predicate)
    }

    /// Items of an RDF collection starting at `head`. Stops at `rdf:nil` or
    /// at the first malformed cell.
    pub fn list_items(&self, head: &Term) -> Vec<Term> {
        let mut items = Vec::new();
        let mut cursor = head.clone();
        let mut visited = HashSet::new();
        while cursor.as_iri() != Some(ns::RDF_NIL) && visited.insert(cursor.clone()) {
            match self.object(&cursor, ns::RDF_FIRST) {
                Some(item) => items.push(item.clone()),
                None => break,
            }
            match self.object(&cursor, ns::RDF_REST) {
                Some(next) => cursor = next.clone(),
                None => break,
            }
        }
        items
    }

    /// Serialize the graph as Turtle.
    pub fn to_turtle(&self) -> Result<String, RdfError> {
        let mut formatter = TurtleFormatter::new(Vec::new());

        for st in &self.statements {
            let subject = match &st.subject {
                Term::Iri(iri) => model::Subject::NamedNode(model::NamedNode { iri }),
                Term::Blank(id) => model::Subject::BlankNode(model::BlankNode { id }),
                Term::Literal(_) => {
                    return Err(RdfError::Unsupported("literal in subject position".into()))
                }
            };
            let object = match &st.object {
                Term::Iri(iri) => model::Term::NamedNode(model::NamedNode { iri }),
                Term::Blank(id) => model::Term::BlankNode(model::BlankNode { id }),
                Term::Literal(l) => model::Term::Literal(rio_literal(l)),
            };
            formatter.format(&model::Triple {
                subject,
                predicate: model::NamedNode {
                    iri: &st.predicate,
                },
                object,
            })?;
        }

        let bytes = formatter.finish()?;
        String::from_utf8(bytes).map_err(|e| RdfError::Unsupported(e.to_string()))
    }
}

fn rio_literal(l: &Literal) -> model::Literal<'_> {
    match (&l.language, l.datatype.as_str()) {
        (Some(language), _) => model::Literal::LanguageTaggedString {
            value: &l.value,
            language,
        },
        (None, ns::XSD_STRING) => model::Literal::Simple { value: &l.value },
        (None, datatype) => model::Literal::Typed {
            value: &l.value,
            datatype: model::NamedNode { iri: datatype },
        },
    }
}
