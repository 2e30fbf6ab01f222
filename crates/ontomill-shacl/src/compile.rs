//! Shape compilation from a parsed shapes graph
//!
//! Shapes are read once into `Shape` values so validation never has to walk
//! the shapes graph again. Any `sh:` parameter the engine cannot evaluate is
//! rejected here with `ShaclError::InvalidShape`. Shapes reached only through
//! `sh:node`, `sh:not`, `sh:and`, `sh:or`, `sh:xone` or
//! `sh:qualifiedValueShape` are compiled too, without targets.

use std::collections::BTreeSet;

use regex::Regex;

use ontomill_core::rdf::ns;
use ontomill_core::{Literal, RdfGraph, Term};

use crate::error::{Result, ShaclError};
use crate::sh;

/// How a shape selects its focus nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// sh:targetClass - all instances of the class
    Class(String),
    /// The shape is itself a class
    ImplicitClass(String),
    /// sh:targetNode - one specific node
    Node(Term),
    /// sh:targetSubjectsOf - subjects of triples with this predicate
    SubjectsOf(String),
    /// sh:targetObjectsOf - objects of triples with this predicate
    ObjectsOf(String),
}

/// A property path. Only single-step paths are supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Path {
    Predicate(String),
    Inverse(String),
}

impl Path {
    /// Values reached from `focus` by following this path.
    pub fn values(&self, graph: &RdfGraph, focus: &Term) -> Vec<Term> {
        let values: BTreeSet<Term> = match self {
            Self::Predicate(p) => graph.objects(focus, p).cloned().collect(),
            Self::Inverse(p) => graph.subjects(p, focus).cloned().collect(),
        };
        values.into_iter().collect()
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Predicate(p) => write!(f, "<{p}>"),
            Self::Inverse(p) => write!(f, "^<{p}>"),
        }
    }
}

/// Severity level for constraint violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Violation,
    Warning,
    Info,
}

impl Severity {
    pub fn iri(&self) -> &'static str {
        match self {
            Self::Violation => sh::VIOLATION,
            Self::Warning => sh::WARNING,
            Self::Info => sh::INFO,
        }
    }

    fn from_iri(iri: &str) -> Self {
        match iri {
            sh::WARNING => Self::Warning,
            sh::INFO => Self::Info,
            _ => Self::Violation,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Violation => f.write_str("Violation"),
            Self::Warning => f.write_str("Warning"),
            Self::Info => f.write_str("Info"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    BlankNode,
    Iri,
    Literal,
    BlankNodeOrIri,
    BlankNodeOrLiteral,
    IriOrLiteral,
}

impl NodeKind {
    fn from_iri(iri: &str) -> Option<Self> {
        Some(match iri {
            sh::BLANK_NODE => Self::BlankNode,
            sh::IRI => Self::Iri,
            sh::LITERAL => Self::Literal,
            sh::BLANK_NODE_OR_IRI => Self::BlankNodeOrIri,
            sh::BLANK_NODE_OR_LITERAL => Self::BlankNodeOrLiteral,
            sh::IRI_OR_LITERAL => Self::IriOrLiteral,
            _ => return None,
        })
    }

    pub fn matches(&self, term: &Term) -> bool {
        match (self, term) {
            (Self::BlankNode, Term::Blank(_)) => true,
            (Self::Iri, Term::Iri(_)) => true,
            (Self::Literal, Term::Literal(_)) => true,
            (Self::BlankNodeOrIri, Term::Blank(_) | Term::Iri(_)) => true,
            (Self::BlankNodeOrLiteral, Term::Blank(_) | Term::Literal(_)) => true,
            (Self::IriOrLiteral, Term::Iri(_) | Term::Literal(_)) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::BlankNode => "sh:BlankNode",
            Self::Iri => "sh:IRI",
            Self::Literal => "sh:Literal",
            Self::BlankNodeOrIri => "sh:BlankNodeOrIRI",
            Self::BlankNodeOrLiteral => "sh:BlankNodeOrLiteral",
            Self::IriOrLiteral => "sh:IRIOrLiteral",
        };
        f.write_str(name)
    }
}

/// A single constraint parameter of a shape
#[derive(Debug, Clone)]
pub enum Constraint {
    MinCount(usize),
    MaxCount(usize),
    Datatype(String),
    Class(String),
    NodeKind(NodeKind),
    Pattern {
        regex: Regex,
        source: String,
        flags: Option<String>,
    },
    MinLength(usize),
    MaxLength(usize),
    HasValue(Term),
    In(Vec<Term>),
    MinInclusive(Literal),
    MaxInclusive(Literal),
    MinExclusive(Literal),
    MaxExclusive(Literal),
    LanguageIn(Vec<String>),
    UniqueLang(bool),
    Equals(String),
    Disjoint(String),
    LessThan(String),
    LessThanOrEquals(String),
    /// Each value must conform to the referenced shape
    Node(Term),
    Not(Term),
    And(Vec<Term>),
    Or(Vec<Term>),
    Xone(Vec<Term>),
    QualifiedMinCount { shape: Term, min: usize },
    QualifiedMaxCount { shape: Term, max: usize },
}

impl Constraint {
    /// IRI of the SHACL constraint component this parameter belongs to.
    pub fn component(&self) -> &'static str {
        match self {
            Self::MinCount(_) => "http://www.w3.org/ns/shacl#MinCountConstraintComponent",
            Self::MaxCount(_) => "http://www.w3.org/ns/shacl#MaxCountConstraintComponent",
            Self::Datatype(_) => "http://www.w3.org/ns/shacl#DatatypeConstraintComponent",
            Self::Class(_) => "http://www.w3.org/ns/shacl#ClassConstraintComponent",
            Self::NodeKind(_) => "http://www.w3.org/ns/shacl#NodeKindConstraintComponent",
            Self::Pattern { .. } => "http://www.w3.org/ns/shacl#PatternConstraintComponent",
            Self::MinLength(_) => "http://www.w3.org/ns/shacl#MinLengthConstraintComponent",
            Self::MaxLength(_) => "http://www.w3.org/ns/shacl#MaxLengthConstraintComponent",
            Self::HasValue(_) => "http://www.w3.org/ns/shacl#HasValueConstraintComponent",
            Self::In(_) => "http://www.w3.org/ns/shacl#InConstraintComponent",
            Self::MinInclusive(_) => "http://www.w3.org/ns/shacl#MinInclusiveConstraintComponent",
            Self::MaxInclusive(_) => "http://www.w3.org/ns/shacl#MaxInclusiveConstraintComponent",
            Self::MinExclusive(_) => "http://www.w3.org/ns/shacl#MinExclusiveConstraintComponent",
            Self::MaxExclusive(_) => "http://www.w3.org/ns/shacl#MaxExclusiveConstraintComponent",
            Self::LanguageIn(_) => "http://www.w3.org/ns/shacl#LanguageInConstraintComponent",
            Self::UniqueLang(_) => "http://www.w3.org/ns/shacl#UniqueLangConstraintComponent",
            Self::Equals(_) => "http://www.w3.org/ns/shacl#EqualsConstraintComponent",
            Self::Disjoint(_) => "http://www.w3.org/ns/shacl#DisjointConstraintComponent",
            Self::LessThan(_) => "http://www.w3.org/ns/shacl#LessThanConstraintComponent",
            Self::LessThanOrEquals(_) => {
                "http://www.w3.org/ns/shacl#LessThanOrEqualsConstraintComponent"
            }
            Self::Node(_) => "http://www.w3.org/ns/shacl#NodeConstraintComponent",
            Self::Not(_) => "http://www.w3.org/ns/shacl#NotConstraintComponent",
            Self::And(_) => "http://www.w3.org/ns/shacl#AndConstraintComponent",
            Self::Or(_) => "http://www.w3.org/ns/shacl#OrConstraintComponent",
            Self::Xone(_) => "http://www.w3.org/ns/shacl#XoneConstraintComponent",
            Self::QualifiedMinCount { .. } => {
                "http://www.w3.org/ns/shacl#QualifiedMinCountConstraintComponent"
            }
            Self::QualifiedMaxCount { .. } => {
                "http://www.w3.org/ns/shacl#QualifiedMaxCountConstraintComponent"
            }
        }
    }

    /// Shapes this constraint evaluates values against.
    pub fn shape_refs(&self) -> Vec<&Term> {
        match self {
            Self::Node(s) | Self::Not(s) => vec![s],
            Self::And(list) | Self::Or(list) | Self::Xone(list) => list.iter().collect(),
            Self::QualifiedMinCount { shape, .. } | Self::QualifiedMaxCount { shape, .. } => {
                vec![shape]
            }
            _ => Vec::new(),
        }
    }
}

/// Component IRI used for `sh:closed` results.
pub const CLOSED_COMPONENT: &str = "http://www.w3.org/ns/shacl#ClosedConstraintComponent";

/// A compiled property shape
#[derive(Debug, Clone)]
pub struct PropertyShape {
    pub id: Term,
    pub path: Path,
    pub constraints: Vec<Constraint>,
    pub severity: Severity,
    pub name: Option<String>,
    pub message: Option<String>,
    pub deactivated: bool,
}

/// A compiled node shape
#[derive(Debug, Clone)]
pub struct Shape {
    pub id: Term,
    pub targets: Vec<Target>,
    pub node_constraints: Vec<Constraint>,
    pub properties: Vec<PropertyShape>,
    pub severity: Severity,
    pub name: Option<String>,
    pub message: Option<String>,
    pub deactivated: bool,
    /// `Some` when the shape is `sh:closed true`; holds the ignored properties.
    pub closed: Option<BTreeSet<String>>,
}

impl Shape {
    pub fn has_targets(&self) -> bool {
        !self.targets.is_empty()
    }

    /// Predicates a closed shape allows on its focus nodes.
    pub fn allowed_predicates(&self) -> BTreeSet<String> {
        let mut allowed = self.closed.clone().unwrap_or_default();
        for p in &self.properties {
            if let Path::Predicate(pred) = &p.path {
                allowed.insert(pred.clone());
            }
        }
        allowed
    }

    /// Every shape referenced by this shape's constraints.
    pub fn shape_refs(&self) -> impl Iterator<Item = &Term> + '_ {
        self.node_constraints
            .iter()
            .chain(self.properties.iter().flat_map(|p| p.constraints.iter()))
            .flat_map(Constraint::shape_refs)
    }
}

const TARGET_PREDICATES: [&str; 4] = [
    sh::TARGET_CLASS,
    sh::TARGET_NODE,
    sh::TARGET_SUBJECTS_OF,
    sh::TARGET_OBJECTS_OF,
];

/// Compile every shape declared in `shapes`.
///
/// A shape is any `sh:NodeShape` or `sh:PropertyShape`, any node with a target
/// declaration, any node carrying `sh:property`, and any node referenced from
/// another shape's constraints. A shape with its own `sh:path` is compiled as
/// a shape holding just that property.
pub fn compile_shapes(shapes: &RdfGraph) -> Result<Vec<Shape>> {
    let mut pending: Vec<Term> = Vec::new();
    for class in [sh::NODE_SHAPE, sh::PROPERTY_SHAPE] {
        pending.extend(shapes.subjects(ns::RDF_TYPE, &Term::iri(class)).cloned());
    }
    for st in shapes.statements() {
        if TARGET_PREDICATES.contains(&st.predicate.as_str()) || st.predicate == sh::PROPERTY {
            pending.push(st.subject.clone());
        }
    }

    let mut seen = BTreeSet::new();
    let mut compiled = Vec::new();
    while let Some(id) = pending.pop() {
        if !seen.insert(id.clone()) {
            continue;
        }
        let shape = if shapes.object(&id, sh::PATH).is_some() {
            compile_standalone_property_shape(shapes, &id)?
        } else {
            compile_node_shape(shapes, &id)?
        };
        pending.extend(shape.shape_refs().filter(|r| !seen.contains(*r)).cloned());
        compiled.push(shape);
    }
    compiled.sort_by(|a, b| a.id.cmp(&b.id));

    tracing::debug!(shapes = compiled.len(), "Compiled SHACL shapes");
    Ok(compiled)
}

fn compile_node_shape(graph: &RdfGraph, id: &Term) -> Result<Shape> {
    reject_unsupported(graph, id)?;
    let mut properties = Vec::new();
    for prop in graph.objects(id, sh::PROPERTY) {
        properties.push(compile_property_shape(graph, prop)?);
    }

    let closed = if boolean(graph, id, sh::CLOSED)? {
        let mut ignored = BTreeSet::new();
        if let Some(head) = graph.object(id, sh::IGNORED_PROPERTIES) {
            for item in graph.list_items(head) {
                let Some(iri) = item.as_iri() else {
                    return Err(invalid(id, "sh:ignoredProperties must list IRIs"));
                };
                ignored.insert(iri.to_string());
            }
        }
        Some(ignored)
    } else {
        None
    };

    Ok(Shape {
        id: id.clone(),
        targets: targets(graph, id),
        node_constraints: constraints(graph, id, false)?,
        properties,
        severity: severity(graph, id),
        name: text(graph, id, sh::NAME),
        message: text(graph, id, sh::MESSAGE),
        deactivated: boolean(graph, id, sh::DEACTIVATED)?,
        closed,
    })
}

fn compile_standalone_property_shape(graph: &RdfGraph, id: &Term) -> Result<Shape> {
    let property = compile_property_shape(graph, id)?;
    Ok(Shape {
        id: id.clone(),
        targets: targets(graph, id),
        node_constraints: Vec::new(),
        severity: property.severity,
        name: property.name.clone(),
        message: property.message.clone(),
        deactivated: property.deactivated,
        properties: vec![property],
        closed: None,
    })
}

fn compile_property_shape(graph: &RdfGraph, id: &Term) -> Result<PropertyShape> {
    reject_unsupported(graph, id)?;
    let path = match graph.object(id, sh::PATH) {
        Some(Term::Iri(p)) => Path::Predicate(p.clone()),
        Some(blank @ Term::Blank(_)) => match graph.object(blank, sh::INVERSE_PATH) {
            Some(Term::Iri(p)) => Path::Inverse(p.clone()),
            _ => return Err(invalid(id, "only predicate and inverse paths are supported")),
        },
        Some(Term::Literal(_)) => return Err(invalid(id, "sh:path must not be a literal")),
        None => return Err(invalid(id, "property shape without sh:path")),
    };

    Ok(PropertyShape {
        id: id.clone(),
        path,
        constraints: constraints(graph, id, true)?,
        severity: severity(graph, id),
        name: text(graph, id, sh::NAME),
        message: text(graph, id, sh::MESSAGE),
        deactivated: boolean(graph, id, sh::DEACTIVATED)?,
    })
}

/// `sh:` parameters the compiler understands on a shape node.
const KNOWN_PARAMETERS: &[&str] = &[
    sh::TARGET_CLASS,
    sh::TARGET_NODE,
    sh::TARGET_SUBJECTS_OF,
    sh::TARGET_OBJECTS_OF,
    sh::PROPERTY,
    sh::PATH,
    sh::CLOSED,
    sh::IGNORED_PROPERTIES,
    sh::DEACTIVATED,
    sh::SEVERITY,
    sh::MESSAGE,
    sh::NAME,
    sh::DESCRIPTION,
    sh::ORDER,
    sh::GROUP,
    sh::DEFAULT_VALUE,
    sh::MIN_COUNT,
    sh::MAX_COUNT,
    sh::DATATYPE,
    sh::CLASS,
    sh::NODE_KIND,
    sh::PATTERN,
    sh::FLAGS,
    sh::MIN_LENGTH,
    sh::MAX_LENGTH,
    sh::HAS_VALUE,
    sh::IN,
    sh::MIN_INCLUSIVE,
    sh::MAX_INCLUSIVE,
    sh::MIN_EXCLUSIVE,
    sh::MAX_EXCLUSIVE,
    sh::LANGUAGE_IN,
    sh::UNIQUE_LANG,
    sh::EQUALS,
    sh::DISJOINT,
    sh::LESS_THAN,
    sh::LESS_THAN_OR_EQUALS,
    sh::NODE,
    sh::NOT,
    sh::AND,
    sh::OR,
    sh::XONE,
    sh::QUALIFIED_VALUE_SHAPE,
    sh::QUALIFIED_MIN_COUNT,
    sh::QUALIFIED_MAX_COUNT,
    sh::QUALIFIED_VALUE_SHAPES_DISJOINT,
];

/// Fail on any `sh:` parameter the engine would otherwise skip.
fn reject_unsupported(graph: &RdfGraph, id: &Term) -> Result<()> {
    let unknown = graph
        .about(id)
        .map(|st| st.predicate.as_str())
        .find(|p| p.starts_with(sh::NS) && !KNOWN_PARAMETERS.contains(p));
    match unknown {
        Some(p) => Err(invalid(id, &format!("unsupported SHACL parameter <{p}>"))),
        None => Ok(()),
    }
}

fn targets(graph: &RdfGraph, id: &Term) -> Vec<Target> {
    let mut out = Vec::new();
    for class in graph.objects(id, sh::TARGET_CLASS).filter_map(Term::as_iri) {
        out.push(Target::Class(class.to_string()));
    }
    if let Some(iri) = id.as_iri() {
        let is_class = graph.objects(id, ns::RDF_TYPE).any(|t| {
            matches!(t.as_iri(), Some(ns::RDFS_CLASS) | Some(ns::OWL_CLASS))
        });
        if is_class {
            out.push(Target::ImplicitClass(iri.to_string()));
        }
    }
    for node in graph.objects(id, sh::TARGET_NODE) {
        out.push(Target::Node(node.clone()));
    }
    for p in graph.objects(id, sh::TARGET_SUBJECTS_OF).filter_map(Term::as_iri) {
        out.push(Target::SubjectsOf(p.to_string()));
    }
    for p in graph.objects(id, sh::TARGET_OBJECTS_OF).filter_map(Term::as_iri) {
        out.push(Target::ObjectsOf(p.to_string()));
    }
    out
}

fn constraints(graph: &RdfGraph, id: &Term, on_property: bool) -> Result<Vec<Constraint>> {
    let mut out = Vec::new();

    if on_property {
        if let Some(n) = count(graph, id, sh::MIN_COUNT)? {
            out.push(Constraint::MinCount(n));
        }
        if let Some(n) = count(graph, id, sh::MAX_COUNT)? {
            out.push(Constraint::MaxCount(n));
        }
    } else if graph.object(id, sh::MIN_COUNT).is_some() || graph.object(id, sh::MAX_COUNT).is_some()
    {
        return Err(invalid(id, "cardinality constraints require sh:path"));
    }

    for dt in graph.objects(id, sh::DATATYPE) {
        let Some(iri) = dt.as_iri() else {
            return Err(invalid(id, "sh:datatype must be an IRI"));
        };
        out.push(Constraint::Datatype(iri.to_string()));
    }
    for class in graph.objects(id, sh::CLASS) {
        let Some(iri) = class.as_iri() else {
            return Err(invalid(id, "sh:class must be an IRI"));
        };
        out.push(Constraint::Class(iri.to_string()));
    }
    if let Some(kind) = graph.object(id, sh::NODE_KIND) {
        let kind = kind
            .as_iri()
            .and_then(NodeKind::from_iri)
            .ok_or_else(|| invalid(id, &format!("unknown sh:nodeKind {kind}")))?;
        out.push(Constraint::NodeKind(kind));
    }
    if let Some(pattern) = graph.object(id, sh::PATTERN) {
        let source = literal_value(id, pattern, "sh:pattern")?;
        let flags = text(graph, id, sh::FLAGS);
        out.push(Constraint::Pattern {
            regex: build_regex(&source, flags.as_deref())?,
            source,
            flags,
        });
    }
    if let Some(n) = count(graph, id, sh::MIN_LENGTH)? {
        out.push(Constraint::MinLength(n));
    }
    if let Some(n) = count(graph, id, sh::MAX_LENGTH)? {
        out.push(Constraint::MaxLength(n));
    }
    for value in graph.objects(id, sh::HAS_VALUE) {
        out.push(Constraint::HasValue(value.clone()));
    }
    if let Some(head) = graph.object(id, sh::IN) {
        out.push(Constraint::In(graph.list_items(head)));
    }

    if let Some(head) = graph.object(id, sh::LANGUAGE_IN) {
        let mut ranges = Vec::new();
        for item in graph.list_items(head) {
            ranges.push(literal_value(id, &item, "sh:languageIn")?);
        }
        out.push(Constraint::LanguageIn(ranges));
    }

    let pairs: [(&str, fn(String) -> Constraint); 2] = [
        (sh::EQUALS, Constraint::Equals),
        (sh::DISJOINT, Constraint::Disjoint),
    ];
    for (predicate, build) in pairs {
        for p in graph.objects(id, predicate) {
            out.push(build(iri_value(id, p, predicate)?));
        }
    }

    for shape in graph.objects(id, sh::NODE) {
        out.push(Constraint::Node(shape.clone()));
    }
    for shape in graph.objects(id, sh::NOT) {
        out.push(Constraint::Not(shape.clone()));
    }
    let logical: [(&str, fn(Vec<Term>) -> Constraint); 3] = [
        (sh::AND, Constraint::And),
        (sh::OR, Constraint::Or),
        (sh::XONE, Constraint::Xone),
    ];
    for (predicate, build) in logical {
        for head in graph.objects(id, predicate) {
            out.push(build(graph.list_items(head)));
        }
    }

    if on_property {
        out.extend(property_only_constraints(graph, id)?);
    } else {
        let misplaced = [
            sh::LESS_THAN,
            sh::LESS_THAN_OR_EQUALS,
            sh::UNIQUE_LANG,
            sh::QUALIFIED_VALUE_SHAPE,
        ]
        .into_iter()
        .find(|p| graph.object(id, p).is_some());
        if let Some(p) = misplaced {
            return Err(invalid(id, &format!("<{p}> requires sh:path")));
        }
    }

    let bounds: [(&str, fn(Literal) -> Constraint); 4] = [
        (sh::MIN_INCLUSIVE, Constraint::MinInclusive),
        (sh::MAX_INCLUSIVE, Constraint::MaxInclusive),
        (sh::MIN_EXCLUSIVE, Constraint::MinExclusive),
        (sh::MAX_EXCLUSIVE, Constraint::MaxExclusive),
    ];
    for (predicate, build) in bounds {
        if let Some(bound) = graph.object(id, predicate) {
            let Some(lit) = bound.as_literal() else {
                return Err(invalid(id, "range bounds must be literals"));
            };
            out.push(build(lit.clone()));
        }
    }

    Ok(out)
}

fn property_only_constraints(graph: &RdfGraph, id: &Term) -> Result<Vec<Constraint>> {
    let mut out = Vec::new();

    let orderings: [(&str, fn(String) -> Constraint); 2] = [
        (sh::LESS_THAN, Constraint::LessThan),
        (sh::LESS_THAN_OR_EQUALS, Constraint::LessThanOrEquals),
    ];
    for (predicate, build) in orderings {
        for p in graph.objects(id, predicate) {
            out.push(build(iri_value(id, p, predicate)?));
        }
    }
    if graph.object(id, sh::UNIQUE_LANG).is_some() {
        out.push(Constraint::UniqueLang(boolean(graph, id, sh::UNIQUE_LANG)?));
    }

    let qualified = graph.object(id, sh::QUALIFIED_VALUE_SHAPE);
    let min = count(graph, id, sh::QUALIFIED_MIN_COUNT)?;
    let max = count(graph, id, sh::QUALIFIED_MAX_COUNT)?;
    match qualified {
        Some(shape) => {
            if boolean(graph, id, sh::QUALIFIED_VALUE_SHAPES_DISJOINT)? {
                return Err(invalid(id, "sh:qualifiedValueShapesDisjoint is not supported"));
            }
            if let Some(min) = min {
                out.push(Constraint::QualifiedMinCount {
                    shape: shape.clone(),
                    min,
                });
            }
            if let Some(max) = max {
                out.push(Constraint::QualifiedMaxCount {
                    shape: shape.clone(),
                    max,
                });
            }
        }
        None if min.is_some() || max.is_some() => {
            return Err(invalid(id, "qualified counts require sh:qualifiedValueShape"));
        }
        None => {}
    }

    Ok(out)
}

/// Build a regex honouring the SHACL flag letters the `regex` crate supports.
fn build_regex(pattern: &str, flags: Option<&str>) -> Result<Regex> {
    let source = match flags {
        Some(f) => {
            let letters: String = f.chars().filter(|c| "imsx".contains(*c)).collect();
            if letters.is_empty() {
                pattern.to_string()
            } else {
                format!("(?{letters}){pattern}")
            }
        }
        None => pattern.to_string(),
    };
    Regex::new(&source).map_err(|e| ShaclError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

// ── Parameter Readers ─────────────────────────────────────────────

fn invalid(id: &Term, message: &str) -> ShaclError {
    ShaclError::InvalidShape {
        shape: id.to_string(),
        message: message.to_string(),
    }
}

fn literal_value(id: &Term, term: &Term, what: &str) -> Result<String> {
    term.as_literal()
        .map(|l| l.value.clone())
        .ok_or_else(|| invalid(id, &format!("{what} must be a literal")))
}

fn iri_value(id: &Term, term: &Term, what: &str) -> Result<String> {
    term.as_iri()
        .map(str::to_string)
        .ok_or_else(|| invalid(id, &format!("{what} must be an IRI")))
}

fn text(graph: &RdfGraph, id: &Term, predicate: &str) -> Option<String> {
    graph
        .objects(id, predicate)
        .filter_map(Term::as_literal)
        .map(|l| l.value.clone())
        .next()
}

fn count(graph: &RdfGraph, id: &Term, predicate: &str) -> Result<Option<usize>> {
    let Some(term) = graph.object(id, predicate) else {
        return Ok(None);
    };
    let raw = literal_value(id, term, predicate)?;
    raw.trim()
        .parse::<usize>()
        .map(Some)
        .map_err(|_| invalid(id, &format!("{predicate} expects a non-negative integer, got {raw}")))
}

fn boolean(graph: &RdfGraph, id: &Term, predicate: &str) -> Result<bool> {
    match graph.object(id, predicate) {
        None => Ok(false),
        Some(term) => match literal_value(id, term, predicate)?.as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(invalid(id, &format!("{predicate} expects a boolean, got {other}"))),
        },
    }
}

fn severity(graph: &RdfGraph, id: &Term) -> Severity {
    graph
        .object(id, sh::SEVERITY)
        .and_then(Term::as_iri)
        .map(Severity::from_iri)
        .unwrap_or_default()
}
