//! Shape evaluation against a data graph.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use ontomill_core::rdf::ns;
use ontomill_core::{Literal, RdfGraph, Term};

use crate::compile::{
    compile_shapes, Constraint, Path, PropertyShape, Severity, Shape, Target, CLOSED_COMPONENT,
};
use crate::error::Result;
use crate::inference::Hierarchy;
use crate::report::{ValidationReport, ValidationResult};

/// A compiled shapes graph ready to validate data.
#[derive(Debug, Clone)]
pub struct ShaclEngine {
    shapes: Vec<Shape>,
    index: BTreeMap<Term, usize>,
    /// Schema statements declared alongside the shapes
    schema: RdfGraph,
}

impl ShaclEngine {
    pub fn from_shapes(shapes: &RdfGraph) -> Result<Self> {
        let compiled = compile_shapes(shapes)?;
        let index = compiled
            .iter()
            .enumerate()
            .map(|(i, shape)| (shape.id.clone(), i))
            .collect();
        Ok(Self {
            shapes: compiled,
            index,
            schema: shapes.clone(),
        })
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shape(&self, id: &Term) -> Option<&Shape> {
        self.index.get(id).map(|&i| &self.shapes[i])
    }

    /// Validate `data` after RDFS inference over data and shapes schema.
    pub fn validate(&self, data: &RdfGraph) -> ValidationReport {
        let hierarchy = Hierarchy::from_graphs(&[data, &self.schema]);
        let entailed = hierarchy.entail(data);
        let eval = Evaluation {
            engine: self,
            data,
            graph: &entailed,
            active: RefCell::new(Vec::new()),
        };

        let mut results = Vec::new();
        for shape in self.shapes.iter().filter(|s| !s.deactivated && s.has_targets()) {
            for focus in focus_nodes(shape, &entailed) {
                eval.check_shape(shape, &focus, &mut results);
            }
        }

        let report = ValidationReport::new(results);
        tracing::debug!(
            shapes = self.shapes.len(),
            results = report.results.len(),
            conforms = report.conforms,
            "Validated data graph"
        );
        report
    }
}

fn focus_nodes(shape: &Shape, graph: &RdfGraph) -> BTreeSet<Term> {
    let mut out = BTreeSet::new();
    for target in &shape.targets {
        match target {
            Target::Class(c) | Target::ImplicitClass(c) => {
                out.extend(graph.subjects(ns::RDF_TYPE, &Term::iri(c)).cloned());
            }
            Target::Node(node) => {
                out.insert(node.clone());
            }
            Target::SubjectsOf(p) => {
                out.extend(graph.with_predicate(p).map(|s| s.subject.clone()));
            }
            Target::ObjectsOf(p) => {
                out.extend(graph.with_predicate(p).map(|s| s.object.clone()));
            }
        }
    }
    out
}

/// Where a result came from, for building `ValidationResult`s.
struct Source<'a> {
    shape: &'a Term,
    path: Option<&'a Path>,
    severity: Severity,
    message: Option<&'a str>,
}

/// State for one `validate` call.
struct Evaluation<'a> {
    engine: &'a ShaclEngine,
    /// Asserted statements only
    data: &'a RdfGraph,
    /// Data plus RDFS entailments
    graph: &'a RdfGraph,
    /// (shape, focus) pairs being checked through shape references
    active: RefCell<Vec<(Term, Term)>>,
}

impl Evaluation<'_> {
    /// Whether `focus` conforms to the shape `id`, i.e. checking it yields no
    /// results at all. A reference cycle back to a pair already being checked
    /// counts as conforming.
    fn conforms(&self, id: &Term, focus: &Term) -> bool {
        let Some(shape) = self.engine.shape(id) else {
            return true;
        };
        if shape.deactivated {
            return true;
        }
        let key = (id.clone(), focus.clone());
        if self.active.borrow().contains(&key) {
            return true;
        }

        self.active.borrow_mut().push(key);
        let mut results = Vec::new();
        self.check_shape(shape, focus, &mut results);
        self.active.borrow_mut().pop();
        results.is_empty()
    }

    fn check_shape(&self, shape: &Shape, focus: &Term, results: &mut Vec<ValidationResult>) {
        let source = Source {
            shape: &shape.id,
            path: None,
            severity: shape.severity,
            message: shape.message.as_deref(),
        };
        let focus_values = [focus.clone()];
        for constraint in &shape.node_constraints {
            self.check_constraint(constraint, &source, focus, &focus_values, results);
        }

        for property in shape.properties.iter().filter(|p| !p.deactivated) {
            self.check_property(property, focus, results);
        }

        // Closedness is judged on asserted statements only.
        if shape.closed.is_some() {
            let allowed = shape.allowed_predicates();
            for st in self.data.about(focus) {
                if allowed.contains(&st.predicate) {
                    continue;
                }
                results.push(ValidationResult {
                    focus_node: focus.clone(),
                    result_path: Some(Path::Predicate(st.predicate.clone())),
                    source_shape: shape.id.clone(),
                    component: CLOSED_COMPONENT,
                    severity: shape.severity,
                    message: shape.message.clone().unwrap_or_else(|| {
                        format!("Predicate <{}> is not allowed on a closed shape", st.predicate)
                    }),
                    value: Some(st.object.clone()),
                });
            }
        }
    }

    fn check_property(
        &self,
        property: &PropertyShape,
        focus: &Term,
        results: &mut Vec<ValidationResult>,
    ) {
        let values = property.path.values(self.graph, focus);
        let source = Source {
            shape: &property.id,
            path: Some(&property.path),
            severity: property.severity,
            message: property.message.as_deref(),
        };
        for constraint in &property.constraints {
            self.check_constraint(constraint, &source, focus, &values, results);
        }
    }

    fn check_constraint(
        &self,
        constraint: &Constraint,
        source: &Source<'_>,
        focus: &Term,
        values: &[Term],
        results: &mut Vec<ValidationResult>,
    ) {
        let mut push = |value: Option<&Term>, detail: String| {
            results.push(ValidationResult {
                focus_node: focus.clone(),
                result_path: source.path.cloned(),
                source_shape: source.shape.clone(),
                component: constraint.component(),
                severity: source.severity,
                message: source.message.map(str::to_string).unwrap_or(detail),
                value: value.cloned(),
            });
        };

        match constraint {
            Constraint::MinCount(min) => {
                if values.len() < *min {
                    push(
                        None,
                        format!("Expected at least {min} value(s), found {}", values.len()),
                    );
                }
            }
            Constraint::MaxCount(max) => {
                if values.len() > *max {
                    push(
                        None,
                        format!("Expected at most {max} value(s), found {}", values.len()),
                    );
                }
            }
            Constraint::HasValue(expected) => {
                if !values.contains(expected) {
                    push(None, format!("Expected value {expected}, not present"));
                }
            }
            Constraint::UniqueLang(true) => {
                let mut seen = BTreeSet::new();
                let mut repeated = BTreeSet::new();
                for lang in values
                    .iter()
                    .filter_map(Term::as_literal)
                    .filter_map(|l| l.language.as_deref())
                    .filter(|l| !l.is_empty())
                {
                    let lang = lang.to_ascii_lowercase();
                    if !seen.insert(lang.clone()) {
                        repeated.insert(lang);
                    }
                }
                for lang in repeated {
                    push(None, format!("Language tag \"{lang}\" is used by more than one value"));
                }
            }
            Constraint::UniqueLang(false) => {}
            Constraint::Equals(p) => {
                let other: BTreeSet<&Term> = self.graph.objects(focus, p).collect();
                for value in values.iter().filter(|v| !other.contains(v)) {
                    push(Some(value), format!("Value {value} is not a value of <{p}>"));
                }
                for value in other.iter().filter(|v| !values.contains(v)) {
                    push(Some(value), format!("Value {value} of <{p}> is missing here"));
                }
            }
            Constraint::Disjoint(p) => {
                let other: BTreeSet<&Term> = self.graph.objects(focus, p).collect();
                for value in values.iter().filter(|v| other.contains(v)) {
                    push(Some(value), format!("Value {value} is also a value of <{p}>"));
                }
            }
            Constraint::LessThan(p) | Constraint::LessThanOrEquals(p) => {
                let strict = matches!(constraint, Constraint::LessThan(_));
                let op = if strict { "<" } else { "<=" };
                for value in values {
                    for other in self.graph.objects(focus, p) {
                        let ordering = match (value.as_literal(), other.as_literal()) {
                            (Some(a), Some(b)) => compare_literals(a, b),
                            _ => None,
                        };
                        let ok = match ordering {
                            Some(o) if strict => o.is_lt(),
                            Some(o) => o.is_le(),
                            None => false,
                        };
                        if !ok {
                            push(
                                Some(value),
                                format!("Expected {value} {op} {other} (value of <{p}>)"),
                            );
                        }
                    }
                }
            }
            Constraint::Node(shape) => {
                for value in values.iter().filter(|v| !self.conforms(shape, v)) {
                    push(Some(value), format!("Value {value} does not conform to shape {shape}"));
                }
            }
            Constraint::Not(shape) => {
                for value in values.iter().filter(|v| self.conforms(shape, v)) {
                    push(
                        Some(value),
                        format!("Value {value} conforms to shape {shape}, which is negated"),
                    );
                }
            }
            Constraint::And(shapes) => {
                for value in values {
                    if !shapes.iter().all(|s| self.conforms(s, value)) {
                        push(
                            Some(value),
                            format!("Value {value} does not conform to every sh:and member"),
                        );
                    }
                }
            }
            Constraint::Or(shapes) => {
                for value in values {
                    if !shapes.iter().any(|s| self.conforms(s, value)) {
                        push(
                            Some(value),
                            format!("Value {value} conforms to no sh:or member"),
                        );
                    }
                }
            }
            Constraint::Xone(shapes) => {
                for value in values {
                    let matched = shapes.iter().filter(|s| self.conforms(s, value)).count();
                    if matched != 1 {
                        push(
                            Some(value),
                            format!(
                                "Value {value} conforms to {matched} sh:xone members, expected exactly 1"
                            ),
                        );
                    }
                }
            }
            Constraint::QualifiedMinCount { shape, min } => {
                let matched = values.iter().filter(|v| self.conforms(shape, v)).count();
                if matched < *min {
                    push(
                        None,
                        format!(
                            "Expected at least {min} value(s) conforming to {shape}, found {matched}"
                        ),
                    );
                }
            }
            Constraint::QualifiedMaxCount { shape, max } => {
                let matched = values.iter().filter(|v| self.conforms(shape, v)).count();
                if matched > *max {
                    push(
                        None,
                        format!(
                            "Expected at most {max} value(s) conforming to {shape}, found {matched}"
                        ),
                    );
                }
            }
            _ => {
                for value in values {
                    if let Some(detail) = check_value(constraint, value, self.graph) {
                        push(Some(value), detail);
                    }
                }
            }
        }
    }
}

/// Evaluate a per-value constraint. Returns a description when `value` fails.
fn check_value(constraint: &Constraint, value: &Term, graph: &RdfGraph) -> Option<String> {
    match constraint {
        Constraint::Datatype(dt) => {
            let Some(lit) = value.as_literal() else {
                return Some(format!("Expected a literal of datatype <{dt}>, found {value}"));
            };
            if &lit.datatype != dt {
                return Some(format!(
                    "Expected datatype <{dt}>, found <{}>",
                    lit.datatype
                ));
            }
            if !well_formed(lit) {
                return Some(format!("Ill-formed <{dt}> literal {value}"));
            }
            None
        }
        Constraint::Class(class) => {
            let is_instance = !value.is_literal()
                && graph
                    .objects(value, ns::RDF_TYPE)
                    .any(|t| t.as_iri() == Some(class.as_str()));
            (!is_instance).then(|| format!("Expected an instance of <{class}>, found {value}"))
        }
        Constraint::NodeKind(kind) => (!kind.matches(value))
            .then(|| format!("Expected node kind {kind}, found {value}")),
        Constraint::Pattern { regex, source, .. } => match lexical_form(value) {
            Some(text) if regex.is_match(text) => None,
            Some(text) => Some(format!("Value \"{text}\" does not match pattern \"{source}\"")),
            None => Some(format!("Pattern \"{source}\" cannot apply to blank node {value}")),
        },
        Constraint::MinLength(min) => {
            let len = lexical_form(value).map(|s| s.chars().count());
            match len {
                Some(len) if len >= *min => None,
                Some(len) => Some(format!("Expected length at least {min}, found {len}")),
                None => Some(format!("Length cannot apply to blank node {value}")),
            }
        }
        Constraint::MaxLength(max) => {
            let len = lexical_form(value).map(|s| s.chars().count());
            match len {
                Some(len) if len <= *max => None,
                Some(len) => Some(format!("Expected length at most {max}, found {len}")),
                None => Some(format!("Length cannot apply to blank node {value}")),
            }
        }
        Constraint::In(allowed) => (!allowed.contains(value)).then(|| {
            let listed: Vec<String> = allowed.iter().map(ToString::to_string).collect();
            format!("Expected one of [{}], found {value}", listed.join(", "))
        }),
        Constraint::MinInclusive(bound) => range_check(value, bound, ">=", |o| o.is_ge()),
        Constraint::MaxInclusive(bound) => range_check(value, bound, "<=", |o| o.is_le()),
        Constraint::MinExclusive(bound) => range_check(value, bound, ">", |o| o.is_gt()),
        Constraint::MaxExclusive(bound) => range_check(value, bound, "<", |o| o.is_lt()),
        Constraint::LanguageIn(ranges) => {
            let lang = value.as_literal().and_then(|l| l.language.as_deref());
            match lang {
                Some(tag) if ranges.iter().any(|r| language_matches(tag, r)) => None,
                Some(tag) => Some(format!(
                    "Language tag \"{tag}\" is not one of [{}]",
                    ranges.join(", ")
                )),
                None => Some(format!("Expected a language-tagged literal, found {value}")),
            }
        }
        // Evaluated over the whole value set in `check_constraint`.
        Constraint::MinCount(_)
        | Constraint::MaxCount(_)
        | Constraint::HasValue(_)
        | Constraint::UniqueLang(_)
        | Constraint::Equals(_)
        | Constraint::Disjoint(_)
        | Constraint::LessThan(_)
        | Constraint::LessThanOrEquals(_)
        | Constraint::Node(_)
        | Constraint::Not(_)
        | Constraint::And(_)
        | Constraint::Or(_)
        | Constraint::Xone(_)
        | Constraint::QualifiedMinCount { .. }
        | Constraint::QualifiedMaxCount { .. } => None,
    }
}

/// Basic language-range matching: `*` matches any tag, otherwise the range
/// must equal the tag or one of its `-` prefixes, case-insensitively.
fn language_matches(tag: &str, range: &str) -> bool {
    if range == "*" {
        return !tag.is_empty();
    }
    let tag = tag.to_ascii_lowercase();
    let range = range.to_ascii_lowercase();
    tag == range || tag.starts_with(&format!("{range}-"))
}

fn range_check(
    value: &Term,
    bound: &Literal,
    op: &str,
    accept: impl Fn(Ordering) -> bool,
) -> Option<String> {
    let bound_term = Term::Literal(bound.clone());
    match value.as_literal().and_then(|lit| compare_literals(lit, bound)) {
        Some(ordering) if accept(ordering) => None,
        Some(_) => Some(format!("Expected a value {op} {bound_term}, found {value}")),
        None => Some(format!("Value {value} is not comparable with {bound_term}")),
    }
}

const NUMERIC_TYPES: [&str; 13] = [
    "http://www.w3.org/2001/XMLSchema#integer",
    "http://www.w3.org/2001/XMLSchema#decimal",
    "http://www.w3.org/2001/XMLSchema#double",
    "http://www.w3.org/2001/XMLSchema#float",
    "http://www.w3.org/2001/XMLSchema#int",
    "http://www.w3.org/2001/XMLSchema#long",
    "http://www.w3.org/2001/XMLSchema#short",
    "http://www.w3.org/2001/XMLSchema#byte",
    "http://www.w3.org/2001/XMLSchema#nonNegativeInteger",
    "http://www.w3.org/2001/XMLSchema#positiveInteger",
    "http://www.w3.org/2001/XMLSchema#nonPositiveInteger",
    "http://www.w3.org/2001/XMLSchema#negativeInteger",
    "http://www.w3.org/2001/XMLSchema#unsignedInt",
];

fn is_numeric(datatype: &str) -> bool {
    NUMERIC_TYPES.contains(&datatype)
}

/// Numeric literals compare by value; other literals only compare with the
/// same datatype, lexically (ISO dates and times order correctly that way).
fn compare_literals(a: &Literal, b: &Literal) -> Option<Ordering> {
    if is_numeric(&a.datatype) && is_numeric(&b.datatype) {
        let x: f64 = a.value.trim().parse().ok()?;
        let y: f64 = b.value.trim().parse().ok()?;
        return x.partial_cmp(&y);
    }
    (a.datatype == b.datatype).then(|| a.value.cmp(&b.value))
}

fn lexical_form(term: &Term) -> Option<&str> {
    match term {
        Term::Iri(iri) => Some(iri),
        Term::Literal(l) => Some(&l.value),
        Term::Blank(_) => None,
    }
}

fn well_formed(lit: &Literal) -> bool {
    let v = lit.value.trim();
    match lit.datatype.as_str() {
        ns::XSD_BOOLEAN => matches!(v, "true" | "false" | "1" | "0"),
        ns::XSD_INTEGER => v.parse::<i128>().is_ok(),
        dt if is_numeric(dt) => v.parse::<f64>().is_ok(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPES: &str = r#"
        @prefix sh: <http://www.w3.org/ns/shacl#> .
        @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
        @prefix ex: <http://example.org/mfg#> .

        ex:WorkOrderShape a sh:NodeShape ;
            sh:targetClass ex:WorkOrder ;
            sh:property [
                sh:path ex:quantity ;
                sh:minCount 1 ;
                sh:maxCount 1 ;
                sh:datatype xsd:integer ;
                sh:minInclusive 1 ;
            ] ;
            sh:property [
                sh:path ex:status ;
                sh:in ( "planned" "running" "done" ) ;
            ] ;
            sh:property [
                sh:path ex:executedBy ;
                sh:class ex:Equipment ;
                sh:nodeKind sh:IRI ;
            ] .
    "#;

    fn engine() -> ShaclEngine {
        ShaclEngine::from_shapes(&RdfGraph::parse_turtle(SHAPES).unwrap()).unwrap()
    }

    fn data(body: &str) -> RdfGraph {
        RdfGraph::parse_turtle(&format!(
            "@prefix ex: <http://example.org/mfg#> .\n\
             @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .\n{body}"
        ))
        .unwrap()
    }

    fn components(report: &ValidationReport) -> Vec<&'static str> {
        report.results.iter().map(|r| r.component).collect()
    }

    #[test]
    fn test_valid_work_order_conforms() {
        let report = engine().validate(&data(
            "ex:WO_1 a ex:WorkOrder ; ex:quantity 5 ; ex:status \"planned\" ;
                 ex:executedBy ex:EQ001 .
             ex:EQ001 a ex:Equipment .",
        ));
        assert!(report.conforms, "{report}");
        assert!(report.results.is_empty());
    }

    #[test]
    fn test_range_and_enumeration_violations() {
        let report = engine().validate(&data(
            "ex:WO_1 a ex:WorkOrder ; ex:quantity 0 ; ex:status \"lost\" .",
        ));
        assert!(!report.conforms);
        let comps = components(&report);
        assert!(comps.contains(&"http://www.w3.org/ns/shacl#MinInclusiveConstraintComponent"));
        assert!(comps.contains(&"http://www.w3.org/ns/shacl#InConstraintComponent"));
    }

    #[test]
    fn test_class_constraint_needs_typed_target() {
        let report = engine().validate(&data(
            "ex:WO_1 a ex:WorkOrder ; ex:quantity 2 ; ex:executedBy ex:Unknown .",
        ));
        assert_eq!(
            components(&report),
            vec!["http://www.w3.org/ns/shacl#ClassConstraintComponent"]
        );
        let msg = &report.results[0].message;
        assert!(msg.contains("Expected an instance of"), "{msg}");
    }

    #[test]
    fn test_wrong_datatype_and_cardinality() {
        let report = engine().validate(&data(
            "ex:WO_1 a ex:WorkOrder ; ex:quantity \"5\", \"6\" .",
        ));
        let comps = components(&report);
        assert!(comps.contains(&"http://www.w3.org/ns/shacl#MaxCountConstraintComponent"));
        assert!(comps.contains(&"http://www.w3.org/ns/shacl#DatatypeConstraintComponent"));
    }

    #[test]
    fn test_custom_message_overrides_generated_text() {
        let shapes = RdfGraph::parse_turtle(
            r#"
            @prefix sh: <http://www.w3.org/ns/shacl#> .
            @prefix ex: <http://example.org/mfg#> .
            ex:S sh:targetNode ex:LineA ;
                sh:property [ sh:path ex:capacity ; sh:minCount 1 ;
                              sh:message "Line needs a capacity" ] .
            "#,
        )
        .unwrap();
        let engine = ShaclEngine::from_shapes(&shapes).unwrap();
        let report = engine.validate(&RdfGraph::new());
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].message, "Line needs a capacity");
    }

    #[test]
    fn test_closed_shape_reports_extra_predicates() {
        let shapes = RdfGraph::parse_turtle(
            r#"
            @prefix sh: <http://www.w3.org/ns/shacl#> .
            @prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
            @prefix ex: <http://example.org/mfg#> .
            ex:S sh:targetClass ex:Line ;
                sh:closed true ;
                sh:ignoredProperties ( rdf:type ) ;
                sh:property [ sh:path ex:name ] .
            "#,
        )
        .unwrap();
        let engine = ShaclEngine::from_shapes(&shapes).unwrap();
        let report = engine.validate(&data("ex:L1 a ex:Line ; ex:name \"L1\" ; ex:color \"red\" ."));
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].component, CLOSED_COMPONENT);
    }

    #[test]
    fn test_warning_results_break_conformance() {
        let shapes = RdfGraph::parse_turtle(
            r#"
            @prefix sh: <http://www.w3.org/ns/shacl#> .
            @prefix ex: <http://example.org/mfg#> .
            ex:S sh:targetClass ex:Product ;
                sh:property [ sh:path ex:sku ; sh:minCount 1 ; sh:severity sh:Warning ] .
            "#,
        )
        .unwrap();
        let engine = ShaclEngine::from_shapes(&shapes).unwrap();
        let report = engine.validate(&data("ex:P1 a ex:Product ."));
        assert!(!report.conforms);
        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.violation_count(), 0);
    }

    fn engine_for(shapes: &str) -> ShaclEngine {
        let ttl = format!(
            "@prefix sh: <http://www.w3.org/ns/shacl#> .\n\
             @prefix ex: <http://example.org/mfg#> .\n{shapes}"
        );
        ShaclEngine::from_shapes(&RdfGraph::parse_turtle(&ttl).unwrap()).unwrap()
    }

    const NAMED_PART: &str = "ex:NamedPart sh:property [ sh:path ex:name ; sh:minCount 1 ] .";

    #[test]
    fn test_node_reference_checks_each_value() {
        let engine = engine_for(&format!(
            "ex:LineShape sh:targetClass ex:Line ;
                 sh:property [ sh:path ex:part ; sh:node ex:NamedPart ] .
             {NAMED_PART}"
        ));
        let report = engine.validate(&data(
            "ex:L1 a ex:Line ; ex:part ex:X, ex:Y .
             ex:Y ex:name \"spindle\" .",
        ));
        assert_eq!(
            components(&report),
            vec!["http://www.w3.org/ns/shacl#NodeConstraintComponent"]
        );
        assert_eq!(report.results[0].value, Some(Term::iri("http://example.org/mfg#X")));
    }

    #[test]
    fn test_not_rejects_conforming_focus() {
        let engine = engine_for(&format!(
            "ex:S sh:targetClass ex:Scrap ; sh:not ex:NamedPart .
             {NAMED_PART}"
        ));
        let report = engine.validate(&data(
            "ex:A a ex:Scrap ; ex:name \"a\" .
             ex:B a ex:Scrap .",
        ));
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].focus_node, Term::iri("http://example.org/mfg#A"));
        assert_eq!(
            report.results[0].component,
            "http://www.w3.org/ns/shacl#NotConstraintComponent"
        );
    }

    #[test]
    fn test_and_requires_every_member() {
        let engine = engine_for(
            "ex:S sh:targetClass ex:Part ;
                 sh:and (
                     [ sh:path ex:name ; sh:minCount 1 ]
                     [ sh:path ex:code ; sh:minCount 1 ]
                 ) .",
        );
        let report = engine.validate(&data(
            "ex:A a ex:Part ; ex:name \"a\" ; ex:code \"A1\" .
             ex:B a ex:Part ; ex:name \"b\" .",
        ));
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].focus_node, Term::iri("http://example.org/mfg#B"));
    }

    #[test]
    fn test_or_accepts_any_member() {
        let engine = engine_for(
            "ex:S sh:targetClass ex:Part ;
                 sh:or (
                     [ sh:path ex:name ; sh:minCount 1 ]
                     [ sh:path ex:code ; sh:minCount 1 ]
                 ) .",
        );
        let report = engine.validate(&data(
            "ex:A a ex:Part ; ex:code \"A1\" .
             ex:B a ex:Part .",
        ));
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].focus_node, Term::iri("http://example.org/mfg#B"));
        assert_eq!(
            report.results[0].component,
            "http://www.w3.org/ns/shacl#OrConstraintComponent"
        );
    }

    #[test]
    fn test_xone_requires_exactly_one_member() {
        let engine = engine_for(
            "ex:S sh:targetClass ex:Part ;
                 sh:xone (
                     [ sh:path ex:name ; sh:minCount 1 ]
                     [ sh:path ex:code ; sh:minCount 1 ]
                 ) .",
        );
        let report = engine.validate(&data(
            "ex:A a ex:Part ; ex:code \"A1\" .
             ex:B a ex:Part ; ex:code \"B1\" ; ex:name \"b\" .
             ex:C a ex:Part .",
        ));
        let failing: BTreeSet<Term> = report.results.iter().map(|r| r.focus_node.clone()).collect();
        assert_eq!(
            failing,
            BTreeSet::from([
                Term::iri("http://example.org/mfg#B"),
                Term::iri("http://example.org/mfg#C"),
            ])
        );
    }

    #[test]
    fn test_qualified_value_shape_counts_conforming_values() {
        let engine = engine_for(&format!(
            "ex:S sh:targetClass ex:Line ;
                 sh:property [
                     sh:path ex:part ;
                     sh:qualifiedValueShape ex:NamedPart ;
                     sh:qualifiedMinCount 2 ;
                 ] .
             {NAMED_PART}"
        ));
        let report = engine.validate(&data(
            "ex:L1 a ex:Line ; ex:part ex:X, ex:Y .
             ex:X ex:name \"x\" .",
        ));
        assert_eq!(
            components(&report),
            vec!["http://www.w3.org/ns/shacl#QualifiedMinCountConstraintComponent"]
        );
    }

    #[test]
    fn test_recursive_shape_reference_terminates() {
        let engine = engine_for(
            "ex:S sh:targetClass ex:Part ;
                 sh:property [ sh:path ex:feeds ; sh:node ex:S ] .",
        );
        let report = engine.validate(&data(
            "ex:A a ex:Part ; ex:feeds ex:B .
             ex:B a ex:Part ; ex:feeds ex:A .",
        ));
        assert!(report.conforms, "{report}");
    }

    #[test]
    fn test_equals_and_disjoint() {
        let engine = engine_for(
            "ex:S sh:targetClass ex:Batch ;
                 sh:property [ sh:path ex:plannedLine ; sh:equals ex:actualLine ] ;
                 sh:property [ sh:path ex:input ; sh:disjoint ex:output ] .",
        );
        let report = engine.validate(&data(
            "ex:B1 a ex:Batch ; ex:plannedLine ex:L1 ; ex:actualLine ex:L2 ;
                 ex:input ex:M1 ; ex:output ex:M1 .",
        ));
        let comps = components(&report);
        // one result per side of the equals mismatch
        assert_eq!(
            comps
                .iter()
                .filter(|c| **c == "http://www.w3.org/ns/shacl#EqualsConstraintComponent")
                .count(),
            2
        );
        assert!(comps.contains(&"http://www.w3.org/ns/shacl#DisjointConstraintComponent"));
    }

    #[test]
    fn test_less_than_compares_typed_values() {
        let engine = engine_for(
            "ex:S sh:targetClass ex:Shift ;
                 sh:property [ sh:path ex:start ; sh:lessThan ex:end ] .",
        );
        let report = engine.validate(&data(
            "ex:Ok a ex:Shift ; ex:start 6 ; ex:end 14 .
             ex:Bad a ex:Shift ; ex:start 22 ; ex:end 22 .",
        ));
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].focus_node, Term::iri("http://example.org/mfg#Bad"));
    }

    #[test]
    fn test_language_in_and_unique_lang() {
        let engine = engine_for(
            "ex:S sh:targetClass ex:Product ;
                 sh:property [ sh:path ex:label ; sh:languageIn ( \"en\" \"de\" ) ] ;
                 sh:property [ sh:path ex:title ; sh:uniqueLang true ] .",
        );
        let report = engine.validate(&data(
            "ex:P1 a ex:Product ;
                 ex:label \"Bolt\"@en-GB, \"Boulon\"@fr ;
                 ex:title \"Bolt\"@en, \"Screw\"@en, \"Schraube\"@de .",
        ));
        let comps = components(&report);
        assert_eq!(comps.len(), 2, "{report}");
        assert!(comps.contains(&"http://www.w3.org/ns/shacl#LanguageInConstraintComponent"));
        assert!(comps.contains(&"http://www.w3.org/ns/shacl#UniqueLangConstraintComponent"));
        let lang = report
            .results
            .iter()
            .find(|r| r.component.ends_with("LanguageInConstraintComponent"))
            .unwrap();
        assert!(lang.message.contains("fr"), "{}", lang.message);
    }

    #[test]
    fn test_language_range_matching() {
        assert!(language_matches("en-GB", "en"));
        assert!(language_matches("EN", "en"));
        assert!(!language_matches("eng", "en"));
        assert!(language_matches("de", "*"));
    }
}
