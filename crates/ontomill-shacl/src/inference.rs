//! RDFS entailment applied to the data graph before validation.
//!
//! Covers `rdfs:subClassOf` and `rdfs:subPropertyOf` closure plus
//! `rdfs:domain` / `rdfs:range` typing. Schema statements are collected from
//! every graph handed to [`Hierarchy::from_graphs`], so an ontology embedded in
//! the shapes document applies to the data as well.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use ontomill_core::rdf::ns;
use ontomill_core::{RdfGraph, Statement, Term};

#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    super_classes: BTreeMap<String, BTreeSet<String>>,
    super_properties: BTreeMap<String, BTreeSet<String>>,
    domains: BTreeMap<String, BTreeSet<String>>,
    ranges: BTreeMap<String, BTreeSet<String>>,
}

impl Hierarchy {
    pub fn from_graphs(graphs: &[&RdfGraph]) -> Self {
        let mut direct_classes: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut direct_properties: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut domains: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut ranges: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for graph in graphs {
            for st in graph.statements() {
                let (Some(s), Some(o)) = (st.subject.as_iri(), st.object.as_iri()) else {
                    continue;
                };
                let table = match st.predicate.as_str() {
                    ns::RDFS_SUB_CLASS_OF => &mut direct_classes,
                    ns::RDFS_SUB_PROPERTY_OF => &mut direct_properties,
                    ns::RDFS_DOMAIN => &mut domains,
                    ns::RDFS_RANGE => &mut ranges,
                    _ => continue,
                };
                table.entry(s.to_string()).or_default().insert(o.to_string());
            }
        }

        Self {
            super_classes: closure(&direct_classes),
            super_properties: closure(&direct_properties),
            domains,
            ranges,
        }
    }

    /// Strict superclasses of `class` (transitive).
    pub fn super_classes(&self, class: &str) -> impl Iterator<Item = &str> {
        self.super_classes
            .get(class)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Strict superproperties of `property` (transitive).
    pub fn super_properties(&self, property: &str) -> impl Iterator<Item = &str> {
        self.super_properties
            .get(property)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.super_classes.is_empty()
            && self.super_properties.is_empty()
            && self.domains.is_empty()
            && self.ranges.is_empty()
    }

    /// A copy of `data` extended with every statement this hierarchy entails.
    pub fn entail(&self, data: &RdfGraph) -> RdfGraph {
        let mut graph = data.clone();
        if self.is_empty() {
            return graph;
        }

        let mut added = 0usize;
        for st in data.statements() {
            let mut predicates = vec![st.predicate.as_str()];
            predicates.extend(self.super_properties(&st.predicate));

            for p in &predicates[1..] {
                added += usize::from(graph.insert(Statement::new(
                    st.subject.clone(),
                    *p,
                    st.object.clone(),
                )));
            }

            for p in &predicates {
                for class in self.domains.get(*p).into_iter().flatten() {
                    added += usize::from(graph.insert(type_statement(&st.subject, class)));
                }
                if st.object.is_literal() {
                    continue;
                }
                for class in self.ranges.get(*p).into_iter().flatten() {
                    added += usize::from(graph.insert(type_statement(&st.object, class)));
                }
            }
        }

        // Type closure runs last so classes introduced by domain/range are lifted too.
        let typed: Vec<(Term, String)> = graph
            .with_predicate(ns::RDF_TYPE)
            .filter_map(|st| Some((st.subject.clone(), st.object.as_iri()?.to_string())))
            .collect();
        for (node, class) in typed {
            for sup in self.super_classes(&class) {
                added += usize::from(graph.insert(type_statement(&node, sup)));
            }
        }

        tracing::debug!(entailed = added, "Applied RDFS inference");
        graph
    }
}

fn type_statement(node: &Term, class: &str) -> Statement {
    Statement::new(node.clone(), ns::RDF_TYPE, Term::iri(class))
}

/// Transitive closure of a direct-edge table. Cycles are tolerated; a node is
/// never listed as its own superclass.
fn closure(direct: &BTreeMap<String, BTreeSet<String>>) -> BTreeMap<String, BTreeSet<String>> {
    let mut out = BTreeMap::new();
    for start in direct.keys() {
        let mut reached = BTreeSet::new();
        let mut queue: VecDeque<&String> = direct[start].iter().collect();
        while let Some(next) = queue.pop_front() {
            if next == start || !reached.insert(next.clone()) {
                continue;
            }
            if let Some(parents) = direct.get(next) {
                queue.extend(parents.iter());
            }
        }
        if !reached.is_empty() {
            out.insert(start.clone(), reached);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONTOLOGY: &str = r#"
        @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
        @prefix ex: <http://example.org/mfg#> .
        ex:CNCMachine rdfs:subClassOf ex:Machine .
        ex:Machine rdfs:subClassOf ex:Equipment .
        ex:Equipment rdfs:subClassOf ex:Machine .
        ex:runsOn rdfs:subPropertyOf ex:executedBy .
        ex:executedBy rdfs:domain ex:WorkOrder ; rdfs:range ex:Equipment .
    "#;

    fn ex(local: &str) -> String {
        format!("http://example.org/mfg#{local}")
    }

    #[test]
    fn test_subclass_closure_survives_cycles() {
        let g = RdfGraph::parse_turtle(ONTOLOGY).unwrap();
        let h = Hierarchy::from_graphs(&[&g]);
        let sup: BTreeSet<&str> = h.super_classes(&ex("CNCMachine")).collect();
        assert!(sup.contains(ex("Machine").as_str()));
        assert!(sup.contains(ex("Equipment").as_str()));
        assert!(!h.super_classes(&ex("Machine")).any(|c| c == ex("Machine")));
    }

    #[test]
    fn test_entail_subproperty_domain_and_range() {
        let schema = RdfGraph::parse_turtle(ONTOLOGY).unwrap();
        let data = RdfGraph::parse_turtle(
            "@prefix ex: <http://example.org/mfg#> . ex:WO_1 ex:runsOn ex:M1 .",
        )
        .unwrap();
        let h = Hierarchy::from_graphs(&[&data, &schema]);
        let entailed = h.entail(&data);

        let wo = Term::iri(ex("WO_1"));
        let m1 = Term::iri(ex("M1"));
        assert!(entailed.contains(&Statement::new(wo.clone(), ex("executedBy"), m1.clone())));
        assert!(entailed.contains(&type_statement(&wo, &ex("WorkOrder"))));
        assert!(entailed.contains(&type_statement(&m1, &ex("Equipment"))));
        assert!(entailed.contains(&type_statement(&m1, &ex("Machine"))));
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn test_no_schema_leaves_graph_unchanged() {
        let data = RdfGraph::parse_turtle(
            "@prefix ex: <http://example.org/mfg#> . ex:A a ex:B .",
        )
        .unwrap();
        let entailed = Hierarchy::from_graphs(&[&data]).entail(&data);
        assert_eq!(entailed.len(), 1);
    }
}
