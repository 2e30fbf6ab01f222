//! Process-local triple store.
//!
//! Mirrors the behavior of the Neo4j backend (n10s import mapping, `uri`
//! uniqueness, APOC relationship creation) without a server. Used for dry
//! runs of the ingestion gate and for tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use ontomill_core::rdf::ns;
use ontomill_core::{
    ImportSummary, Link, LinkDirection, Literal, NewResource, PropertyValue, RdfGraph, Shortener,
    Term, Triple, TripleFilter, TripleRecord, VocabularyPolicy,
};

use crate::client::StoreError;
use crate::store::{NodeRemoval, ResourceOutcome, TripleStore};

const RESOURCE_LABEL: &str = "Resource";

#[derive(Debug, Clone, Default)]
struct MemoryNode {
    labels: BTreeSet<String>,
    properties: BTreeMap<String, PropertyValue>,
}

impl MemoryNode {
    fn display_label(&self) -> Option<String> {
        ["rdfs__label", "name"]
            .iter()
            .find_map(|key| match self.properties.get(*key) {
                Some(PropertyValue::Text(s)) => Some(s.clone()),
                _ => None,
            })
    }
}

#[derive(Debug, Default)]
struct State {
    nodes: BTreeMap<String, MemoryNode>,
    /// Relationships in creation order. Duplicates are allowed, as with
    /// `apoc.create.relationship`.
    relationships: Vec<Triple>,
    policy: Option<VocabularyPolicy>,
    /// Prefix map shared by every import, like the n10s namespace table
    shortener: Option<Shortener>,
    uri_constraint: bool,
}

impl State {
    fn ensure_node(&mut self, uri: &str) -> &mut MemoryNode {
        self.nodes.entry(uri.to_string()).or_insert_with(|| {
            let mut node = MemoryNode::default();
            node.labels.insert(RESOURCE_LABEL.to_string());
            node
        })
    }

    fn merge_relationship(&mut self, triple: Triple) {
        if !self.relationships.contains(&triple) {
            self.relationships.push(triple);
        }
    }

    fn record(&self, triple: &Triple) -> TripleRecord {
        let label = |uri: &str| self.nodes.get(uri).and_then(MemoryNode::display_label);
        TripleRecord {
            subject: triple.subject.clone(),
            predicate: triple.predicate.clone(),
            object: triple.object.clone(),
            subject_label: label(&triple.subject),
            object_label: label(&triple.object),
        }
    }
}

/// In-memory `TripleStore`. Clone is cheap and clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    /// An empty, unconfigured store.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty store with the default vocabulary policy and the uri
    /// constraint already in place.
    pub fn configured() -> Self {
        let state = State {
            policy: Some(VocabularyPolicy::default()),
            uri_constraint: true,
            ..State::default()
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    pub async fn node_count(&self) -> usize {
        self.state.read().await.nodes.len()
    }

    pub async fn relationship_count(&self) -> usize {
        self.state.read().await.relationships.len()
    }

    pub async fn has_node(&self, uri: &str) -> bool {
        self.state.read().await.nodes.contains_key(uri)
    }

    pub async fn labels(&self, uri: &str) -> Vec<String> {
        self.state
            .read()
            .await
            .nodes
            .get(uri)
            .map(|n| n.labels.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub async fn property(&self, uri: &str, key: &str) -> Option<PropertyValue> {
        self.state
            .read()
            .await
            .nodes
            .get(uri)
            .and_then(|n| n.properties.get(key).cloned())
    }

    pub async fn has_uri_constraint(&self) -> bool {
        self.state.read().await.uri_constraint
    }
}

fn node_uri(term: &Term) -> Option<String> {
    match term {
        Term::Iri(iri) => Some(iri.clone()),
        Term::Blank(id) => Some(format!("bnode://{id}")),
        Term::Literal(_) => None,
    }
}

fn literal_value(literal: &Literal, keep_lang_tag: bool) -> PropertyValue {
    let parsed = match literal.datatype.as_str() {
        ns::XSD_BOOLEAN => literal.value.parse::<bool>().ok().map(PropertyValue::Bool),
        dt if dt == ns::XSD_INTEGER || dt.ends_with("#int") || dt.ends_with("#long") => {
            literal.value.parse::<i64>().ok().map(PropertyValue::Int)
        }
        dt if dt.ends_with("#decimal") || dt.ends_with("#double") || dt.ends_with("#float") => {
            literal.value.parse::<f64>().ok().map(PropertyValue::Float)
        }
        _ => None,
    };
    parsed.unwrap_or_else(|| match (&literal.language, keep_lang_tag) {
        (Some(lang), true) => PropertyValue::Text(format!("{}@{lang}", literal.value)),
        _ => PropertyValue::Text(literal.value.clone()),
    })
}

#[async_trait]
impl TripleStore for MemoryStore {
    async fn import_turtle(&self, turtle: &str) -> Result<ImportSummary, StoreError> {
        let graph = RdfGraph::parse_turtle(turtle)
            .map_err(|e| StoreError::Query(format!("RDF parse error: {e}")))?;

        let mut state = self.state.write().await;
        let Some(policy) = state.policy.clone() else {
            return Err(StoreError::Query(
                "A Graph Config is required for RDF importing".to_string(),
            ));
        };

        let mut shortener = state
            .shortener
            .take()
            .unwrap_or_else(|| Shortener::new(policy.handle_vocab_uris));
        shortener.declare(graph.prefixes());

        for st in graph.statements() {
            let Some(subject) = node_uri(&st.subject) else {
                continue;
            };
            state.ensure_node(&subject);

            match &st.object {
                Term::Iri(class) if st.predicate == ns::RDF_TYPE && policy.types_to_labels => {
                    let label = shortener.shorten(class);
                    state.ensure_node(&subject).labels.insert(label);
                }
                Term::Literal(literal) => {
                    let key = shortener.shorten(&st.predicate);
                    let value = literal_value(literal, policy.keep_lang_tag);
                    state.ensure_node(&subject).properties.insert(key, value);
                }
                object => {
                    if let Some(object) = node_uri(object) {
                        state.ensure_node(&object);
                        let predicate = shortener.shorten(&st.predicate);
                        state.merge_relationship(Triple::new(subject, predicate, object));
                    }
                }
            }
        }

        state.shortener = Some(shortener);
        Ok(ImportSummary {
            termination_status: "OK".to_string(),
            triples_loaded: graph.len() as u64,
        })
    }

    async fn create_triple(&self, triple: &Triple) -> Result<u64, StoreError> {
        if triple.predicate.is_empty() {
            return Err(StoreError::Query(
                "Failed to invoke procedure `apoc.create.relationship`: empty relationship type"
                    .to_string(),
            ));
        }
        let mut state = self.state.write().await;
        if !state.nodes.contains_key(&triple.subject) || !state.nodes.contains_key(&triple.object)
        {
            return Ok(0);
        }
        state.relationships.push(triple.clone());
        Ok(1)
    }

    async fn find_triples(&self, filter: &TripleFilter) -> Result<Vec<TripleRecord>, StoreError> {
        let filter = filter.clone().normalized();
        let state = self.state.read().await;
        let mut records: Vec<TripleRecord> = state
            .relationships
            .iter()
            .filter(|t| filter.matches(t))
            .map(|t| state.record(t))
            .collect();
        records.sort_by(|a, b| {
            (&a.subject, &a.predicate, &a.object).cmp(&(&b.subject, &b.predicate, &b.object))
        });
        Ok(records)
    }

    async fn delete_triple(&self, triple: &Triple) -> Result<u64, StoreError> {
        let mut state = self.state.write().await;
        let before = state.relationships.len();
        state.relationships.retain(|t| t != triple);
        Ok((before - state.relationships.len()) as u64)
    }

    async fn delete_node(&self, uri: &str) -> Result<NodeRemoval, StoreError> {
        let mut state = self.state.write().await;
        if state.nodes.remove(uri).is_none() {
            return Ok(NodeRemoval::default());
        }
        let before = state.relationships.len();
        state
            .relationships
            .retain(|t| t.subject != uri && t.object != uri);
        Ok(NodeRemoval {
            nodes: 1,
            relationships: (before - state.relationships.len()) as u64,
        })
    }

    async fn create_resource(
        &self,
        resource: &NewResource,
        link: Option<&Link>,
    ) -> Result<ResourceOutcome, StoreError> {
        let mut state = self.state.write().await;
        if state.nodes.contains_key(&resource.uri) {
            return Err(StoreError::Query(format!(
                "Node already exists with label `Resource` and property `uri` = '{}'",
                resource.uri
            )));
        }
        if let Some(link) = link {
            if !state.nodes.contains_key(&link.other) {
                return Ok(ResourceOutcome::LinkTargetMissing);
            }
        }

        let node = state.ensure_node(&resource.uri);
        node.labels.extend(resource.labels.iter().cloned());
        node.properties.extend(resource.properties.clone());

        if let Some(link) = link {
            let triple = match link.direction {
                LinkDirection::Outgoing => Triple::new(&resource.uri, &link.predicate, &link.other),
                LinkDirection::Incoming => Triple::new(&link.other, &link.predicate, &resource.uri),
            };
            state.relationships.push(triple);
        }
        Ok(ResourceOutcome::Created)
    }

    async fn vocabulary_configured(&self) -> Result<bool, StoreError> {
        Ok(self.state.read().await.policy.is_some())
    }

    async fn init_vocabulary(&self, policy: &VocabularyPolicy) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if !state.nodes.is_empty() {
            return Err(StoreError::Query(
                "The graph is non-empty. Remove all nodes before initialising the graph config"
                    .to_string(),
            ));
        }
        state.policy = Some(policy.clone());
        state.shortener = None;
        Ok(())
    }

    async fn ensure_uri_constraint(&self) -> Result<(), StoreError> {
        self.state.write().await.uri_constraint = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EQUIPMENT: &str = r#"
        @prefix ex: <http://example.org/mfg#> .
        @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

        ex:EQ001 a ex:Equipment ;
            rdfs:label "Press 1"@en ;
            ex:capacity 120 ;
            ex:locatedIn ex:LineA .
        ex:LineA a ex:Line .
    "#;

    #[tokio::test]
    async fn test_import_requires_graph_config() {
        let store = MemoryStore::new();
        let err = store.import_turtle(EQUIPMENT).await.unwrap_err();
        assert!(err.to_string().contains("Graph Config"));
    }

    #[tokio::test]
    async fn test_import_maps_types_literals_and_links() {
        let store = MemoryStore::configured();
        let summary = store.import_turtle(EQUIPMENT).await.unwrap();
        assert_eq!(summary.termination_status, "OK");
        assert_eq!(summary.triples_loaded, 5);

        let eq = "http://example.org/mfg#EQ001";
        let labels = store.labels(eq).await;
        assert!(labels.contains(&"Resource".to_string()));
        assert!(labels.contains(&"ex__Equipment".to_string()));
        assert_eq!(
            store.property(eq, "rdfs__label").await,
            Some(PropertyValue::Text("Press 1".into()))
        );
        assert_eq!(
            store.property(eq, "ex__capacity").await,
            Some(PropertyValue::Int(120))
        );

        let rows = store
            .find_triples(&TripleFilter::default().predicate("ex__locatedIn"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].subject_label.as_deref(), Some("Press 1"));
    }

    #[tokio::test]
    async fn test_reimport_does_not_duplicate_relationships() {
        let store = MemoryStore::configured();
        store.import_turtle(EQUIPMENT).await.unwrap();
        let nodes = store.node_count().await;
        let rels = store.relationship_count().await;

        store.import_turtle(EQUIPMENT).await.unwrap();
        assert_eq!(store.node_count().await, nodes);
        assert_eq!(store.relationship_count().await, rels);
    }

    #[tokio::test]
    async fn test_generated_prefixes_are_stable_across_imports() {
        let store = MemoryStore::configured();
        store
            .import_turtle("<http://other.org/a/A> <http://other.org/a/partOf> <http://other.org/a/B> .")
            .await
            .unwrap();
        store
            .import_turtle(
                "<http://third.org/x#C> <http://third.org/x#feeds> <http://other.org/a/A> .
                 <http://other.org/a/B> <http://other.org/a/partOf> <http://third.org/x#C> .",
            )
            .await
            .unwrap();

        let part_of = store
            .find_triples(&TripleFilter::default().predicate("ns0__partOf"))
            .await
            .unwrap();
        assert_eq!(part_of.len(), 2);
        let feeds = store
            .find_triples(&TripleFilter::default().predicate("ns1__feeds"))
            .await
            .unwrap();
        assert_eq!(feeds.len(), 1);
    }

    #[tokio::test]
    async fn test_init_vocabulary_rejects_non_empty_graph() {
        let store = MemoryStore::configured();
        store.import_turtle(EQUIPMENT).await.unwrap();
        let err = store
            .init_vocabulary(&VocabularyPolicy::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[tokio::test]
    async fn test_create_resource_with_missing_link_writes_nothing() {
        let store = MemoryStore::configured();
        let link = Link {
            predicate: "executedBy".into(),
            other: "ex:EQ404".into(),
            direction: LinkDirection::Outgoing,
        };
        let outcome = store
            .create_resource(&NewResource::new("ex:WO_1"), Some(&link))
            .await
            .unwrap();
        assert_eq!(outcome, ResourceOutcome::LinkTargetMissing);
        assert!(!store.has_node("ex:WO_1").await);
    }

    #[tokio::test]
    async fn test_duplicate_resource_violates_uri_uniqueness() {
        let store = MemoryStore::configured();
        store
            .create_resource(&NewResource::new("ex:WO_1"), None)
            .await
            .unwrap();
        let err = store
            .create_resource(&NewResource::new("ex:WO_1"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Query(_)));
    }

    #[tokio::test]
    async fn test_blank_nodes_get_bnode_uris() {
        let store = MemoryStore::configured();
        store
            .import_turtle("@prefix ex: <http://example.org/mfg#> . ex:P1 ex:spec [ ex:max 5 ] .")
            .await
            .unwrap();
        let rows = store
            .find_triples(&TripleFilter::default().subject("http://example.org/mfg#P1"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].object.starts_with("bnode://"));
    }
}
