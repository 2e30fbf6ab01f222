//! Core domain types exchanged between the ingestion engine and its callers.
//!
//! Resources are identified by their `uri`; triples carry no identity beyond
//! the (subject, predicate, object) key of the relationship they describe.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

// ── Triples ───────────────────────────────────────────────────────

/// A logical (subject, predicate, object) fact between two resources.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Triple {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.subject, self.predicate, self.object)
    }
}

/// A triple read back from the store, with display labels for both endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TripleRecord {
    pub subject: String,
    pub predicate: String,
    pub object: String,
    pub subject_label: Option<String>,
    pub object_label: Option<String>,
}

impl TripleRecord {
    pub fn triple(&self) -> Triple {
        Triple::new(&self.subject, &self.predicate, &self.object)
    }
}

/// Conjunctive filter for triple lookups. An absent field matches everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TripleFilter {
    pub subject: Option<String>,
    pub predicate: Option<String>,
    pub object: Option<String>,
}

impl TripleFilter {
    pub fn subject(mut self, uri: impl Into<String>) -> Self {
        self.subject = Some(uri.into());
        self
    }

    pub fn predicate(mut self, name: impl Into<String>) -> Self {
        self.predicate = Some(name.into());
        self
    }

    pub fn object(mut self, uri: impl Into<String>) -> Self {
        self.object = Some(uri.into());
        self
    }

    /// Treat empty strings as absent filters.
    pub fn normalized(self) -> Self {
        fn keep(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.trim().is_empty())
        }
        Self {
            subject: keep(self.subject),
            predicate: keep(self.predicate),
            object: keep(self.object),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.subject.is_none() && self.predicate.is_none() && self.object.is_none()
    }

    /// True if the given triple satisfies every supplied filter.
    pub fn matches(&self, triple: &Triple) -> bool {
        self.subject.as_deref().map_or(true, |s| s == triple.subject)
            && self.predicate.as_deref().map_or(true, |p| p == triple.predicate)
            && self.object.as_deref().map_or(true, |o| o == triple.object)
    }
}

// ── Bulk Operations ───────────────────────────────────────────────

/// An ordered batch of additions followed by deletions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkTripleOperation {
    #[serde(default)]
    pub add: Vec<Triple>,
    #[serde(default)]
    pub delete: Vec<Triple>,
}

/// Which half of a bulk batch an item belonged to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BulkItemKind {
    Add,
    Delete,
}

/// One failed bulk item. Carried in the result, never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkItemError {
    pub kind: BulkItemKind,
    pub triple: Triple,
    pub message: String,
}

impl fmt::Display for BulkItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            BulkItemKind::Add => "Add error",
            BulkItemKind::Delete => "Delete error",
        };
        write!(f, "{tag}: {} {}", self.triple, self.message)
    }
}

/// Aggregate outcome of a bulk operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkOperationResult {
    pub added: u64,
    pub deleted: u64,
    #[serde(serialize_with = "errors_as_strings")]
    pub errors: Vec<BulkItemError>,
}

impl BulkOperationResult {
    pub fn add_errors(&self) -> impl Iterator<Item = &BulkItemError> {
        self.errors.iter().filter(|e| e.kind == BulkItemKind::Add)
    }

    pub fn delete_errors(&self) -> impl Iterator<Item = &BulkItemError> {
        self.errors.iter().filter(|e| e.kind == BulkItemKind::Delete)
    }
}

fn errors_as_strings<S: Serializer>(errors: &[BulkItemError], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(errors.iter().map(ToString::to_string))
}

// ── Import ────────────────────────────────────────────────────────

/// Result of the validate-then-import ingestion gate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub triples_loaded: u64,
    pub validation_conforms: bool,
    pub report: Option<String>,
}

impl ImportResult {
    /// A rejected document: nothing was written.
    pub fn rejected(report: String) -> Self {
        Self {
            triples_loaded: 0,
            validation_conforms: false,
            report: Some(report),
        }
    }

    pub fn loaded(triples_loaded: u64) -> Self {
        Self {
            triples_loaded,
            validation_conforms: true,
            report: None,
        }
    }
}

/// Store-level outcome of one native RDF import.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportSummary {
    pub termination_status: String,
    pub triples_loaded: u64,
}

// ── Resources ─────────────────────────────────────────────────────

/// A scalar property value stored on a resource node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// Direction of a link created together with a new resource.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LinkDirection {
    /// new resource -[predicate]-> other
    Outgoing,
    /// other -[predicate]-> new resource
    Incoming,
}

/// A relationship to an existing resource, written in the same unit of work
/// as the resource itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    pub predicate: String,
    pub other: String,
    pub direction: LinkDirection,
}

/// A resource node to create.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewResource {
    pub uri: String,
    /// Type labels in addition to `Resource`.
    pub labels: Vec<String>,
    pub properties: BTreeMap<String, PropertyValue>,
}

impl NewResource {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            labels: Vec::new(),
            properties: BTreeMap::new(),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

// ── Manufacturing Inputs ──────────────────────────────────────────

/// A work order to register in the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    pub work_order_number: String,
    pub planned_quantity: i64,
    #[serde(default)]
    pub actual_quantity: i64,
    pub status: String,
    #[serde(default, rename = "equipment_id")]
    pub equipment_id: Option<String>,
}

/// A quality-control measurement for a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityRecord {
    #[serde(rename = "product_id")]
    pub product_id: String,
    pub quality_result: String,
    pub timestamp: DateTime<Utc>,
}
