//! The domain-level seam between the ingestion engine and a graph backend.

use async_trait::async_trait;

use ontomill_core::{
    ImportSummary, Link, NewResource, Triple, TripleFilter, TripleRecord, VocabularyPolicy,
};

use crate::client::{GraphClient, StoreError};

/// Outcome of a resource creation with an optional link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceOutcome {
    Created,
    /// The link target did not exist; nothing was written.
    LinkTargetMissing,
}

/// What a node deletion removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeRemoval {
    pub nodes: u64,
    pub relationships: u64,
}

/// Operations every triple store backend provides.
///
/// Each call is its own unit of work; only `create_resource` spans two
/// writes, and those commit together.
#[async_trait]
pub trait TripleStore: Send + Sync {
    /// Import an RDF document (Turtle) with merge-on-uri semantics.
    async fn import_turtle(&self, turtle: &str) -> Result<ImportSummary, StoreError>;

    /// Create one relationship; returns how many were created (0 when an
    /// endpoint is missing).
    async fn create_triple(&self, triple: &Triple) -> Result<u64, StoreError>;

    async fn find_triples(&self, filter: &TripleFilter) -> Result<Vec<TripleRecord>, StoreError>;

    /// Delete matching relationships; returns how many were removed.
    async fn delete_triple(&self, triple: &Triple) -> Result<u64, StoreError>;

    /// Delete a resource and all incident relationships.
    async fn delete_node(&self, uri: &str) -> Result<NodeRemoval, StoreError>;

    async fn create_resource(
        &self,
        resource: &NewResource,
        link: Option<&Link>,
    ) -> Result<ResourceOutcome, StoreError>;

    async fn vocabulary_configured(&self) -> Result<bool, StoreError>;

    async fn init_vocabulary(&self, policy: &VocabularyPolicy) -> Result<(), StoreError>;

    async fn ensure_uri_constraint(&self) -> Result<(), StoreError>;
}

#[async_trait]
impl TripleStore for GraphClient {
    async fn import_turtle(&self, turtle: &str) -> Result<ImportSummary, StoreError> {
        GraphClient::import_turtle(self, turtle).await
    }

    async fn create_triple(&self, triple: &Triple) -> Result<u64, StoreError> {
        GraphClient::create_triple(self, triple).await
    }

    async fn find_triples(&self, filter: &TripleFilter) -> Result<Vec<TripleRecord>, StoreError> {
        GraphClient::find_triples(self, filter).await
    }

    async fn delete_triple(&self, triple: &Triple) -> Result<u64, StoreError> {
        GraphClient::delete_triple(self, triple).await
    }

    async fn delete_node(&self, uri: &str) -> Result<NodeRemoval, StoreError> {
        GraphClient::delete_node(self, uri).await
    }

    async fn create_resource(
        &self,
        resource: &NewResource,
        link: Option<&Link>,
    ) -> Result<ResourceOutcome, StoreError> {
        GraphClient::create_resource(self, resource, link).await
    }

    async fn vocabulary_configured(&self) -> Result<bool, StoreError> {
        GraphClient::vocabulary_configured(self).await
    }

    async fn init_vocabulary(&self, policy: &VocabularyPolicy) -> Result<(), StoreError> {
        GraphClient::init_vocabulary(self, policy).await
    }

    async fn ensure_uri_constraint(&self) -> Result<(), StoreError> {
        GraphClient::ensure_uri_constraint(self).await
    }
}
