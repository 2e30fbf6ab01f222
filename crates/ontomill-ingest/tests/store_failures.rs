//! Mutation and bootstrap behavior when the store itself misbehaves.

use async_trait::async_trait;

use ontomill_core::{
    Catalog, ImportSummary, Link, NewResource, Triple, TripleFilter, TripleRecord,
    VocabularyPolicy,
};
use ontomill_graph::{MemoryStore, NodeRemoval, ResourceOutcome, StoreError, TripleStore};
use ontomill_ingest::config::OntologyConfig;
use ontomill_ingest::{BootstrapLoader, MutationError, TripleMutator, VocabularyStatus};

/// Failure injected into a [`FaultyStore`].
#[derive(Clone, Copy)]
enum Fault {
    /// Relationship writes fail with the given store error kind.
    Writes(fn(String) -> StoreError),
    /// The vocabulary lookup fails; everything else works.
    VocabularyLookup,
    /// Both the vocabulary lookup and its initialization fail.
    VocabularyDown,
}

/// A `MemoryStore` with one injected failure.
struct FaultyStore {
    inner: MemoryStore,
    fault: Fault,
}

impl FaultyStore {
    fn new(inner: MemoryStore, fault: Fault) -> Self {
        Self { inner, fault }
    }
}

#[async_trait]
impl TripleStore for FaultyStore {
    async fn import_turtle(&self, turtle: &str) -> Result<ImportSummary, StoreError> {
        self.inner.import_turtle(turtle).await
    }

    async fn create_triple(&self, triple: &Triple) -> Result<u64, StoreError> {
        match self.fault {
            Fault::Writes(kind) => Err(kind(format!("write of {triple} failed"))),
            _ => self.inner.create_triple(triple).await,
        }
    }

    async fn find_triples(&self, filter: &TripleFilter) -> Result<Vec<TripleRecord>, StoreError> {
        self.inner.find_triples(filter).await
    }

    async fn delete_triple(&self, triple: &Triple) -> Result<u64, StoreError> {
        self.inner.delete_triple(triple).await
    }

    async fn delete_node(&self, uri: &str) -> Result<NodeRemoval, StoreError> {
        self.inner.delete_node(uri).await
    }

    async fn create_resource(
        &self,
        resource: &NewResource,
        link: Option<&Link>,
    ) -> Result<ResourceOutcome, StoreError> {
        self.inner.create_resource(resource, link).await
    }

    async fn vocabulary_configured(&self) -> Result<bool, StoreError> {
        match self.fault {
            Fault::VocabularyLookup | Fault::VocabularyDown => Err(StoreError::Query(
                "There is no procedure with the name `n10s.graphconfig.show`".to_string(),
            )),
            Fault::Writes(_) => self.inner.vocabulary_configured().await,
        }
    }

    async fn init_vocabulary(&self, policy: &VocabularyPolicy) -> Result<(), StoreError> {
        match self.fault {
            Fault::VocabularyDown => Err(StoreError::Query(
                "There is no procedure with the name `n10s.graphconfig.init`".to_string(),
            )),
            _ => self.inner.init_vocabulary(policy).await,
        }
    }

    async fn ensure_uri_constraint(&self) -> Result<(), StoreError> {
        self.inner.ensure_uri_constraint().await
    }
}

async fn mutator_with(fault: Fault) -> TripleMutator<FaultyStore> {
    let inner = MemoryStore::configured();
    for uri in ["ex:WO_1", "ex:EQ001"] {
        inner
            .create_resource(&NewResource::new(uri), None)
            .await
            .unwrap();
    }
    TripleMutator::new(FaultyStore::new(inner, fault), Catalog::default())
}

#[tokio::test]
async fn test_transient_failure_stays_retryable() {
    let m = mutator_with(Fault::Writes(StoreError::Transient)).await;
    let err = m
        .create_triple(&Triple::new("ex:WO_1", "executedBy", "ex:EQ001"))
        .await
        .unwrap_err();

    assert!(matches!(err, MutationError::Store(StoreError::Transient(_))), "{err}");
    assert!(err.is_retryable());
    assert_eq!(err.status_class(), 503);
}

#[tokio::test]
async fn test_auth_failure_is_distinguishable() {
    let m = mutator_with(Fault::Writes(StoreError::AuthFailed)).await;
    let err = m
        .create_triple(&Triple::new("ex:WO_1", "executedBy", "ex:EQ001"))
        .await
        .unwrap_err();

    assert!(matches!(err, MutationError::Store(StoreError::AuthFailed(_))), "{err}");
    assert_eq!(err.status_class(), 401);
}

#[tokio::test]
async fn test_rejected_query_keeps_store_error_as_source() {
    let m = mutator_with(Fault::Writes(StoreError::Query)).await;
    let err = m
        .create_triple(&Triple::new("ex:WO_1", "executedBy", "ex:EQ001"))
        .await
        .unwrap_err();

    match &err {
        MutationError::TripleCreate { source, .. } => {
            assert!(matches!(source, Some(StoreError::Query(_))));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(std::error::Error::source(&err).is_some());
    assert_eq!(err.status_class(), 400);
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_bulk_records_transient_failures_per_item() {
    let m = mutator_with(Fault::Writes(StoreError::Transient)).await;
    let op = ontomill_core::BulkTripleOperation {
        add: vec![Triple::new("ex:WO_1", "executedBy", "ex:EQ001")],
        delete: vec![],
    };
    let result = m.bulk_apply(&op).await;
    assert_eq!(result.added, 0);
    assert_eq!(result.errors.len(), 1);
    let message = &result.errors[0].message;
    assert!(message.contains("transient"), "{message}");
}

#[tokio::test]
async fn test_vocabulary_lookup_failure_still_initializes() {
    let inner = MemoryStore::new();
    let store = FaultyStore::new(inner.clone(), Fault::VocabularyLookup);
    let loader = BootstrapLoader::new(store, OntologyConfig::default());

    assert_eq!(
        loader.ensure_vocabulary_config().await,
        VocabularyStatus::Initialized
    );
    assert!(inner.vocabulary_configured().await.unwrap());
}

#[tokio::test]
async fn test_vocabulary_lookup_failure_on_non_empty_graph_skips() {
    let inner = MemoryStore::new();
    inner
        .create_resource(&NewResource::new("ex:Existing"), None)
        .await
        .unwrap();
    let store = FaultyStore::new(inner, Fault::VocabularyLookup);
    let loader = BootstrapLoader::new(store, OntologyConfig::default());

    assert_eq!(
        loader.ensure_vocabulary_config().await,
        VocabularyStatus::SkippedNonEmpty
    );
}

#[tokio::test]
async fn test_vocabulary_lookup_and_init_failures_are_both_reported() {
    let store = FaultyStore::new(MemoryStore::new(), Fault::VocabularyDown);
    let loader = BootstrapLoader::new(store, OntologyConfig::default());

    match loader.ensure_vocabulary_config().await {
        VocabularyStatus::Failed(message) => {
            assert!(message.contains("graphconfig.init"), "{message}");
            assert!(message.contains("graphconfig.show"), "{message}");
        }
        other => panic!("unexpected status: {other:?}"),
    }
}
