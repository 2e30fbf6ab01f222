//! Neo4j connection management and shared graph client.

use std::future::Future;
use std::sync::Arc;

use neo4rs::{query, ConfigBuilder, Graph, Query};
use serde::Deserialize;
use tokio::sync::Mutex;

/// Errors from graph store operations.
///
/// The variants are the failure classes callers branch on; the driver's own
/// error is flattened into the message.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Neo4j service unavailable: {0}")]
    Unavailable(String),

    #[error("Neo4j authentication failed: {0}")]
    AuthFailed(String),

    #[error("Neo4j transient error: {0}")]
    Transient(String),

    #[error("Neo4j query error: {0}")]
    Query(String),

    #[error("Neo4j driver is not initialized: {0}")]
    NotInitialized(String),

    #[error("Unexpected row shape: {0}")]
    Mapping(String),
}

impl StoreError {
    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable(_) | Self::AuthFailed(_) | Self::Transient(_) | Self::NotInitialized(_)
        )
    }

    /// HTTP-style status class for this failure.
    pub fn status_class(&self) -> u16 {
        match self {
            Self::Unavailable(_) | Self::Transient(_) | Self::NotInitialized(_) => 503,
            Self::AuthFailed(_) => 401,
            Self::Query(_) => 400,
            Self::Mapping(_) => 500,
        }
    }
}

impl From<neo4rs::Error> for StoreError {
    fn from(e: neo4rs::Error) -> Self {
        match e {
            neo4rs::Error::IOError { .. } | neo4rs::Error::ConnectionError => {
                Self::Unavailable(e.to_string())
            }
            neo4rs::Error::AuthenticationError(msg) => Self::AuthFailed(msg),
            other => classify_message(other.to_string()),
        }
    }
}

/// Classify a server-reported failure by its Neo4j status code.
fn classify_message(msg: String) -> StoreError {
    if msg.contains("Neo.ClientError.Security.Unauthorized")
        || msg.contains("Neo.ClientError.Security.AuthenticationRateLimit")
    {
        StoreError::AuthFailed(msg)
    } else if msg.contains("Neo.TransientError") {
        StoreError::Transient(msg)
    } else if msg.contains("ServiceUnavailable") || msg.contains("Connection refused") {
        StoreError::Unavailable(msg)
    } else {
        StoreError::Query(msg)
    }
}

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub fetch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://127.0.0.1:7687".to_string(),
            user: "neo4j".to_string(),
            password: "passwd".to_string(),
            max_connections: 16,
            fetch_size: 256,
        }
    }
}

/// A store handle that is opened on demand, dropped once the store is seen to
/// be unreachable, and reopened by the next caller.
struct LazyHandle<T> {
    slot: Mutex<Option<T>>,
}

impl<T: Clone> LazyHandle<T> {
    fn new(initial: Option<T>) -> Self {
        Self {
            slot: Mutex::new(initial),
        }
    }

    async fn is_set(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    /// The held handle, or the result of one `open` attempt if none is held.
    /// Concurrent callers wait on the same lock and share the outcome.
    async fn get_or_open<F, Fut>(&self, open: F) -> Result<T, StoreError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(handle) = slot.as_ref() {
            return Ok(handle.clone());
        }
        let handle = open().await?;
        *slot = Some(handle.clone());
        Ok(handle)
    }

    /// Drop the handle when `err` says the store is unreachable.
    async fn observe(&self, err: StoreError) -> StoreError {
        if matches!(err, StoreError::Unavailable(_)) {
            tracing::warn!(error = %err, "Dropping Neo4j handle");
            *self.slot.lock().await = None;
        }
        err
    }
}

struct Inner {
    config: GraphConfig,
    graph: LazyHandle<Graph>,
}

/// Thread-safe Neo4j graph client with connection pooling and lazy
/// reconnection.
///
/// This is the single point of access for all knowledge graph operations.
/// Clone is cheap (inner Arc). The pool handle is established at most once
/// at a time: concurrent callers wait on the same mutex and observe the
/// same handle.
#[derive(Clone)]
pub struct GraphClient {
    inner: Arc<Inner>,
}

impl GraphClient {
    /// Create a client and attempt one connection.
    ///
    /// A failed attempt is logged and leaves the handle unset; the next call
    /// through [`ensure_connected`](Self::ensure_connected) retries once.
    pub async fn connect(config: &GraphConfig) -> Self {
        let handle = match open(config).await {
            Ok(graph) => {
                tracing::info!(uri = %config.uri, "Connected to Neo4j");
                Some(graph)
            }
            Err(e) => {
                tracing::warn!(uri = %config.uri, error = %e, "Neo4j connection failed");
                None
            }
        };
        Self::with_handle(config, handle)
    }

    /// Create a client, failing if the store cannot be reached now.
    pub async fn connect_strict(config: &GraphConfig) -> Result<Self, StoreError> {
        let graph = open(config).await?;
        tracing::info!(uri = %config.uri, "Connected to Neo4j");
        Ok(Self::with_handle(config, Some(graph)))
    }

    fn with_handle(config: &GraphConfig, handle: Option<Graph>) -> Self {
        Self {
            inner: Arc::new(Inner {
                config: config.clone(),
                graph: LazyHandle::new(handle),
            }),
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.inner.config
    }

    /// Whether a pool handle is currently held.
    pub async fn is_connected(&self) -> bool {
        self.inner.graph.is_set().await
    }

    /// Return the live handle, attempting exactly one reconnection if none
    /// is held.
    pub async fn ensure_connected(&self) -> Result<Graph, StoreError> {
        let config = &self.inner.config;
        self.inner
            .graph
            .get_or_open(|| async move {
                match open(config).await {
                    Ok(graph) => {
                        tracing::info!(uri = %config.uri, "Reconnected to Neo4j");
                        Ok(graph)
                    }
                    Err(e) => {
                        tracing::error!(uri = %config.uri, error = %e, "Neo4j reconnection failed");
                        Err(StoreError::NotInitialized(e.to_string()))
                    }
                }
            })
            .await
    }

    /// Drop the handle after the store became unreachable so the next call
    /// reconnects.
    async fn observe(&self, err: StoreError) -> StoreError {
        self.inner.graph.observe(err).await
    }

    /// Execute a write-only query (CREATE, MERGE, DELETE, SET).
    pub async fn run(&self, query: Query) -> Result<(), StoreError> {
        let graph = self.ensure_connected().await?;
        match graph.run(query).await {
            Ok(()) => Ok(()),
            Err(e) => Err(self.observe(e.into()).await),
        }
    }

    /// Execute a query and collect all rows.
    pub async fn query_rows(&self, query: Query) -> Result<Vec<neo4rs::Row>, StoreError> {
        let graph = self.ensure_connected().await?;
        match collect_rows(&graph, query).await {
            Ok(rows) => Ok(rows),
            Err(e) => Err(self.observe(e.into()).await),
        }
    }

    /// Execute a query and return the first row, if any.
    pub async fn query_one(&self, query: Query) -> Result<Option<neo4rs::Row>, StoreError> {
        Ok(self.query_rows(query).await?.into_iter().next())
    }

    /// Begin a transaction.
    pub async fn start_txn(&self) -> Result<neo4rs::Txn, StoreError> {
        let graph = self.ensure_connected().await?;
        match graph.start_txn().await {
            Ok(txn) => Ok(txn),
            Err(e) => Err(self.observe(e.into()).await),
        }
    }
}

async fn open(config: &GraphConfig) -> Result<Graph, StoreError> {
    let neo_config = ConfigBuilder::default()
        .uri(&config.uri)
        .user(&config.user)
        .password(&config.password)
        .max_connections(config.max_connections as usize)
        .fetch_size(config.fetch_size)
        .build()
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;

    let graph = Graph::connect(neo_config).await?;
    graph.run(query("RETURN 1")).await?;
    Ok(graph)
}

async fn collect_rows(graph: &Graph, query: Query) -> Result<Vec<neo4rs::Row>, neo4rs::Error> {
    let mut stream = graph.execute(query).await?;
    let mut rows = Vec::new();
    while let Some(row) = stream.next().await? {
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_classify_server_codes() {
        assert!(matches!(
            classify_message("Neo.TransientError.Transaction.DeadlockDetected".into()),
            StoreError::Transient(_)
        ));
        assert!(matches!(
            classify_message("Neo.ClientError.Security.Unauthorized: bad creds".into()),
            StoreError::AuthFailed(_)
        ));
        assert!(matches!(
            classify_message("Neo.ClientError.Schema.ConstraintValidationFailed".into()),
            StoreError::Query(_)
        ));
        assert!(matches!(
            classify_message("Connection refused (os error 111)".into()),
            StoreError::Unavailable(_)
        ));
    }

    #[test]
    fn test_status_classes() {
        assert_eq!(StoreError::Unavailable(String::new()).status_class(), 503);
        assert_eq!(StoreError::AuthFailed(String::new()).status_class(), 401);
        assert_eq!(StoreError::Transient(String::new()).status_class(), 503);
        assert_eq!(StoreError::Query(String::new()).status_class(), 400);
        assert_eq!(StoreError::NotInitialized(String::new()).status_class(), 503);
        assert!(!StoreError::Query(String::new()).is_retryable());
        assert!(StoreError::Transient(String::new()).is_retryable());
    }

    #[test]
    fn test_default_config() {
        let config = GraphConfig::default();
        assert_eq!(config.uri, "bolt://127.0.0.1:7687");
        assert_eq!(config.max_connections, 16);
    }

    #[tokio::test]
    async fn test_handle_reopens_after_store_becomes_unreachable() {
        let opened = AtomicUsize::new(0);
        let counter = &opened;
        let open = move || async move {
            Ok::<_, StoreError>(counter.fetch_add(1, Ordering::SeqCst))
        };

        let handle = LazyHandle::new(None);
        assert!(!handle.is_set().await);
        assert_eq!(handle.get_or_open(open).await.unwrap(), 0);
        assert_eq!(handle.get_or_open(open).await.unwrap(), 0);

        // Query failures keep the handle.
        handle.observe(StoreError::Query("syntax".into())).await;
        assert!(handle.is_set().await);

        let err = handle.observe(StoreError::Unavailable("reset".into())).await;
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(!handle.is_set().await);

        assert_eq!(handle.get_or_open(open).await.unwrap(), 1);
        assert_eq!(opened.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_reopen_leaves_handle_unset() {
        let handle: LazyHandle<usize> = LazyHandle::new(None);
        let err = handle
            .get_or_open(|| async { Err(StoreError::NotInitialized("refused".into())) })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotInitialized(_)));
        assert!(!handle.is_set().await);

        assert_eq!(handle.get_or_open(|| async { Ok(7) }).await.unwrap(), 7);
        assert!(handle.is_set().await);
    }

    #[tokio::test]
    async fn test_unreachable_store_reports_not_initialized() {
        let config = GraphConfig {
            uri: "bolt://127.0.0.1:1".to_string(),
            ..Default::default()
        };
        let client = GraphClient::connect(&config).await;
        assert!(!client.is_connected().await);

        let err = client.query_rows(query("RETURN 1")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotInitialized(_)));
        assert_eq!(err.status_class(), 503);
    }
}
