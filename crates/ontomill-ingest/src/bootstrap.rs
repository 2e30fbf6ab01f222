//! Store preparation at startup: vocabulary configuration, the uri
//! constraint, and loading the ontology directory.
//!
//! Nothing here is fatal. Every failure is logged and recorded in the
//! returned [`BootstrapReport`] so the caller can start regardless.

use std::path::{Path, PathBuf};

use serde::Serialize;

use ontomill_core::VocabularyPolicy;
use ontomill_graph::TripleStore;

use crate::config::OntologyConfig;

/// What happened to the store's vocabulary configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum VocabularyStatus {
    AlreadyConfigured,
    Initialized,
    /// The graph already holds nodes, so the configuration cannot be created.
    SkippedNonEmpty,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub triples_loaded: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFile {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of scanning the ontology directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OntologyLoad {
    pub loaded: Vec<LoadedFile>,
    /// Shape documents, never imported.
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<FailedFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    pub vocabulary: VocabularyStatus,
    pub uri_constraint: bool,
    pub loaded: Vec<LoadedFile>,
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<FailedFile>,
}

pub struct BootstrapLoader<S> {
    store: S,
    ontology: OntologyConfig,
    policy: VocabularyPolicy,
}

impl<S: TripleStore> BootstrapLoader<S> {
    pub fn new(store: S, ontology: OntologyConfig) -> Self {
        Self {
            store,
            ontology,
            policy: VocabularyPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: VocabularyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run both bootstrap steps in order.
    pub async fn run(&self) -> BootstrapReport {
        let vocabulary = self.ensure_vocabulary_config().await;
        let uri_constraint = self.ensure_uri_constraint().await;
        let load = self.load_ontology_dir().await;

        tracing::info!(
            vocabulary = ?vocabulary,
            loaded = load.loaded.len(),
            skipped = load.skipped.len(),
            failed = load.failed.len(),
            "Bootstrap complete"
        );

        BootstrapReport {
            vocabulary,
            uri_constraint,
            loaded: load.loaded,
            skipped: load.skipped,
            failed: load.failed,
        }
    }

    /// Create the vocabulary configuration unless one exists.
    ///
    /// A failed lookup does not stop initialization; it is only reported if
    /// initialization fails as well.
    pub async fn ensure_vocabulary_config(&self) -> VocabularyStatus {
        let lookup_error = match self.store.vocabulary_configured().await {
            Ok(true) => {
                tracing::info!("Vocabulary configuration already present");
                return VocabularyStatus::AlreadyConfigured;
            }
            Ok(false) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read vocabulary configuration, initializing");
                Some(e)
            }
        };

        match self.store.init_vocabulary(&self.policy).await {
            Ok(()) => {
                tracing::info!("Vocabulary configuration initialized");
                VocabularyStatus::Initialized
            }
            Err(e) if e.to_string().contains("non-empty") => {
                tracing::info!("Graph is non-empty, vocabulary configuration left as is");
                VocabularyStatus::SkippedNonEmpty
            }
            Err(e) => {
                tracing::warn!(error = %e, "Vocabulary configuration failed");
                let message = match lookup_error {
                    Some(lookup) => format!("{e} (lookup: {lookup})"),
                    None => e.to_string(),
                };
                VocabularyStatus::Failed(message)
            }
        }
    }

    /// Ensure the `Resource.uri` uniqueness constraint. Returns false on failure.
    pub async fn ensure_uri_constraint(&self) -> bool {
        match self.store.ensure_uri_constraint().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Could not create uri constraint");
                false
            }
        }
    }

    /// Import every ontology document in the configured directory.
    pub async fn load_ontology_dir(&self) -> OntologyLoad {
        let dir = Path::new(&self.ontology.dir);
        let mut load = OntologyLoad::default();

        let files = match self.ontology_files(dir).await {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Ontology directory unavailable");
                return load;
            }
        };

        let shapes_prefix = self.ontology.shapes_prefix.to_lowercase();
        for path in files {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            if !shapes_prefix.is_empty() && name.starts_with(&shapes_prefix) {
                tracing::debug!(path = %path.display(), "Skipping shape document");
                load.skipped.push(path);
                continue;
            }

            match self.load_file(&path).await {
                Ok(triples_loaded) => {
                    tracing::info!(path = %path.display(), triples = triples_loaded, "Ontology loaded");
                    load.loaded.push(LoadedFile {
                        path,
                        triples_loaded,
                    });
                }
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "Ontology load failed");
                    load.failed.push(FailedFile { path, error });
                }
            }
        }
        load
    }

    async fn load_file(&self, path: &Path) -> Result<u64, String> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| e.to_string())?;
        let summary = self
            .store
            .import_turtle(&text)
            .await
            .map_err(|e| e.to_string())?;
        Ok(summary.triples_loaded)
    }

    /// Regular files with the configured extension, sorted by name.
    async fn ontology_files(&self, dir: &Path) -> std::io::Result<Vec<PathBuf>> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let matches_ext = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(self.ontology.extension.as_str()));
            if matches_ext && entry.file_type().await?.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}
