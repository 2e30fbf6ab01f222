//! The validate-then-import ingestion gate.

use std::path::Path;

use uuid::Uuid;

use ontomill_core::ImportResult;
use ontomill_graph::TripleStore;
use ontomill_shacl::ValidationOutcome;

use crate::error::IngestError;

/// Imports RDF documents that conform to a shapes document.
pub struct Ingestor<S> {
    store: S,
}

impl<S: TripleStore> Ingestor<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate `data` against `shapes` without touching the store.
    pub fn validate_only(&self, data: &str, shapes: &str) -> Result<ValidationOutcome, IngestError> {
        Ok(ontomill_shacl::validate(data, shapes)?)
    }

    /// Validate, then import only if the document conforms.
    ///
    /// A non-conforming document yields `triplesLoaded = 0` with the report,
    /// and the store is never called.
    pub async fn validate_and_import(
        &self,
        data: &str,
        shapes: &str,
    ) -> Result<ImportResult, IngestError> {
        let run_id = Uuid::new_v4();
        tracing::info!(%run_id, bytes = data.len(), "Ingestion started");

        let outcome = self.validate_only(data, shapes)?;
        if !outcome.conforms {
            tracing::warn!(
                %run_id,
                violations = outcome.details.violation_count(),
                warnings = outcome.details.warning_count(),
                "Document rejected by shape validation"
            );
            return Ok(ImportResult::rejected(outcome.report.unwrap_or_default()));
        }

        let summary = self.store.import_turtle(data).await.map_err(|e| {
            tracing::error!(%run_id, error = %e, "RDF import failed");
            e
        })?;

        tracing::info!(
            %run_id,
            triples = summary.triples_loaded,
            "Ingestion complete"
        );
        Ok(ImportResult::loaded(summary.triples_loaded))
    }

    /// Read both documents from disk and run [`Self::validate_and_import`].
    pub async fn ingest_files(
        &self,
        data: &Path,
        shapes: &Path,
    ) -> Result<ImportResult, IngestError> {
        let data = tokio::fs::read_to_string(data).await?;
        let shapes = tokio::fs::read_to_string(shapes).await?;
        self.validate_and_import(&data, &shapes).await
    }
}
