//! Triple mutations: single-triple CRUD, node removal, bulk batches and the
//! catalog-driven manufacturing resource flows.

use ontomill_core::{
    BulkItemError, BulkItemKind, BulkOperationResult, BulkTripleOperation, Catalog, EntityKind,
    Link, LinkDirection, NewResource, QualityRecord, Triple, TripleFilter, TripleRecord,
    WorkOrder,
};
use ontomill_graph::{NodeRemoval, ResourceOutcome, StoreError, TripleStore};

use crate::error::{MutationError, Result};

/// Relationship linking a work order to the equipment that runs it.
pub const EXECUTED_BY: &str = "executedBy";
/// Relationship linking a product to one of its quality checks.
pub const HAS_QUALITY: &str = "hasQuality";

/// Applies caller mutations to a [`TripleStore`].
pub struct TripleMutator<S> {
    store: S,
    catalog: Catalog,
}

impl<S: TripleStore> TripleMutator<S> {
    pub fn new(store: S, catalog: Catalog) -> Self {
        Self { store, catalog }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    // ── Single Triples ───────────────────────────────────────────

    /// Create one relationship between two existing resources.
    pub async fn create_triple(&self, triple: &Triple) -> Result<()> {
        validate_triple(triple)?;

        match self.store.create_triple(triple).await {
            Ok(0) => Err(MutationError::TripleCreate {
                triple: triple.clone(),
                reason: "subject or object resource does not exist".to_string(),
                source: None,
            }),
            Ok(_) => {
                tracing::debug!(%triple, "Triple created");
                Ok(())
            }
            Err(e @ StoreError::Query(_)) => Err(MutationError::TripleCreate {
                triple: triple.clone(),
                reason: e.to_string(),
                source: Some(e),
            }),
            // Connectivity, auth and transient failures keep their kind so
            // callers can tell them apart and retry.
            Err(e) => Err(MutationError::Store(e)),
        }
    }

    /// Triples matching every supplied filter, with endpoint display labels.
    pub async fn get_triples(&self, filter: &TripleFilter) -> Result<Vec<TripleRecord>> {
        Ok(self.store.find_triples(filter).await?)
    }

    /// Delete a relationship. Fails with `NotFound` if nothing matched.
    pub async fn delete_triple(&self, triple: &Triple) -> Result<u64> {
        validate_triple(triple)?;

        let removed = self.store.delete_triple(triple).await?;
        if removed == 0 {
            return Err(MutationError::NotFound(format!("triple {triple}")));
        }
        tracing::debug!(%triple, removed, "Triple deleted");
        Ok(removed)
    }

    /// Delete a resource with all its relationships.
    pub async fn delete_node(&self, uri: &str) -> Result<NodeRemoval> {
        if uri.trim().is_empty() {
            return Err(MutationError::InvalidTriple("node uri is empty".to_string()));
        }

        let removal = self.store.delete_node(uri).await?;
        if removal.nodes == 0 {
            return Err(MutationError::NotFound(format!("node {uri}")));
        }
        tracing::info!(
            uri,
            relationships = removal.relationships,
            "Node deleted"
        );
        Ok(removal)
    }

    // ── Bulk ─────────────────────────────────────────────────────

    /// Apply additions in order, then deletions in order. Each item stands on
    /// its own: failures are recorded in the result and never abort the batch.
    pub async fn bulk_apply(&self, op: &BulkTripleOperation) -> BulkOperationResult {
        let mut result = BulkOperationResult::default();

        for triple in &op.add {
            match self.create_triple(triple).await {
                Ok(()) => result.added += 1,
                Err(e) => result.errors.push(BulkItemError {
                    kind: BulkItemKind::Add,
                    triple: triple.clone(),
                    message: e.to_string(),
                }),
            }
        }

        for triple in &op.delete {
            match self.delete_triple(triple).await {
                Ok(_) => result.deleted += 1,
                Err(e) => result.errors.push(BulkItemError {
                    kind: BulkItemKind::Delete,
                    triple: triple.clone(),
                    message: e.to_string(),
                }),
            }
        }

        tracing::info!(
            added = result.added,
            deleted = result.deleted,
            errors = result.errors.len(),
            "Bulk operation applied"
        );
        result
    }

    // ── Manufacturing Resources ──────────────────────────────────

    /// Register a work order, linked to its equipment when one is named.
    /// Node and link are written together; a missing equipment writes nothing.
    pub async fn create_work_order(&self, order: &WorkOrder) -> Result<String> {
        let uri = self
            .catalog
            .mint(EntityKind::WorkOrder, &order.work_order_number)?;

        let resource = NewResource::new(&uri)
            .label(EntityKind::WorkOrder.label())
            .property("workOrderNumber", order.work_order_number.as_str())
            .property("plannedQuantity", order.planned_quantity)
            .property("actualQuantity", order.actual_quantity)
            .property("status", order.status.as_str());

        let link = match order.equipment_id.as_deref().map(str::trim) {
            Some(equipment) if !equipment.is_empty() => Some(Link {
                predicate: EXECUTED_BY.to_string(),
                other: equipment.to_string(),
                direction: LinkDirection::Outgoing,
            }),
            _ => None,
        };

        self.create_linked(resource, link).await?;
        tracing::info!(uri = %uri, "Work order created");
        Ok(uri)
    }

    /// Record a quality check for an existing product.
    pub async fn record_quality(&self, record: &QualityRecord) -> Result<String> {
        let product = record.product_id.trim();
        if product.is_empty() {
            return Err(MutationError::InvalidTriple("product id is empty".to_string()));
        }
        let uri = self.catalog.mint(EntityKind::QualityControl, product)?;

        let resource = NewResource::new(&uri)
            .label(EntityKind::QualityControl.label())
            .property("qualityResult", record.quality_result.as_str())
            .property("timestamp", record.timestamp.to_rfc3339());
        let link = Link {
            predicate: HAS_QUALITY.to_string(),
            other: product.to_string(),
            direction: LinkDirection::Incoming,
        };

        self.create_linked(resource, Some(link)).await?;
        tracing::info!(uri = %uri, product, "Quality record created");
        Ok(uri)
    }

    async fn create_linked(&self, resource: NewResource, link: Option<Link>) -> Result<()> {
        match self.store.create_resource(&resource, link.as_ref()).await? {
            ResourceOutcome::Created => Ok(()),
            ResourceOutcome::LinkTargetMissing => {
                let target = link.map(|l| l.other).unwrap_or_default();
                Err(MutationError::NotFound(format!(
                    "resource {target} (required by {})",
                    resource.uri
                )))
            }
        }
    }
}

/// Reject triples the store could not represent before any store call.
pub fn validate_triple(triple: &Triple) -> Result<()> {
    if triple.subject.trim().is_empty() {
        return Err(MutationError::InvalidTriple("subject is empty".to_string()));
    }
    if triple.object.trim().is_empty() {
        return Err(MutationError::InvalidTriple("object is empty".to_string()));
    }
    validate_predicate(&triple.predicate)
}

/// A predicate becomes a relationship type name: non-empty, no backticks,
/// no whitespace or control characters.
pub fn validate_predicate(predicate: &str) -> Result<()> {
    if predicate.is_empty() {
        return Err(MutationError::InvalidTriple("predicate is empty".to_string()));
    }
    if let Some(c) = predicate
        .chars()
        .find(|c| *c == '`' || c.is_whitespace() || c.is_control())
    {
        return Err(MutationError::InvalidTriple(format!(
            "predicate {predicate:?} contains forbidden character {c:?}"
        )));
    }
    Ok(())
}
