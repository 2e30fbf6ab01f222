//! Write operations for the knowledge graph.
//!
//! Resources are identified by `uri` on the `Resource` label. Relationship
//! types come from caller-supplied predicate names, so they are always passed
//! as parameters to APOC procedures and compared with `type(r)`, never
//! spliced into the statement text.

use neo4rs::query;

use ontomill_core::{ImportSummary, Link, LinkDirection, NewResource, Triple, VocabularyPolicy};

use crate::client::{GraphClient, StoreError};
use crate::queries::{count_from_row, import_summary_from_row};
use crate::store::{NodeRemoval, ResourceOutcome};

/// Name of the uniqueness constraint on `Resource.uri`.
pub const URI_CONSTRAINT: &str = "n10s_uri";

impl GraphClient {
    // ── RDF Import ───────────────────────────────────────────────

    /// Import Turtle text through n10s.
    ///
    /// Nodes are merged on `uri`, so re-importing a document does not
    /// duplicate relationships. A non-`OK` termination status is an error.
    pub async fn import_turtle(&self, turtle: &str) -> Result<ImportSummary, StoreError> {
        let q = query(
            "CALL n10s.rdf.import.inline($ttl, \"Turtle\")
             YIELD terminationStatus, triplesLoaded, extraInfo
             RETURN terminationStatus AS status, triplesLoaded AS count, extraInfo AS info",
        )
        .param("ttl", turtle.to_string());

        let Some(row) = self.query_one(q).await? else {
            return Err(StoreError::Mapping("n10s import returned no rows".to_string()));
        };
        let summary = import_summary_from_row(&row)?;
        if summary.termination_status != "OK" {
            let info: String = row.get("info").unwrap_or_default();
            return Err(StoreError::Query(format!(
                "RDF import terminated with {}: {info}",
                summary.termination_status
            )));
        }

        tracing::debug!(triples = summary.triples_loaded, "n10s import complete");
        Ok(summary)
    }

    // ── Triples ──────────────────────────────────────────────────

    /// Create one relationship between two existing resources.
    /// Returns the number of relationships created (0 if an endpoint is missing).
    pub async fn create_triple(&self, triple: &Triple) -> Result<u64, StoreError> {
        let q = query(
            "MATCH (s:Resource {uri: $subject})
             MATCH (o:Resource {uri: $object})
             CALL apoc.create.relationship(s, $predicate, {}, o) YIELD rel
             RETURN count(rel) AS created",
        )
        .param("subject", triple.subject.clone())
        .param("predicate", triple.predicate.clone())
        .param("object", triple.object.clone());

        Ok(count_from_row(self.query_one(q).await?, "created"))
    }

    /// Delete the matching relationship(s). Returns how many were removed.
    pub async fn delete_triple(&self, triple: &Triple) -> Result<u64, StoreError> {
        let q = query(
            "MATCH (s:Resource {uri: $subject})-[r]->(o:Resource {uri: $object})
             WHERE type(r) = $predicate
             DELETE r
             RETURN count(r) AS deleted",
        )
        .param("subject", triple.subject.clone())
        .param("predicate", triple.predicate.clone())
        .param("object", triple.object.clone());

        Ok(count_from_row(self.query_one(q).await?, "deleted"))
    }

    /// Delete a resource and every relationship incident to it.
    pub async fn delete_node(&self, uri: &str) -> Result<NodeRemoval, StoreError> {
        let q = query(
            "MATCH (n:Resource {uri: $uri})
             OPTIONAL MATCH (n)-[r]-()
             WITH n, count(DISTINCT r) AS rels
             DETACH DELETE n
             RETURN count(n) AS deleted, sum(rels) AS relationships",
        )
        .param("uri", uri.to_string());

        let row = self.query_one(q).await?;
        let relationships = row
            .as_ref()
            .and_then(|r| r.get::<i64>("relationships").ok())
            .and_then(|n| u64::try_from(n).ok())
            .unwrap_or(0);
        Ok(NodeRemoval {
            nodes: count_from_row(row, "deleted"),
            relationships,
        })
    }

    // ── Resources ────────────────────────────────────────────────

    /// Create a resource node and, optionally, one relationship to an
    /// existing resource. Both writes share one transaction: if the link
    /// target is missing nothing is committed.
    pub async fn create_resource(
        &self,
        resource: &NewResource,
        link: Option<&Link>,
    ) -> Result<ResourceOutcome, StoreError> {
        let props = serde_json::to_string(&resource.properties)
            .map_err(|e| StoreError::Mapping(e.to_string()))?;

        let mut txn = self.start_txn().await?;

        let create = query(
            "CREATE (n:Resource {uri: $uri})
             SET n += apoc.convert.fromJsonMap($props)
             WITH n
             CALL apoc.create.addLabels(n, $labels) YIELD node
             RETURN node.uri AS uri",
        )
        .param("uri", resource.uri.clone())
        .param("props", props)
        .param("labels", resource.labels.clone());
        txn.run(create).await?;

        if let Some(link) = link {
            let cypher = match link.direction {
                LinkDirection::Outgoing => {
                    "MATCH (n:Resource {uri: $uri})
                     MATCH (o:Resource {uri: $other})
                     CALL apoc.create.relationship(n, $predicate, {}, o) YIELD rel
                     RETURN count(rel) AS created"
                }
                LinkDirection::Incoming => {
                    "MATCH (n:Resource {uri: $uri})
                     MATCH (o:Resource {uri: $other})
                     CALL apoc.create.relationship(o, $predicate, {}, n) YIELD rel
                     RETURN count(rel) AS created"
                }
            };
            let q = query(cypher)
                .param("uri", resource.uri.clone())
                .param("other", link.other.clone())
                .param("predicate", link.predicate.clone());

            let mut stream = txn.execute(q).await?;
            let mut created = 0i64;
            while let Some(row) = stream.next(txn.handle()).await? {
                created += row.get::<i64>("created").unwrap_or(0);
            }

            if created == 0 {
                tracing::warn!(
                    uri = %resource.uri,
                    other = %link.other,
                    "Link target missing, rolling back resource creation"
                );
                txn.rollback().await?;
                return Ok(ResourceOutcome::LinkTargetMissing);
            }
        }

        txn.commit().await?;
        Ok(ResourceOutcome::Created)
    }

    // ── Store Configuration ──────────────────────────────────────

    /// Initialize the n10s graph configuration.
    pub async fn init_vocabulary(&self, policy: &VocabularyPolicy) -> Result<(), StoreError> {
        let cypher = format!("CALL n10s.graphconfig.init({})", policy.cypher_map());
        self.run(query(&cypher)).await
    }

    /// Ensure the uniqueness constraint on `Resource.uri` exists.
    pub async fn ensure_uri_constraint(&self) -> Result<(), StoreError> {
        let cypher = format!(
            "CREATE CONSTRAINT {URI_CONSTRAINT} IF NOT EXISTS
             FOR (r:Resource) REQUIRE r.uri IS UNIQUE"
        );
        self.run(query(&cypher)).await
    }
}
