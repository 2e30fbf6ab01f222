//! Read operations and the Cypher query builder for triple lookups.

use neo4rs::{query, Query, Row};

use ontomill_core::{ImportSummary, TripleFilter, TripleRecord};

use crate::client::{GraphClient, StoreError};

/// Expands to a full triple-lookup statement around a WHERE fragment.
macro_rules! triple_lookup {
    ($where:literal) => {
        concat!(
            "MATCH (s:Resource)-[r]->(o:Resource) ",
            $where,
            " RETURN s.uri AS subject, type(r) AS predicate, o.uri AS object,
                    coalesce(s.`rdfs__label`, s.name) AS subject_label,
                    coalesce(o.`rdfs__label`, o.name) AS object_label
             ORDER BY subject, predicate, object"
        )
    };
}

/// A triple lookup bound to one of the fixed statement templates.
///
/// Each combination of present filters selects its own template; filter
/// values only ever travel as parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripleQuery {
    template: &'static str,
    filter: TripleFilter,
}

impl TripleQuery {
    pub fn new(filter: &TripleFilter) -> Self {
        let filter = filter.clone().normalized();
        let template = match (
            filter.subject.is_some(),
            filter.predicate.is_some(),
            filter.object.is_some(),
        ) {
            (false, false, false) => triple_lookup!(""),
            (true, false, false) => triple_lookup!("WHERE s.uri = $subject"),
            (false, true, false) => triple_lookup!("WHERE type(r) = $predicate"),
            (false, false, true) => triple_lookup!("WHERE o.uri = $object"),
            (true, true, false) => {
                triple_lookup!("WHERE s.uri = $subject AND type(r) = $predicate")
            }
            (true, false, true) => triple_lookup!("WHERE s.uri = $subject AND o.uri = $object"),
            (false, true, true) => {
                triple_lookup!("WHERE type(r) = $predicate AND o.uri = $object")
            }
            (true, true, true) => triple_lookup!(
                "WHERE s.uri = $subject AND type(r) = $predicate AND o.uri = $object"
            ),
        };
        Self { template, filter }
    }

    pub fn template(&self) -> &'static str {
        self.template
    }

    /// Names of the parameters this query binds, in template order.
    pub fn parameter_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.filter.subject.is_some() {
            names.push("subject");
        }
        if self.filter.predicate.is_some() {
            names.push("predicate");
        }
        if self.filter.object.is_some() {
            names.push("object");
        }
        names
    }

    pub fn build(&self) -> Query {
        let mut q = query(self.template);
        if let Some(s) = &self.filter.subject {
            q = q.param("subject", s.clone());
        }
        if let Some(p) = &self.filter.predicate {
            q = q.param("predicate", p.clone());
        }
        if let Some(o) = &self.filter.object {
            q = q.param("object", o.clone());
        }
        q
    }
}

// ── Row Mapping ───────────────────────────────────────────────────

/// Map a triple-lookup row into a record.
pub(crate) fn triple_from_row(row: &Row) -> Result<TripleRecord, StoreError> {
    let column = |name: &str| -> Result<String, StoreError> {
        row.get::<String>(name)
            .map_err(|e| StoreError::Mapping(format!("column {name}: {e}")))
    };
    Ok(TripleRecord {
        subject: column("subject")?,
        predicate: column("predicate")?,
        object: column("object")?,
        subject_label: row.get::<Option<String>>("subject_label").unwrap_or(None),
        object_label: row.get::<Option<String>>("object_label").unwrap_or(None),
    })
}

/// Map the row yielded by `n10s.rdf.import.inline`.
pub(crate) fn import_summary_from_row(row: &Row) -> Result<ImportSummary, StoreError> {
    let termination_status = row
        .get::<String>("status")
        .map_err(|e| StoreError::Mapping(format!("column status: {e}")))?;
    let triples_loaded = row
        .get::<i64>("count")
        .map_err(|e| StoreError::Mapping(format!("column count: {e}")))?;
    Ok(ImportSummary {
        termination_status,
        triples_loaded: u64::try_from(triples_loaded).unwrap_or(0),
    })
}

/// Read a single `count`-style integer column, defaulting to zero.
pub(crate) fn count_from_row(row: Option<Row>, column: &str) -> u64 {
    row.and_then(|r| r.get::<i64>(column).ok())
        .and_then(|n| u64::try_from(n).ok())
        .unwrap_or(0)
}

impl GraphClient {
    /// All relationships matching the filter conjunction.
    pub async fn find_triples(&self, filter: &TripleFilter) -> Result<Vec<TripleRecord>, StoreError> {
        let lookup = TripleQuery::new(filter);
        if lookup.filter.is_unbounded() {
            tracing::debug!("Unbounded triple lookup");
        }
        let rows = self.query_rows(lookup.build()).await?;
        rows.iter().map(triple_from_row).collect()
    }

    /// Whether the n10s graph configuration has been initialized.
    pub async fn vocabulary_configured(&self) -> Result<bool, StoreError> {
        let rows = self
            .query_rows(query("CALL n10s.graphconfig.show()"))
            .await?;
        Ok(!rows.is_empty())
    }

    /// Whether a Resource with this uri exists.
    pub async fn resource_exists(&self, uri: &str) -> Result<bool, StoreError> {
        let q = query("MATCH (n:Resource {uri: $uri}) RETURN count(n) AS cnt")
            .param("uri", uri.to_string());
        Ok(count_from_row(self.query_one(q).await?, "cnt") > 0)
    }
}
