//! Configuration for the Ontomill ingestion engine.

use serde::Deserialize;

use ontomill_graph::GraphConfig;

/// Top-level configuration.
///
/// Loaded from `ontomill.toml` or `ONTOMILL__<SECTION>__<KEY>` environment
/// variables, falling back to built-in defaults for anything unset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OntomillConfig {
    #[serde(default)]
    pub neo4j: GraphConfig,

    #[serde(default)]
    pub ontology: OntologyConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Where bootstrap finds ontology documents.
#[derive(Debug, Clone, Deserialize)]
pub struct OntologyConfig {
    /// Directory scanned (non-recursively) at bootstrap.
    #[serde(default = "default_ontology_dir")]
    pub dir: String,

    /// File extension of ontology documents, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Files whose name starts with this (case-insensitive) are shape
    /// documents and are never imported.
    #[serde(default = "default_shapes_prefix")]
    pub shapes_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Namespace prefix of minted URIs.
    #[serde(default = "default_catalog_prefix")]
    pub prefix: String,
}

fn default_ontology_dir() -> String {
    "./ontology".to_string()
}

fn default_extension() -> String {
    "ttl".to_string()
}

fn default_shapes_prefix() -> String {
    "shapes".to_string()
}

fn default_catalog_prefix() -> String {
    ontomill_core::catalog::DEFAULT_PREFIX.to_string()
}

impl Default for OntologyConfig {
    fn default() -> Self {
        Self {
            dir: default_ontology_dir(),
            extension: default_extension(),
            shapes_prefix: default_shapes_prefix(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            prefix: default_catalog_prefix(),
        }
    }
}

impl OntomillConfig {
    /// Load from `<file_prefix>.toml` (optional) and the environment.
    pub fn load(file_prefix: &str) -> Result<Self, config::ConfigError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("ONTOMILL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        cfg.try_deserialize()
    }
}
