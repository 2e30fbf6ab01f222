//! CLI entry point for the Ontomill ingestion engine.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::io::AsyncReadExt;
use tracing_subscriber::{fmt, EnvFilter};

use ontomill_core::{BulkTripleOperation, Catalog, QualityRecord, Triple, TripleFilter, WorkOrder};
use ontomill_graph::{GraphClient, MemoryStore};

use ontomill_ingest::{BootstrapLoader, Ingestor, OntomillConfig, TripleMutator};

#[derive(Parser)]
#[command(name = "ontomill")]
#[command(about = "Ontology ingestion and triple mutation for the manufacturing knowledge graph")]
struct Cli {
    /// Config file prefix (default: ontomill).
    #[arg(short, long, default_value = "ontomill", global = true)]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Configure the store and load the ontology directory.
    Bootstrap,
    /// Validate a data document against a shapes document.
    Validate {
        #[arg(long)]
        data: PathBuf,
        #[arg(long)]
        shapes: PathBuf,
    },
    /// Validate, then import a data document.
    Ingest {
        #[arg(long)]
        data: PathBuf,
        #[arg(long)]
        shapes: PathBuf,
        /// Import into an in-memory store instead of Neo4j.
        #[arg(long)]
        dry_run: bool,
    },
    /// List triples matching the given filters.
    Triples {
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        predicate: Option<String>,
        #[arg(long)]
        object: Option<String>,
    },
    /// Create a relationship between two existing resources.
    AddTriple {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        predicate: String,
        #[arg(long)]
        object: String,
    },
    /// Delete a relationship.
    DeleteTriple {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        predicate: String,
        #[arg(long)]
        object: String,
    },
    /// Delete a resource and all its relationships.
    DeleteNode {
        #[arg(long)]
        uri: String,
    },
    /// Apply `{"add": [...], "delete": [...]}` read from stdin.
    Bulk,
    /// Create a work order read as JSON from stdin.
    WorkOrder,
    /// Record a quality check read as JSON from stdin.
    Quality,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let config = OntomillConfig::load(&cli.config)?;

    match cli.command {
        Command::Validate { data, shapes } => {
            let data = tokio::fs::read_to_string(&data).await?;
            let shapes = tokio::fs::read_to_string(&shapes).await?;
            let outcome = ontomill_shacl::validate(&data, &shapes)?;
            emit(&serde_json::json!({
                "conforms": outcome.conforms,
                "violations": outcome.details.violation_count(),
                "warnings": outcome.details.warning_count(),
                "report": outcome.report,
            }))
        }
        Command::Ingest {
            data,
            shapes,
            dry_run: true,
        } => {
            let ingestor = Ingestor::new(MemoryStore::configured());
            emit(&ingestor.ingest_files(&data, &shapes).await?)
        }
        Command::Bootstrap => {
            // Bootstrap never fails outright; an unreachable store shows up in
            // the report.
            let graph = GraphClient::connect(&config.neo4j).await;
            let loader = BootstrapLoader::new(graph, config.ontology.clone());
            emit(&loader.run().await)
        }
        command => run_against_store(command, &config).await,
    }
}

/// One-shot commands against the Neo4j store. These fail fast if the store
/// cannot be reached.
async fn run_against_store(command: Command, config: &OntomillConfig) -> anyhow::Result<()> {
    let catalog = Catalog::new(&config.catalog.prefix)?;
    let graph = GraphClient::connect_strict(&config.neo4j).await?;

    match command {
        Command::Ingest { data, shapes, .. } => {
            let ingestor = Ingestor::new(graph);
            emit(&ingestor.ingest_files(&data, &shapes).await?)
        }
        Command::Triples {
            subject,
            predicate,
            object,
        } => {
            let mutator = TripleMutator::new(graph, catalog);
            let filter = TripleFilter {
                subject,
                predicate,
                object,
            };
            emit(&mutator.get_triples(&filter).await?)
        }
        Command::AddTriple {
            subject,
            predicate,
            object,
        } => {
            let mutator = TripleMutator::new(graph, catalog);
            let triple = Triple::new(subject, predicate, object);
            mutator.create_triple(&triple).await?;
            emit(&serde_json::json!({ "message": "Triple created", "triple": triple }))
        }
        Command::DeleteTriple {
            subject,
            predicate,
            object,
        } => {
            let mutator = TripleMutator::new(graph, catalog);
            let triple = Triple::new(subject, predicate, object);
            let removed = mutator.delete_triple(&triple).await?;
            emit(&serde_json::json!({ "message": "Triple deleted", "removed": removed }))
        }
        Command::DeleteNode { uri } => {
            let mutator = TripleMutator::new(graph, catalog);
            let removal = mutator.delete_node(&uri).await?;
            emit(&serde_json::json!({
                "message": "Node deleted",
                "uri": uri,
                "relationships": removal.relationships,
            }))
        }
        Command::Bulk => {
            let op: BulkTripleOperation = read_stdin_json().await?;
            let mutator = TripleMutator::new(graph, catalog);
            emit(&mutator.bulk_apply(&op).await)
        }
        Command::WorkOrder => {
            let order: WorkOrder = read_stdin_json().await?;
            let mutator = TripleMutator::new(graph, catalog);
            let id = mutator.create_work_order(&order).await?;
            emit(&serde_json::json!({ "id": id, "message": "Work order created" }))
        }
        Command::Quality => {
            let record: QualityRecord = read_stdin_json().await?;
            let mutator = TripleMutator::new(graph, catalog);
            let id = mutator.record_quality(&record).await?;
            emit(&serde_json::json!({ "id": id, "message": "Quality record created" }))
        }
        Command::Validate { .. } | Command::Bootstrap => {
            anyhow::bail!("command does not run through the one-shot store path")
        }
    }
}

async fn read_stdin_json<T: serde::de::DeserializeOwned>() -> anyhow::Result<T> {
    let mut raw = String::new();
    tokio::io::stdin().read_to_string(&mut raw).await?;
    Ok(serde_json::from_str(&raw)?)
}

fn emit<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
