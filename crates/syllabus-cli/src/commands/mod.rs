//! CLI command definitions and handlers.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use syllabus_graph::{CatalogStore, GraphClient, MemoryStore, Neo4jStore};
use syllabus_setup::SetupConfig;

pub mod config;
pub mod health;
pub mod import;
pub mod list;
pub mod run;
pub mod serve;
pub mod validate;

/// Syllabus - curriculum knowledge graph setup and API
#[derive(Parser)]
#[command(name = "syllabus")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run setup scripts (all when none are named)
    Run(run::RunArgs),

    /// List available setup scripts
    List,

    /// Check the database connection
    Health,

    /// Show the effective configuration
    Config,

    /// Start the REST API server
    Serve(serve::ServeArgs),

    /// Import a concept hierarchy document
    Import(import::ImportArgs),

    /// Validate the imported concept graph
    Validate(validate::ValidateArgs),
}

impl Cli {
    pub async fn execute(self, verbose: bool) -> Result<()> {
        let mut config = SetupConfig::from_env()?;
        config.verbose = verbose;

        match self.command {
            Commands::Run(args) => run::execute(args, config).await,
            Commands::List => list::execute(),
            Commands::Health => health::execute(&config).await,
            Commands::Config => config::execute(&config),
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Import(args) => import::execute(args, &config).await,
            Commands::Validate(args) => validate::execute(args, &config).await,
        }
    }
}

/// Open the store a command works against.
pub(crate) async fn open_store(config: &SetupConfig, memory: bool) -> Result<Arc<dyn CatalogStore>> {
    if memory {
        tracing::info!("Using in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    }
    let client = GraphClient::connect(&config.graph)
        .await
        .with_context(|| format!("Cannot reach Neo4j at {}", config.graph.uri))?;
    Ok(Arc::new(Neo4jStore::new(client)))
}
