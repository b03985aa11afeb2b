//! Database health command.

use anyhow::{Context, Result};
use colored::Colorize;
use syllabus_graph::GraphClient;
use syllabus_setup::SetupConfig;

pub async fn execute(config: &SetupConfig) -> Result<()> {
    println!("{} {}", "Checking".bold(), config.graph.uri.cyan());

    let client = GraphClient::connect(&config.graph)
        .await
        .with_context(|| format!("Cannot reach Neo4j at {}", config.graph.uri))?;
    let latency = client.ping().await?;

    println!(
        "  {} database {} reachable ({} ms)",
        "✓".green(),
        config.graph.database.bold(),
        latency.as_millis()
    );
    Ok(())
}
