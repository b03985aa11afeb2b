//! Hierarchy import command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use syllabus_core::concept::hierarchy::load_hierarchy;
use syllabus_graph::import_hierarchy;
use syllabus_setup::SetupConfig;

#[derive(Args)]
pub struct ImportArgs {
    /// Hierarchy JSON document
    pub path: PathBuf,

    /// Import into an in-memory store (checks the document only)
    #[arg(long)]
    pub memory: bool,
}

pub async fn execute(args: ImportArgs, config: &SetupConfig) -> Result<()> {
    let root = load_hierarchy(&args.path)
        .with_context(|| format!("Failed to load {}", args.path.display()))?;
    let store = super::open_store(config, args.memory).await?;

    println!("{} {}", "Importing".bold(), args.path.display().to_string().cyan());
    let report = import_hierarchy(store.as_ref(), &root).await?;

    println!("\n{}", "Import complete:".green().bold());
    println!("  Root:          {}", report.root_id.cyan());
    println!("  Concepts:      {}", report.concepts);
    println!("  Relationships: {}", report.relationships);
    println!("  Max depth:     {}", report.max_depth);
    println!("  Duration:      {} ms", report.duration.as_millis());
    Ok(())
}
