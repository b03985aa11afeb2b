//! Graph validation command.

use anyhow::{bail, Result};
use clap::Args;
use syllabus_graph::validate_graph;
use syllabus_setup::SetupConfig;

use crate::output;

#[derive(Args)]
pub struct ValidateArgs {
    /// Expected root concept id
    #[arg(long)]
    pub root: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: ValidateArgs, config: &SetupConfig) -> Result<()> {
    let root = args.root.unwrap_or_else(|| config.root_id.clone());
    let store = super::open_store(config, false).await?;
    let report = validate_graph(store.as_ref(), &root).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::print_validation(&report);
    }

    if !report.is_healthy() {
        bail!("Graph validation found {} issue(s)", report.issues().len());
    }
    Ok(())
}
