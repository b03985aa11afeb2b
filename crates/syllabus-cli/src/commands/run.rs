//! Setup run command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use syllabus_setup::{builtin_runner, ExecuteOptions, SetupConfig, SetupContext};

use crate::output;

#[derive(Args)]
pub struct RunArgs {
    /// Scripts to run; dependencies are added automatically
    pub scripts: Vec<String>,

    /// Keep going after a script fails
    #[arg(long)]
    pub continue_on_error: bool,

    /// Delete all existing graph data first
    #[arg(long)]
    pub drop_existing: bool,

    /// Load the seed documents (grades, prerequisites, resources, questions)
    #[arg(long, conflicts_with = "no_seed")]
    pub seed: bool,

    /// Skip the seed documents
    #[arg(long)]
    pub no_seed: bool,

    /// Hierarchy document to import instead of the bundled one
    #[arg(long, value_name = "PATH")]
    pub hierarchy: Option<PathBuf>,

    /// Directory holding the seed documents
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Run against an in-memory store (dry run)
    #[arg(long)]
    pub memory: bool,

    /// Do not ask before dropping data
    #[arg(short, long)]
    pub yes: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: RunArgs, mut config: SetupConfig) -> Result<()> {
    config.continue_on_error |= args.continue_on_error;
    config.drop_existing_data |= args.drop_existing;
    if args.seed {
        config.seed_data = true;
    }
    if args.no_seed {
        config.seed_data = false;
    }
    if let Some(path) = args.hierarchy {
        config.hierarchy_path = Some(path);
    }
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }

    if config.drop_existing_data && !args.memory && !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete ALL data in {}?", config.graph.uri))
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;
        if !confirmed {
            println!("{}", "Aborted.".yellow());
            return Ok(());
        }
    }

    let runner = builtin_runner()?;
    let store = super::open_store(&config, args.memory).await?;
    let options = ExecuteOptions {
        scripts: args.scripts,
        continue_on_error: config.continue_on_error,
    };
    let ctx = SetupContext::new(store, config);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .context("Invalid spinner template")?,
    );
    spinner.set_message("Running setup scripts");
    if !args.json && !ctx.config.verbose {
        spinner.enable_steady_tick(Duration::from_millis(100));
    }

    let result = runner.execute(&ctx, &options).await;
    spinner.finish_and_clear();
    let summary = result?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        output::print_summary(&summary);
    }

    if !summary.is_success() {
        bail!("{} script(s) failed", summary.failed());
    }
    Ok(())
}
