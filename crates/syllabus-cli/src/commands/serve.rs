//! Web server command.

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use syllabus_setup::{builtin_runner, ExecuteOptions, SetupConfig, SetupContext};

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Serve an in-memory store loaded from the data directory
    #[arg(long)]
    pub memory: bool,
}

pub async fn execute(args: ServeArgs, config: SetupConfig) -> Result<()> {
    let store = super::open_store(&config, args.memory).await?;

    if args.memory {
        let ctx = SetupContext::new(store.clone(), config);
        let summary = builtin_runner()?
            .execute(&ctx, &ExecuteOptions::default())
            .await?;
        if !summary.is_success() {
            bail!("Loading the in-memory store failed; run `syllabus run --memory` for details");
        }
    }

    println!();
    println!("  {} {}", "Syllabus".cyan().bold(), "API Server".bold());
    println!();
    println!("  {}       http://{}:{}", "API".green(), args.host, args.port);
    println!("  {}    http://{}:{}/health", "Health".green(), args.host, args.port);
    if args.memory {
        println!("  {}     {}", "Store".green(), "in-memory".yellow());
    }
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    syllabus_web::run_server(store, &args.host, args.port).await?;

    Ok(())
}
