//! Syllabus CLI
//!
//! Sets up, checks and serves the curriculum knowledge graph.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::Cli;

const DEFAULT_FILTER: &str = "syllabus=info,syllabus_web=debug,syllabus_setup=info";
const VERBOSE_FILTER: &str = "syllabus=debug,syllabus_web=debug,syllabus_setup=debug,syllabus_graph=debug";

/// Initialize tracing with optional file logging.
///
/// `RUST_LOG` wins over `verbose`. The returned guard flushes the file
/// writer and must live until exit.
fn init_tracing(log_file: Option<&std::path::Path>, verbose: bool) -> Result<Option<WorkerGuard>> {
    let default = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into());

    let Some(path) = log_file else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
        return Ok(None);
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let file_name = path
        .file_name()
        .context("Log file path has no file name")?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();
    Ok(Some(guard))
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; everything has a default or a flag.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let verbose = cli.verbose
        || std::env::var("VERBOSE")
            .ok()
            .and_then(|v| syllabus_setup::config::parse_bool(&v))
            .unwrap_or(false);
    let _guard = init_tracing(cli.log_file.as_deref(), verbose)?;

    cli.execute(verbose).await
}
