//! Effective configuration command.

use anyhow::Result;
use colored::Colorize;
use syllabus_setup::SetupConfig;

use crate::output::print_kv;

pub fn execute(config: &SetupConfig) -> Result<()> {
    println!("{}", "Configuration".bold());
    println!("{}", "─".repeat(50));

    print_kv("NEO4J_URI", &config.graph.uri);
    print_kv("NEO4J_USERNAME", &config.graph.user);
    print_kv("NEO4J_PASSWORD", &config.graph.masked_password());
    print_kv("NEO4J_DATABASE", &config.graph.database);
    print_kv("DROP_EXISTING_DATA", &config.drop_existing_data.to_string());
    print_kv("SEED_DATA", &config.seed_data.to_string());
    print_kv("CONTINUE_ON_ERROR", &config.continue_on_error.to_string());
    print_kv("VERBOSE", &config.verbose.to_string());
    print_kv("SYLLABUS_DATA_DIR", &config.data_dir.display().to_string());
    print_kv("SYLLABUS_ROOT_ID", &config.root_id);
    print_kv("Hierarchy file", &config.hierarchy_file().display().to_string());

    println!("{}", "─".repeat(50));
    Ok(())
}
