//! Setup orchestrator errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Unknown script: {0}")]
    UnknownScript(String),

    #[error("Script '{script}' depends on unknown script '{dependency}'")]
    UnknownDependency { script: String, dependency: String },

    #[error("Dependency cycle: {}", .0.join(" -> "))]
    DependencyCycle(Vec<String>),

    #[error("Script already registered: {0}")]
    DuplicateScript(String),

    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type SetupResult<T> = Result<T, SetupError>;
