//! # Syllabus Setup
//!
//! Named setup scripts run in dependency order against a catalog store.

pub mod config;
pub mod error;
pub mod runner;
pub mod script;
pub mod scripts;

pub use config::SetupConfig;
pub use error::{SetupError, SetupResult};
pub use runner::{ExecuteOptions, ExecutionSummary, ScriptResult, SetupRunner};
pub use script::{SetupContext, SetupScript};
pub use scripts::builtin_runner;
