//! Setup script contract.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use syllabus_graph::CatalogStore;

use crate::config::SetupConfig;

/// Everything a script may touch while it runs.
#[derive(Clone)]
pub struct SetupContext {
    pub store: Arc<dyn CatalogStore>,
    pub config: SetupConfig,
}

impl SetupContext {
    pub fn new(store: Arc<dyn CatalogStore>, config: SetupConfig) -> Self {
        Self { store, config }
    }
}

/// A named, one-shot setup step.
#[async_trait]
pub trait SetupScript: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Scripts that must run before this one.
    fn depends_on(&self) -> &[&'static str] {
        &[]
    }

    async fn run(&self, ctx: &SetupContext) -> Result<()>;
}
