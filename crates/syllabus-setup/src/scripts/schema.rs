use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use crate::script::{SetupContext, SetupScript};

/// Uniqueness constraints and lookup indexes.
pub struct CreateConstraints;

#[async_trait]
impl SetupScript for CreateConstraints {
    fn name(&self) -> &str {
        "create-constraints"
    }

    fn description(&self) -> &str {
        "Create uniqueness constraints and indexes"
    }

    async fn run(&self, ctx: &SetupContext) -> Result<()> {
        ctx.store
            .apply_schema()
            .await
            .context("Failed to apply graph schema")
    }
}

/// DETACH DELETE of every node, gated by `drop_existing_data`.
pub struct DropExistingData;

#[async_trait]
impl SetupScript for DropExistingData {
    fn name(&self) -> &str {
        "drop-existing-data"
    }

    fn description(&self) -> &str {
        "Delete all nodes and relationships (only with DROP_EXISTING_DATA)"
    }

    fn depends_on(&self) -> &[&'static str] {
        &["create-constraints"]
    }

    async fn run(&self, ctx: &SetupContext) -> Result<()> {
        if !ctx.config.drop_existing_data {
            info!("DROP_EXISTING_DATA not set, keeping existing data");
            return Ok(());
        }
        ctx.store
            .clear_all()
            .await
            .context("Failed to drop existing data")?;
        info!("Existing graph data dropped");
        Ok(())
    }
}
