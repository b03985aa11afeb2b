use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use syllabus_core::concept::hierarchy::load_hierarchy;
use syllabus_graph::{import_hierarchy, validate_graph};
use tracing::{info, warn};

use crate::script::{SetupContext, SetupScript};

/// Load the concept hierarchy document into the graph.
pub struct ImportConceptsGraph;

#[async_trait]
impl SetupScript for ImportConceptsGraph {
    fn name(&self) -> &str {
        "import-concepts-graph"
    }

    fn description(&self) -> &str {
        "Import the Subject > Matter > Molecule > Atom > Particle hierarchy"
    }

    fn depends_on(&self) -> &[&'static str] {
        &["create-constraints", "drop-existing-data"]
    }

    async fn run(&self, ctx: &SetupContext) -> Result<()> {
        let path = ctx.config.hierarchy_file();
        let root = load_hierarchy(&path)
            .with_context(|| format!("Failed to load hierarchy from {}", path.display()))?;
        let report = import_hierarchy(ctx.store.as_ref(), &root).await?;
        info!(
            root = %report.root_id,
            concepts = report.concepts,
            relationships = report.relationships,
            "Concept hierarchy imported"
        );
        Ok(())
    }
}

/// Aggregate checks over the imported graph; fails on any issue.
pub struct ValidateGraph;

#[async_trait]
impl SetupScript for ValidateGraph {
    fn name(&self) -> &str {
        "validate-graph"
    }

    fn description(&self) -> &str {
        "Check root, counts, depth and the single-parent tree invariant"
    }

    fn depends_on(&self) -> &[&'static str] {
        &["import-concepts-graph"]
    }

    async fn run(&self, ctx: &SetupContext) -> Result<()> {
        let report = validate_graph(ctx.store.as_ref(), &ctx.config.root_id).await?;
        let issues = report.issues();
        if issues.is_empty() {
            return Ok(());
        }
        for issue in &issues {
            warn!(issue = %issue, "Graph validation issue");
        }
        bail!("Graph validation found {} issue(s): {}", issues.len(), issues.join("; "))
    }
}
