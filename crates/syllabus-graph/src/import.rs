//! Concept hierarchy import.
//!
//! Flattens a hierarchy document and applies it to a store: one upsert per
//! concept, then one CONTAINS merge per edge. Writes are sequential and the
//! first failure aborts the run.

use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use serde::Serialize;
use syllabus_core::concept::hierarchy::{flatten, FlattenedHierarchy, HierarchyNode};
use syllabus_core::Concept;
use tracing::{debug, info};

use crate::store::CatalogStore;

/// Outcome of an import run.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub root_id: String,
    pub concepts: usize,
    pub relationships: usize,
    pub max_depth: usize,
    #[serde(with = "duration_ms")]
    pub duration: Duration,
}

/// Flatten `root` and write it to `store`.
pub async fn import_hierarchy(store: &dyn CatalogStore, root: &HierarchyNode) -> Result<ImportReport> {
    let flat = flatten(root).context("Hierarchy document is invalid")?;
    apply(store, &flat).await
}

/// Write an already flattened hierarchy to `store`.
pub async fn apply(store: &dyn CatalogStore, flat: &FlattenedHierarchy) -> Result<ImportReport> {
    let started = Instant::now();
    let root_id = match flat.root() {
        Some(root) => root.id.clone(),
        None => bail!("Hierarchy is empty"),
    };

    info!(
        root = %root_id,
        concepts = flat.concepts.len(),
        relationships = flat.relationships.len(),
        "Importing concept hierarchy"
    );

    let now = Utc::now();
    for entry in &flat.concepts {
        let concept = Concept {
            id: entry.id.clone(),
            name: entry.name.clone(),
            concept_type: entry.layer,
            description: entry.description.clone(),
            created_at: now,
            updated_at: None,
        };
        store
            .upsert_concept(&concept)
            .await
            .with_context(|| format!("Failed to upsert concept {}", entry.id))?;
        debug!(id = %entry.id, layer = %entry.layer, "Imported concept");
    }

    for edge in &flat.relationships {
        let linked = store
            .link_contains(&edge.parent_id, &edge.child_id)
            .await
            .with_context(|| format!("Failed to link {} -> {}", edge.parent_id, edge.child_id))?;
        if !linked {
            bail!(
                "CONTAINS endpoints missing after upsert: {} -> {}",
                edge.parent_id,
                edge.child_id
            );
        }
    }

    let report = ImportReport {
        root_id,
        concepts: flat.concepts.len(),
        relationships: flat.relationships.len(),
        max_depth: flat.max_depth(),
        duration: started.elapsed(),
    };
    info!(
        concepts = report.concepts,
        relationships = report.relationships,
        elapsed_ms = report.duration.as_millis() as u64,
        "Hierarchy import complete"
    );
    Ok(report)
}

pub(crate) mod duration_ms {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use syllabus_core::concept::hierarchy::parse_hierarchy;

    const DOC: &str = r#"{
        "id": "OLM001", "name": "Ordinary Level Mathematics", "layer": "Subject",
        "children": [
            { "id": "MAT001", "name": "Algebra", "layer": "Matter",
              "children": [
                { "id": "MOL001", "name": "Linear Equations", "layer": "Molecule",
                  "children": [
                    { "id": "ATM001", "name": "One Variable", "layer": "Atom",
                      "particles": [ { "id": "PAR001", "name": "Isolating x" } ] },
                    { "id": "ATM002", "name": "Two Variables", "layer": "Atom" }
                  ] }
              ] }
        ]
    }"#;

    #[tokio::test]
    async fn test_import_creates_tree() {
        let store = MemoryStore::new();
        let root = parse_hierarchy(DOC).unwrap();
        let report = import_hierarchy(&store, &root).await.unwrap();

        assert_eq!(report.root_id, "OLM001");
        assert_eq!(report.concepts, 6);
        assert_eq!(report.relationships, 5);
        assert_eq!(report.max_depth, 4);
        assert_eq!(store.count_concepts().await.unwrap(), 6);
        assert_eq!(store.count_contains().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_import_is_idempotent() {
        let store = MemoryStore::new();
        let root = parse_hierarchy(DOC).unwrap();

        import_hierarchy(&store, &root).await.unwrap();
        let concepts = store.count_concepts().await.unwrap();
        let edges = store.count_contains().await.unwrap();

        import_hierarchy(&store, &root).await.unwrap();
        assert_eq!(store.count_concepts().await.unwrap(), concepts);
        assert_eq!(store.count_contains().await.unwrap(), edges);
    }

    #[tokio::test]
    async fn test_invalid_document_writes_nothing() {
        let store = MemoryStore::new();
        let root = parse_hierarchy(
            r#"{"id":"OLM001","name":"Maths","layer":"Subject",
                "children":[{"id":"PAR001","name":"Leaf","layer":"Particle"}]}"#,
        )
        .unwrap();

        assert!(import_hierarchy(&store, &root).await.is_err());
        assert_eq!(store.count_concepts().await.unwrap(), 0);
    }
}
