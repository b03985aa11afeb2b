//! Read-only sanity checks over an imported graph.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::store::CatalogStore;

/// Aggregate figures for the concept graph.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub root_id: String,
    pub root_exists: bool,
    pub concept_count: usize,
    pub contains_count: usize,
    pub type_distribution: BTreeMap<String, usize>,
    pub max_depth: usize,
    pub tree_size: usize,
    pub multi_parent_concepts: Vec<String>,
    pub orphan_concepts: Vec<String>,
}

impl ValidationReport {
    /// Human-readable problems found in the report.
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.concept_count == 0 {
            issues.push("graph contains no concepts".to_string());
        }
        if !self.root_exists {
            issues.push(format!("root concept {} not found", self.root_id));
        }
        if !self.multi_parent_concepts.is_empty() {
            issues.push(format!(
                "concepts with more than one CONTAINS parent: {}",
                self.multi_parent_concepts.join(", ")
            ));
        }
        if !self.orphan_concepts.is_empty() {
            issues.push(format!(
                "concepts without a CONTAINS parent: {}",
                self.orphan_concepts.join(", ")
            ));
        }
        issues
    }

    pub fn is_healthy(&self) -> bool {
        self.issues().is_empty()
    }
}

/// Run every aggregate query and collect the results.
pub async fn validate_graph(store: &dyn CatalogStore, root_id: &str) -> Result<ValidationReport> {
    let root_exists = store.get_concept(root_id).await?.is_some();
    let report = ValidationReport {
        root_id: root_id.to_string(),
        root_exists,
        concept_count: store.count_concepts().await?,
        contains_count: store.count_contains().await?,
        type_distribution: store.type_distribution().await?,
        max_depth: store.max_depth(root_id).await?,
        tree_size: store.subtree_size(root_id).await?,
        multi_parent_concepts: store.multi_parent_concepts().await?,
        orphan_concepts: store.orphan_concepts().await?,
    };

    info!(
        root = %report.root_id,
        concepts = report.concept_count,
        contains = report.contains_count,
        depth = report.max_depth,
        "Graph validation finished"
    );
    for issue in report.issues() {
        warn!(%issue, "Graph validation issue");
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use syllabus_core::{Concept, ConceptType};

    #[tokio::test]
    async fn test_report_on_empty_graph() {
        let store = MemoryStore::new();
        let report = validate_graph(&store, "OLM001").await.unwrap();
        assert!(!report.root_exists);
        assert_eq!(report.concept_count, 0);
        assert_eq!(report.issues().len(), 2);
    }

    #[tokio::test]
    async fn test_detects_multiple_parents() {
        let store = MemoryStore::new();
        for (id, t) in [
            ("OLM001", ConceptType::Subject),
            ("MAT001", ConceptType::Matter),
            ("MAT002", ConceptType::Matter),
            ("MOL001", ConceptType::Molecule),
        ] {
            store.upsert_concept(&Concept::new(id, id, t)).await.unwrap();
        }
        store.link_contains("OLM001", "MAT001").await.unwrap();
        store.link_contains("OLM001", "MAT002").await.unwrap();
        store.link_contains("MAT001", "MOL001").await.unwrap();
        store.link_contains("MAT002", "MOL001").await.unwrap();

        let report = validate_graph(&store, "OLM001").await.unwrap();
        assert_eq!(report.multi_parent_concepts, vec!["MOL001".to_string()]);
        assert_eq!(report.type_distribution.get("Matter"), Some(&2));
        assert_eq!(report.max_depth, 2);
        assert_eq!(report.tree_size, 4);
        assert!(report.orphan_concepts.is_empty());
        assert!(!report.is_healthy());
    }

    #[tokio::test]
    async fn test_detects_parentless_layer_concepts() {
        let store = MemoryStore::new();
        for (id, t) in [
            ("OLM001", ConceptType::Subject),
            ("MAT001", ConceptType::Matter),
            ("MOL001", ConceptType::Molecule),
            ("ATM001", ConceptType::Atom),
            ("ATM002", ConceptType::Atom),
            ("GRD006", ConceptType::Grade),
        ] {
            store.upsert_concept(&Concept::new(id, id, t)).await.unwrap();
        }
        store.link_contains("OLM001", "MAT001").await.unwrap();
        store.link_contains("MAT001", "MOL001").await.unwrap();
        store.link_contains("MOL001", "ATM001").await.unwrap();
        store.link_contains("MOL001", "ATM002").await.unwrap();

        let report = validate_graph(&store, "OLM001").await.unwrap();
        assert!(report.is_healthy());

        // Removing the molecule strands both atoms below it.
        store.delete_concept("MOL001").await.unwrap();
        let report = validate_graph(&store, "OLM001").await.unwrap();
        assert_eq!(report.orphan_concepts, vec!["ATM001".to_string(), "ATM002".to_string()]);
        assert!(report.multi_parent_concepts.is_empty());
        assert_eq!(report.tree_size, 2);
        assert!(!report.is_healthy());
        assert!(report.issues()[0].contains("ATM001, ATM002"));
    }
}
