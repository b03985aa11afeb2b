//! Curriculum hierarchy documents and their flattening into node/edge lists.
//!
//! A hierarchy document is a nested JSON tree:
//!
//! ```json
//! { "id": "OLM001", "name": "Ordinary Level Mathematics", "layer": "Subject",
//!   "children": [ { "id": "MAT001", "layer": "Matter", ... } ] }
//! ```
//!
//! Atoms may carry a `particles` list; those become Particle children one
//! level below the atom.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::model::ConceptType;
use crate::error::{CatalogError, CatalogResult};

/// One node of a hierarchy document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub id: String,
    pub name: String,
    pub layer: ConceptType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub children: Vec<HierarchyNode>,
    #[serde(default)]
    pub particles: Vec<ParticleEntry>,
}

/// Leaf entry listed under an Atom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A concept extracted from the tree, with its CONTAINS parent.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatConcept {
    pub id: String,
    pub name: String,
    pub layer: ConceptType,
    pub description: Option<String>,
    pub parent_id: Option<String>,
    pub depth: usize,
}

/// A CONTAINS edge, parent to child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainsEdge {
    pub parent_id: String,
    pub child_id: String,
}

/// Node and edge lists in depth-first pre-order.
#[derive(Debug, Clone, Default)]
pub struct FlattenedHierarchy {
    pub concepts: Vec<FlatConcept>,
    pub relationships: Vec<ContainsEdge>,
}

impl FlattenedHierarchy {
    pub fn root(&self) -> Option<&FlatConcept> {
        self.concepts.first()
    }

    /// Edges on the longest root-to-leaf path.
    pub fn max_depth(&self) -> usize {
        self.concepts.iter().map(|c| c.depth).max().unwrap_or(0)
    }
}

/// Flatten a hierarchy depth-first, checking ids and layer rules.
///
/// The root must be a Subject.
pub fn flatten(root: &HierarchyNode) -> CatalogResult<FlattenedHierarchy> {
    if root.layer != ConceptType::Subject {
        return Err(CatalogError::hierarchy(format!(
            "root {} is a {}; a hierarchy must be rooted at a Subject",
            root.id, root.layer
        )));
    }
    let mut out = FlattenedHierarchy::default();
    let mut seen = HashSet::new();
    visit(root, None, 0, &mut seen, &mut out)?;
    debug!(
        root = %root.id,
        concepts = out.concepts.len(),
        relationships = out.relationships.len(),
        "Flattened hierarchy"
    );
    Ok(out)
}

fn visit(
    node: &HierarchyNode,
    parent: Option<(&str, ConceptType)>,
    depth: usize,
    seen: &mut HashSet<String>,
    out: &mut FlattenedHierarchy,
) -> CatalogResult<()> {
    check_entry(&node.id, &node.name, seen)?;

    if let Some((parent_id, parent_layer)) = parent {
        if !parent_layer.can_contain(node.layer) {
            return Err(CatalogError::hierarchy(format!(
                "{} ({}) cannot be a child of {} ({})",
                node.id, node.layer, parent_id, parent_layer
            )));
        }
        out.relationships.push(ContainsEdge {
            parent_id: parent_id.to_string(),
            child_id: node.id.clone(),
        });
    }

    out.concepts.push(FlatConcept {
        id: node.id.clone(),
        name: node.name.clone(),
        layer: node.layer,
        description: node.description.clone(),
        parent_id: parent.map(|(id, _)| id.to_string()),
        depth,
    });

    if !node.particles.is_empty() && node.layer != ConceptType::Atom {
        return Err(CatalogError::hierarchy(format!(
            "{} ({}) lists particles; only atoms may",
            node.id, node.layer
        )));
    }

    for child in &node.children {
        visit(child, Some((&node.id, node.layer)), depth + 1, seen, out)?;
    }

    for particle in &node.particles {
        check_entry(&particle.id, &particle.name, seen)?;
        out.relationships.push(ContainsEdge {
            parent_id: node.id.clone(),
            child_id: particle.id.clone(),
        });
        out.concepts.push(FlatConcept {
            id: particle.id.clone(),
            name: particle.name.clone(),
            layer: ConceptType::Particle,
            description: particle.description.clone(),
            parent_id: Some(node.id.clone()),
            depth: depth + 1,
        });
    }

    Ok(())
}

fn check_entry(id: &str, name: &str, seen: &mut HashSet<String>) -> CatalogResult<()> {
    if id.trim().is_empty() {
        return Err(CatalogError::hierarchy(format!("node '{}' has an empty id", name)));
    }
    if name.trim().is_empty() {
        return Err(CatalogError::hierarchy(format!("node {} has an empty name", id)));
    }
    if !seen.insert(id.to_string()) {
        return Err(CatalogError::hierarchy(format!("duplicate concept id {}", id)));
    }
    Ok(())
}

/// Parse a hierarchy document from JSON text.
pub fn parse_hierarchy(json: &str) -> CatalogResult<HierarchyNode> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a hierarchy document from disk.
pub fn load_hierarchy(path: &Path) -> CatalogResult<HierarchyNode> {
    let content = std::fs::read_to_string(path)?;
    parse_hierarchy(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "id": "OLM001", "name": "Ordinary Level Mathematics", "layer": "Subject",
        "children": [
            { "id": "MAT001", "name": "Algebra", "layer": "Matter",
              "children": [
                { "id": "MOL001", "name": "Linear Equations", "layer": "Molecule",
                  "children": [
                    { "id": "ATM001", "name": "One Variable", "layer": "Atom",
                      "particles": [
                        { "id": "PAR001", "name": "Isolating the variable" },
                        { "id": "PAR002", "name": "Checking solutions" }
                      ] },
                    { "id": "ATM002", "name": "Two Variables", "layer": "Atom" }
                  ] }
              ] },
            { "id": "MAT002", "name": "Geometry", "layer": "Matter" }
        ]
    }"#;

    #[test]
    fn test_flatten_preorder() {
        let root = parse_hierarchy(SAMPLE).unwrap();
        let flat = flatten(&root).unwrap();

        let ids: Vec<_> = flat.concepts.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["OLM001", "MAT001", "MOL001", "ATM001", "PAR001", "PAR002", "ATM002", "MAT002"]
        );
        assert_eq!(flat.relationships.len(), flat.concepts.len() - 1);
        assert_eq!(flat.root().unwrap().parent_id, None);
        assert_eq!(flat.max_depth(), 4);
    }

    #[test]
    fn test_particles_become_children() {
        let root = parse_hierarchy(SAMPLE).unwrap();
        let flat = flatten(&root).unwrap();

        let particle = flat.concepts.iter().find(|c| c.id == "PAR002").unwrap();
        assert_eq!(particle.layer, ConceptType::Particle);
        assert_eq!(particle.parent_id.as_deref(), Some("ATM001"));
        assert!(flat.relationships.contains(&ContainsEdge {
            parent_id: "ATM001".into(),
            child_id: "PAR002".into(),
        }));
    }

    #[test]
    fn test_every_non_root_has_one_parent() {
        let root = parse_hierarchy(SAMPLE).unwrap();
        let flat = flatten(&root).unwrap();
        for concept in flat.concepts.iter().skip(1) {
            let incoming = flat
                .relationships
                .iter()
                .filter(|e| e.child_id == concept.id)
                .count();
            assert_eq!(incoming, 1, "{} should have exactly one parent", concept.id);
        }
    }

    #[test]
    fn test_rejects_duplicate_id() {
        let json = r#"{"id":"OLM001","name":"Maths","layer":"Subject",
            "children":[{"id":"OLM001","name":"Again","layer":"Matter"}]}"#;
        let err = flatten(&parse_hierarchy(json).unwrap()).unwrap_err();
        assert!(err.to_string().contains("duplicate concept id OLM001"));
    }

    #[test]
    fn test_rejects_layer_skip() {
        let json = r#"{"id":"OLM001","name":"Maths","layer":"Subject",
            "children":[{"id":"ATM001","name":"Skip","layer":"Atom"}]}"#;
        let err = flatten(&parse_hierarchy(json).unwrap()).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidHierarchy(_)));
    }

    #[test]
    fn test_rejects_particles_outside_atoms() {
        let json = r#"{"id":"OLM009","name":"Maths","layer":"Subject",
            "children":[{"id":"MAT009","name":"Ratios","layer":"Matter",
                "particles":[{"id":"PAR009","name":"Orphan"}]}]}"#;
        let err = flatten(&parse_hierarchy(json).unwrap()).unwrap_err();
        assert!(err.to_string().contains("only atoms may"));
    }

    #[test]
    fn test_rejects_non_subject_root() {
        for json in [
            r#"{"id":"MAT001","name":"Algebra","layer":"Matter"}"#,
            r#"{"id":"ATM001","name":"One Variable","layer":"Atom",
                "particles":[{"id":"PAR001","name":"Isolating the variable"}]}"#,
        ] {
            let err = flatten(&parse_hierarchy(json).unwrap()).unwrap_err();
            assert!(matches!(err, CatalogError::InvalidHierarchy(_)));
            assert!(err.to_string().contains("rooted at a Subject"));
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let root = load_hierarchy(file.path()).unwrap();
        assert_eq!(root.id, "OLM001");
        assert_eq!(root.children.len(), 2);
    }
}
