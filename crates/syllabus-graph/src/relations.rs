//! Checked edge creation shared by the REST layer and the seed scripts.

use syllabus_core::concept::check_contains;
use syllabus_core::{CatalogError, CatalogResult, ConceptType};

use crate::store::CatalogStore;

/// Add `concept -[:HAS_PREREQUISITE]-> prerequisite`, keeping the relation acyclic.
pub async fn link_prerequisite(
    store: &dyn CatalogStore,
    concept_id: &str,
    prerequisite_id: &str,
) -> CatalogResult<()> {
    if concept_id == prerequisite_id {
        return Err(CatalogError::validation(
            "prerequisiteId",
            "a concept cannot be its own prerequisite",
        ));
    }
    for id in [concept_id, prerequisite_id] {
        if store.get_concept(id).await.map_err(CatalogError::store)?.is_none() {
            return Err(CatalogError::ConceptNotFound(id.to_string()));
        }
    }
    if store
        .prerequisite_path_exists(prerequisite_id, concept_id)
        .await
        .map_err(CatalogError::store)?
    {
        return Err(CatalogError::validation(
            "prerequisiteId",
            format!(
                "{} already depends on {}; the edge would create a cycle",
                prerequisite_id, concept_id
            ),
        ));
    }
    store
        .add_prerequisite(concept_id, prerequisite_id)
        .await
        .map_err(CatalogError::store)?;
    Ok(())
}

/// Add `parent -[:CONTAINS]-> child` when the layers allow it and the child
/// has no parent yet.
pub async fn link_child(store: &dyn CatalogStore, parent_id: &str, child_id: &str) -> CatalogResult<()> {
    let parent = store
        .get_concept(parent_id)
        .await
        .map_err(CatalogError::store)?
        .ok_or_else(|| CatalogError::ConceptNotFound(parent_id.to_string()))?;
    let child = store
        .get_concept(child_id)
        .await
        .map_err(CatalogError::store)?
        .ok_or_else(|| CatalogError::ConceptNotFound(child_id.to_string()))?;

    check_contains(&parent, &child)?;

    if let Some(existing) = store.get_parent(child_id).await.map_err(CatalogError::store)? {
        if existing.id != parent.id {
            return Err(CatalogError::validation(
                "parentId",
                format!("{} is already contained by {}", child_id, existing.id),
            ));
        }
    }

    store
        .link_contains(parent_id, child_id)
        .await
        .map_err(CatalogError::store)?;
    Ok(())
}

/// Link a Topic to its canonical concept by id or name.
pub async fn link_equivalent(store: &dyn CatalogStore, topic_id: &str, canonical: &str) -> CatalogResult<bool> {
    let topic = store
        .get_concept(topic_id)
        .await
        .map_err(CatalogError::store)?
        .ok_or_else(|| CatalogError::ConceptNotFound(topic_id.to_string()))?;
    if topic.concept_type != ConceptType::Topic {
        return Err(CatalogError::validation(
            "sameAs",
            format!("{} is a {}, only topics carry SAME_AS links", topic_id, topic.concept_type),
        ));
    }
    store
        .link_same_as(topic_id, canonical)
        .await
        .map_err(CatalogError::store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use syllabus_core::Concept;

    async fn store_with(concepts: &[(&str, ConceptType)]) -> MemoryStore {
        let store = MemoryStore::new();
        for (id, t) in concepts {
            store.upsert_concept(&Concept::new(*id, *id, *t)).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_prerequisite_cycle_rejected() {
        let store = store_with(&[
            ("ATM001", ConceptType::Atom),
            ("ATM002", ConceptType::Atom),
            ("ATM003", ConceptType::Atom),
        ])
        .await;

        link_prerequisite(&store, "ATM002", "ATM001").await.unwrap();
        link_prerequisite(&store, "ATM003", "ATM002").await.unwrap();

        let err = link_prerequisite(&store, "ATM001", "ATM003").await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert!(store.get_prerequisites("ATM001").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_prerequisite_missing_endpoint() {
        let store = store_with(&[("ATM001", ConceptType::Atom)]).await;
        let err = link_prerequisite(&store, "ATM001", "ATM404").await.unwrap_err();
        assert!(matches!(err, CatalogError::ConceptNotFound(id) if id == "ATM404"));
    }

    #[tokio::test]
    async fn test_child_layer_and_single_parent() {
        let store = store_with(&[
            ("MOL001", ConceptType::Molecule),
            ("MOL002", ConceptType::Molecule),
            ("ATM001", ConceptType::Atom),
            ("PAR001", ConceptType::Particle),
        ])
        .await;

        assert!(link_child(&store, "MOL001", "PAR001").await.is_err());
        link_child(&store, "MOL001", "ATM001").await.unwrap();
        link_child(&store, "MOL001", "ATM001").await.unwrap();
        assert!(link_child(&store, "MOL002", "ATM001").await.is_err());
    }

    #[tokio::test]
    async fn test_same_as_only_from_topics() {
        let store = store_with(&[
            ("MOL001", ConceptType::Molecule),
            ("TOP001", ConceptType::Topic),
        ])
        .await;
        assert!(link_equivalent(&store, "TOP001", "MOL001").await.unwrap());
        assert!(link_equivalent(&store, "MOL001", "TOP001").await.is_err());
    }
}
