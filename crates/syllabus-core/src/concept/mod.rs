//! Curriculum concepts and the layer hierarchy.

pub mod hierarchy;
pub mod model;

use crate::error::{CatalogError, CatalogResult};
use model::Concept;

/// Check that `parent` may hold `child` through a CONTAINS edge.
pub fn check_contains(parent: &Concept, child: &Concept) -> CatalogResult<()> {
    if parent.id == child.id {
        return Err(CatalogError::validation("parentId", "a concept cannot contain itself"));
    }
    if !parent.concept_type.can_contain(child.concept_type) {
        return Err(CatalogError::validation(
            "parentId",
            format!(
                "a {} cannot contain a {}",
                parent.concept_type, child.concept_type
            ),
        ));
    }
    Ok(())
}
