//! CatalogStore trait definition
//!
//! Abstract interface for every graph operation used by the importer,
//! the validator, the setup scripts and the REST layer. `Neo4jStore` is the
//! production backend; `MemoryStore` keeps the same semantics in memory.

use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use syllabus_core::learning::LearningPath;
use syllabus_core::question::Question;
use syllabus_core::resource::Resource;
use syllabus_core::{Concept, ConceptType};

#[async_trait]
pub trait CatalogStore: Send + Sync {
    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Verify the backend answers queries.
    async fn health_check(&self) -> Result<()>;

    /// Create constraints and indexes. Idempotent.
    async fn apply_schema(&self) -> Result<()>;

    /// DETACH DELETE every node.
    async fn clear_all(&self) -> Result<()>;

    // ========================================================================
    // Concepts
    // ========================================================================

    /// Match-or-create by id. `createdAt` is only written on create.
    async fn upsert_concept(&self, concept: &Concept) -> Result<()>;

    async fn get_concept(&self, id: &str) -> Result<Option<Concept>>;

    /// All concepts, optionally of one type, ordered by id.
    async fn list_concepts(&self, concept_type: Option<ConceptType>) -> Result<Vec<Concept>>;

    /// Returns false when no such concept exists.
    async fn delete_concept(&self, id: &str) -> Result<bool>;

    /// MERGE a CONTAINS edge. Returns false when an endpoint is missing.
    async fn link_contains(&self, parent_id: &str, child_id: &str) -> Result<bool>;

    async fn get_children(&self, id: &str) -> Result<Vec<Concept>>;

    async fn get_parent(&self, id: &str) -> Result<Option<Concept>>;

    /// MERGE a HAS_PREREQUISITE edge. Returns false when an endpoint is missing.
    async fn add_prerequisite(&self, concept_id: &str, prerequisite_id: &str) -> Result<bool>;

    async fn get_prerequisites(&self, id: &str) -> Result<Vec<Concept>>;

    /// Whether `to` is reachable from `from` over HAS_PREREQUISITE edges.
    async fn prerequisite_path_exists(&self, from: &str, to: &str) -> Result<bool>;

    /// MERGE a SAME_AS edge from a topic to the concept matching `canonical`
    /// by id or by name. Returns false when nothing matches.
    async fn link_same_as(&self, topic_id: &str, canonical: &str) -> Result<bool>;

    // ========================================================================
    // Resources
    // ========================================================================

    /// Match-or-create by `resourceId`, replacing the EXPLAINS edge.
    async fn upsert_resource(&self, resource: &Resource) -> Result<()>;

    async fn get_resource(&self, id: &str) -> Result<Option<Resource>>;

    async fn list_resources(&self, topic_id: Option<&str>) -> Result<Vec<Resource>>;

    async fn delete_resource(&self, id: &str) -> Result<bool>;

    // ========================================================================
    // Questions
    // ========================================================================

    /// Match-or-create by `questionId`, replacing the ASSESSES edge.
    async fn upsert_question(&self, question: &Question) -> Result<()>;

    async fn get_question(&self, id: &str) -> Result<Option<Question>>;

    async fn list_questions(&self, concept_id: Option<&str>) -> Result<Vec<Question>>;

    async fn delete_question(&self, id: &str) -> Result<bool>;

    // ========================================================================
    // Learning paths
    // ========================================================================

    /// Persist a path with its owner and steps. Existing steps are replaced.
    async fn save_learning_path(&self, path: &LearningPath) -> Result<()>;

    /// Path with steps ordered by `stepNumber`.
    async fn get_learning_path(&self, id: &str) -> Result<Option<LearningPath>>;

    async fn list_learning_paths(&self, user_id: &str) -> Result<Vec<LearningPath>>;

    // ========================================================================
    // Statistics
    // ========================================================================

    async fn count_concepts(&self) -> Result<usize>;

    async fn count_contains(&self) -> Result<usize>;

    /// Concept count per `type` value.
    async fn type_distribution(&self) -> Result<BTreeMap<String, usize>>;

    /// Edges on the longest CONTAINS path starting at `root_id`.
    async fn max_depth(&self, root_id: &str) -> Result<usize>;

    /// Concepts reachable from `root_id` over CONTAINS, root included.
    async fn subtree_size(&self, root_id: &str) -> Result<usize>;

    /// Ids of concepts with more than one incoming CONTAINS edge.
    async fn multi_parent_concepts(&self) -> Result<Vec<String>>;

    /// Ids of Matter, Molecule, Atom and Particle concepts with no incoming
    /// CONTAINS edge.
    async fn orphan_concepts(&self) -> Result<Vec<String>>;
}
