//! In-memory `CatalogStore`.
//!
//! Mirrors the Neo4j store's MERGE semantics over ordered maps and edge sets
//! behind a single `tokio::sync::RwLock`. Used by tests and by dry runs of the
//! setup CLI.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{bail, Result};
use async_trait::async_trait;
use syllabus_core::learning::LearningPath;
use syllabus_core::question::Question;
use syllabus_core::resource::Resource;
use syllabus_core::{Concept, ConceptType};
use tokio::sync::RwLock;

use crate::store::CatalogStore;

type Edge = (String, String);

#[derive(Default)]
struct Graph {
    concepts: BTreeMap<String, Concept>,
    contains: BTreeSet<Edge>,
    prerequisites: BTreeSet<Edge>,
    same_as: BTreeSet<Edge>,
    resources: BTreeMap<String, Resource>,
    questions: BTreeMap<String, Question>,
    users: BTreeSet<String>,
    paths: BTreeMap<String, LearningPath>,
}

impl Graph {
    fn targets<'a>(edges: &'a BTreeSet<Edge>, from: &'a str) -> impl Iterator<Item = &'a String> + 'a {
        edges.iter().filter(move |(a, _)| a == from).map(|(_, b)| b)
    }

    fn concepts_for<'a>(&'a self, ids: impl Iterator<Item = &'a String>) -> Vec<Concept> {
        ids.filter_map(|id| self.concepts.get(id)).cloned().collect()
    }

    fn depth_from(&self, id: &str, on_path: &mut HashSet<String>) -> usize {
        if !on_path.insert(id.to_string()) {
            return 0;
        }
        let depth = Self::targets(&self.contains, id)
            .map(|child| 1 + self.depth_from(child, on_path))
            .max()
            .unwrap_or(0);
        on_path.remove(id);
        depth
    }
}

/// In-memory catalog store.
#[derive(Default)]
pub struct MemoryStore {
    graph: RwLock<Graph>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `health_check` fail, as an unreachable database would.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn health_check(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            bail!("In-memory store is offline");
        }
        Ok(())
    }

    async fn apply_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn clear_all(&self) -> Result<()> {
        *self.graph.write().await = Graph::default();
        Ok(())
    }

    // ========================================================================
    // Concepts
    // ========================================================================

    async fn upsert_concept(&self, concept: &Concept) -> Result<()> {
        let mut graph = self.graph.write().await;
        match graph.concepts.get_mut(&concept.id) {
            Some(existing) => {
                existing.name = concept.name.clone();
                existing.concept_type = concept.concept_type;
                if concept.description.is_some() {
                    existing.description = concept.description.clone();
                }
                if concept.updated_at.is_some() {
                    existing.updated_at = concept.updated_at;
                }
            }
            None => {
                graph.concepts.insert(concept.id.clone(), concept.clone());
            }
        }
        Ok(())
    }

    async fn get_concept(&self, id: &str) -> Result<Option<Concept>> {
        Ok(self.graph.read().await.concepts.get(id).cloned())
    }

    async fn list_concepts(&self, concept_type: Option<ConceptType>) -> Result<Vec<Concept>> {
        let graph = self.graph.read().await;
        Ok(graph
            .concepts
            .values()
            .filter(|c| concept_type.is_none_or(|t| c.concept_type == t))
            .cloned()
            .collect())
    }

    async fn delete_concept(&self, id: &str) -> Result<bool> {
        let mut graph = self.graph.write().await;
        if graph.concepts.remove(id).is_none() {
            return Ok(false);
        }
        let touches = |(a, b): &Edge| a != id && b != id;
        graph.contains.retain(touches);
        graph.prerequisites.retain(touches);
        graph.same_as.retain(touches);
        for resource in graph.resources.values_mut() {
            if resource.topic_id.as_deref() == Some(id) {
                resource.topic_id = None;
            }
        }
        for question in graph.questions.values_mut() {
            if question.concept_id == id {
                question.concept_id.clear();
            }
        }
        Ok(true)
    }

    async fn link_contains(&self, parent_id: &str, child_id: &str) -> Result<bool> {
        let mut graph = self.graph.write().await;
        if !graph.concepts.contains_key(parent_id) || !graph.concepts.contains_key(child_id) {
            return Ok(false);
        }
        graph.contains.insert((parent_id.to_string(), child_id.to_string()));
        Ok(true)
    }

    async fn get_children(&self, id: &str) -> Result<Vec<Concept>> {
        let graph = self.graph.read().await;
        Ok(graph.concepts_for(Graph::targets(&graph.contains, id)))
    }

    async fn get_parent(&self, id: &str) -> Result<Option<Concept>> {
        let graph = self.graph.read().await;
        Ok(graph
            .contains
            .iter()
            .filter(|(_, child)| child == id)
            .filter_map(|(parent, _)| graph.concepts.get(parent))
            .min_by(|a, b| a.id.cmp(&b.id))
            .cloned())
    }

    async fn add_prerequisite(&self, concept_id: &str, prerequisite_id: &str) -> Result<bool> {
        let mut graph = self.graph.write().await;
        if !graph.concepts.contains_key(concept_id) || !graph.concepts.contains_key(prerequisite_id) {
            return Ok(false);
        }
        graph
            .prerequisites
            .insert((concept_id.to_string(), prerequisite_id.to_string()));
        Ok(true)
    }

    async fn get_prerequisites(&self, id: &str) -> Result<Vec<Concept>> {
        let graph = self.graph.read().await;
        Ok(graph.concepts_for(Graph::targets(&graph.prerequisites, id)))
    }

    async fn prerequisite_path_exists(&self, from: &str, to: &str) -> Result<bool> {
        if from == to {
            return Ok(true);
        }
        let graph = self.graph.read().await;
        let mut stack = vec![from.to_string()];
        let mut seen = HashSet::new();
        while let Some(current) = stack.pop() {
            for next in Graph::targets(&graph.prerequisites, &current) {
                if next == to {
                    return Ok(true);
                }
                if seen.insert(next.clone()) {
                    stack.push(next.clone());
                }
            }
        }
        Ok(false)
    }

    async fn link_same_as(&self, topic_id: &str, canonical: &str) -> Result<bool> {
        let mut graph = self.graph.write().await;
        if !graph.concepts.contains_key(topic_id) {
            return Ok(false);
        }
        let target = graph
            .concepts
            .values()
            .find(|c| c.id != topic_id && (c.id == canonical || c.name == canonical))
            .map(|c| c.id.clone());
        match target {
            Some(target) => {
                graph.same_as.insert((topic_id.to_string(), target));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ========================================================================
    // Resources
    // ========================================================================

    async fn upsert_resource(&self, resource: &Resource) -> Result<()> {
        let mut graph = self.graph.write().await;
        let mut stored = resource.clone();
        if let Some(topic) = &stored.topic_id {
            if !graph.concepts.contains_key(topic) {
                stored.topic_id = None;
            }
        }
        graph.resources.insert(stored.resource_id.clone(), stored);
        Ok(())
    }

    async fn get_resource(&self, id: &str) -> Result<Option<Resource>> {
        Ok(self.graph.read().await.resources.get(id).cloned())
    }

    async fn list_resources(&self, topic_id: Option<&str>) -> Result<Vec<Resource>> {
        let graph = self.graph.read().await;
        Ok(graph
            .resources
            .values()
            .filter(|r| topic_id.is_none_or(|t| r.topic_id.as_deref() == Some(t)))
            .cloned()
            .collect())
    }

    async fn delete_resource(&self, id: &str) -> Result<bool> {
        Ok(self.graph.write().await.resources.remove(id).is_some())
    }

    // ========================================================================
    // Questions
    // ========================================================================

    async fn upsert_question(&self, question: &Question) -> Result<()> {
        let mut graph = self.graph.write().await;
        let mut stored = question.clone();
        if !graph.concepts.contains_key(&stored.concept_id) {
            stored.concept_id.clear();
        }
        graph.questions.insert(stored.question_id.clone(), stored);
        Ok(())
    }

    async fn get_question(&self, id: &str) -> Result<Option<Question>> {
        Ok(self.graph.read().await.questions.get(id).cloned())
    }

    async fn list_questions(&self, concept_id: Option<&str>) -> Result<Vec<Question>> {
        let graph = self.graph.read().await;
        Ok(graph
            .questions
            .values()
            .filter(|q| concept_id.is_none_or(|c| q.concept_id == c))
            .cloned()
            .collect())
    }

    async fn delete_question(&self, id: &str) -> Result<bool> {
        Ok(self.graph.write().await.questions.remove(id).is_some())
    }

    // ========================================================================
    // Learning paths
    // ========================================================================

    async fn save_learning_path(&self, path: &LearningPath) -> Result<()> {
        let mut graph = self.graph.write().await;
        graph.users.insert(path.user_id.clone());
        let mut stored = path.clone();
        if let Some(existing) = graph.paths.get(&path.id) {
            stored.created_at = existing.created_at;
        }
        stored.sort_steps();
        graph.paths.insert(stored.id.clone(), stored);
        Ok(())
    }

    async fn get_learning_path(&self, id: &str) -> Result<Option<LearningPath>> {
        Ok(self.graph.read().await.paths.get(id).cloned())
    }

    async fn list_learning_paths(&self, user_id: &str) -> Result<Vec<LearningPath>> {
        let graph = self.graph.read().await;
        let mut paths: Vec<_> = graph
            .paths
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        paths.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paths)
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    async fn count_concepts(&self) -> Result<usize> {
        Ok(self.graph.read().await.concepts.len())
    }

    async fn count_contains(&self) -> Result<usize> {
        Ok(self.graph.read().await.contains.len())
    }

    async fn type_distribution(&self) -> Result<BTreeMap<String, usize>> {
        let graph = self.graph.read().await;
        let mut distribution = BTreeMap::new();
        for concept in graph.concepts.values() {
            *distribution
                .entry(concept.concept_type.as_str().to_string())
                .or_insert(0) += 1;
        }
        Ok(distribution)
    }

    async fn max_depth(&self, root_id: &str) -> Result<usize> {
        let graph = self.graph.read().await;
        if !graph.concepts.contains_key(root_id) {
            return Ok(0);
        }
        Ok(graph.depth_from(root_id, &mut HashSet::new()))
    }

    async fn subtree_size(&self, root_id: &str) -> Result<usize> {
        let graph = self.graph.read().await;
        if !graph.concepts.contains_key(root_id) {
            return Ok(0);
        }
        let mut seen = HashSet::from([root_id.to_string()]);
        let mut stack = vec![root_id.to_string()];
        while let Some(current) = stack.pop() {
            for child in Graph::targets(&graph.contains, &current) {
                if seen.insert(child.clone()) {
                    stack.push(child.clone());
                }
            }
        }
        Ok(seen.len())
    }

    async fn multi_parent_concepts(&self) -> Result<Vec<String>> {
        let graph = self.graph.read().await;
        let mut parents: BTreeMap<&str, usize> = BTreeMap::new();
        for (_, child) in &graph.contains {
            *parents.entry(child.as_str()).or_insert(0) += 1;
        }
        Ok(parents
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(id, _)| id.to_string())
            .collect())
    }

    async fn orphan_concepts(&self) -> Result<Vec<String>> {
        let graph = self.graph.read().await;
        let children: HashSet<&str> = graph.contains.iter().map(|(_, child)| child.as_str()).collect();
        Ok(graph
            .concepts
            .values()
            .filter(|c| c.concept_type.requires_parent() && !children.contains(c.id.as_str()))
            .map(|c| c.id.clone())
            .collect())
    }
}
