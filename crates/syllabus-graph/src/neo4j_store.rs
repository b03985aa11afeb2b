//! `CatalogStore` over Neo4j.
//!
//! Graph layout:
//! - `(:Concept)-[:CONTAINS]->(:Concept)`
//! - `(:Concept)-[:HAS_PREREQUISITE]->(:Concept)`
//! - `(:Concept {type:'Topic'})-[:SAME_AS]->(:Concept)`
//! - `(:Resource)-[:EXPLAINS]->(:Concept)`
//! - `(:Question)-[:ASSESSES]->(:Concept)`
//! - `(:User)-[:HAS_LEARNING_PATH]->(:LearningPath)-[:HAS_STEP]->(:LearningPathStep)`

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use neo4rs::{query, Node, Row};
use syllabus_core::learning::{LearningPath, LearningPathStep, PathStatus};
use syllabus_core::question::{Difficulty, Question, QuestionType};
use syllabus_core::resource::{Resource, ResourceType};
use syllabus_core::{Concept, ConceptType};
use tracing::debug;

use crate::store::CatalogStore;
use crate::{schema, GraphClient};

/// Neo4j-backed catalog store.
#[derive(Clone)]
pub struct Neo4jStore {
    client: GraphClient,
}

impl Neo4jStore {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    async fn concepts_from(&self, q: neo4rs::Query, field: &str) -> Result<Vec<Concept>> {
        let rows = self.client.query(q).await?;
        rows.iter().map(|row| row_node(row, field).and_then(|n| node_to_concept(&n))).collect()
    }

    async fn count(&self, q: neo4rs::Query) -> Result<usize> {
        let count: i64 = self.client.query_scalar(q, "count").await?.unwrap_or(0);
        Ok(count.max(0) as usize)
    }

    async fn steps_for(&self, path_id: &str) -> Result<Vec<LearningPathStep>> {
        let q = query(
            "MATCH (:LearningPath {id: $id})-[:HAS_STEP]->(s:LearningPathStep)
             RETURN s ORDER BY s.stepNumber",
        )
        .param("id", path_id);

        let rows = self.client.query(q).await?;
        rows.iter()
            .map(|row| {
                let node = row_node(row, "s")?;
                Ok(LearningPathStep {
                    step_number: step_number(node.get("stepNumber")?, path_id)?,
                    concept_id: node.get("conceptId")?,
                    title: node.get("title")?,
                    description: node.get("description").ok(),
                })
            })
            .collect()
    }
}

fn row_node(row: &Row, field: &str) -> Result<Node> {
    row.get::<Node>(field)
        .map_err(|e| anyhow::anyhow!("Failed to get node '{}': {:?}", field, e))
}

fn step_number(raw: i64, path_id: &str) -> Result<u32> {
    u32::try_from(raw).with_context(|| format!("Step number {} out of range in path {}", raw, path_id))
}

fn parse_time(raw: Option<String>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|t| t.with_timezone(&Utc))
}

fn node_to_concept(node: &Node) -> Result<Concept> {
    let raw_type: String = node.get("type")?;
    Ok(Concept {
        id: node.get("id")?,
        name: node.get("name")?,
        concept_type: raw_type.parse::<ConceptType>().context("Unknown concept type in graph")?,
        description: node.get("description").ok(),
        created_at: parse_time(node.get("createdAt").ok()).unwrap_or_else(Utc::now),
        updated_at: parse_time(node.get("updatedAt").ok()),
    })
}

fn node_to_resource(node: &Node, topic_id: Option<String>) -> Result<Resource> {
    let raw_type: String = node.get("type")?;
    Ok(Resource {
        resource_id: node.get("resourceId")?,
        title: node.get("title")?,
        resource_type: ResourceType::parse(&raw_type)
            .ok_or_else(|| anyhow::anyhow!("Unknown resource type '{}'", raw_type))?,
        url: node.get("url")?,
        price: node.get("price")?,
        grade: node.get("grade")?,
        topic_id,
    })
}

fn node_to_question(node: &Node, concept_id: String) -> Result<Question> {
    let raw_type: String = node.get("type")?;
    let raw_difficulty: String = node.get("difficulty")?;
    Ok(Question {
        question_id: node.get("questionId")?,
        text: node.get("text")?,
        question_type: QuestionType::parse(&raw_type)
            .ok_or_else(|| anyhow::anyhow!("Unknown question type '{}'", raw_type))?,
        options: node.get("options").unwrap_or_default(),
        answer: node.get("answer")?,
        difficulty: Difficulty::parse(&raw_difficulty)
            .ok_or_else(|| anyhow::anyhow!("Unknown difficulty '{}'", raw_difficulty))?,
        concept_id,
    })
}

#[async_trait]
impl CatalogStore for Neo4jStore {
    async fn health_check(&self) -> Result<()> {
        self.client.ping().await.map(|_| ())
    }

    async fn apply_schema(&self) -> Result<()> {
        schema::initialize_schema(&self.client).await
    }

    async fn clear_all(&self) -> Result<()> {
        self.client.execute(query("MATCH (n) DETACH DELETE n")).await
    }

    // ========================================================================
    // Concepts
    // ========================================================================

    async fn upsert_concept(&self, concept: &Concept) -> Result<()> {
        let q = query(
            "MERGE (c:Concept {id: $id})
             ON CREATE SET c.createdAt = $created_at
             SET c.name = $name,
                 c.type = $type,
                 c.description = coalesce($description, c.description),
                 c.updatedAt = coalesce($updated_at, c.updatedAt)",
        )
        .param("id", concept.id.as_str())
        .param("name", concept.name.as_str())
        .param("type", concept.concept_type.as_str())
        .param("description", concept.description.clone())
        .param("created_at", concept.created_at.to_rfc3339())
        .param("updated_at", concept.updated_at.map(|t| t.to_rfc3339()));

        self.client.execute(q).await?;
        debug!(id = %concept.id, concept_type = %concept.concept_type, "Upserted concept");
        Ok(())
    }

    async fn get_concept(&self, id: &str) -> Result<Option<Concept>> {
        let q = query("MATCH (c:Concept {id: $id}) RETURN c").param("id", id);
        Ok(self.concepts_from(q, "c").await?.into_iter().next())
    }

    async fn list_concepts(&self, concept_type: Option<ConceptType>) -> Result<Vec<Concept>> {
        let q = match concept_type {
            Some(t) => query("MATCH (c:Concept {type: $type}) RETURN c ORDER BY c.id")
                .param("type", t.as_str()),
            None => query("MATCH (c:Concept) RETURN c ORDER BY c.id"),
        };
        self.concepts_from(q, "c").await
    }

    async fn delete_concept(&self, id: &str) -> Result<bool> {
        let q = query(
            "MATCH (c:Concept {id: $id})
             DETACH DELETE c
             RETURN count(*) AS count",
        )
        .param("id", id);
        Ok(self.count(q).await? > 0)
    }

    async fn link_contains(&self, parent_id: &str, child_id: &str) -> Result<bool> {
        let q = query(
            "MATCH (p:Concept {id: $parent_id}), (c:Concept {id: $child_id})
             MERGE (p)-[:CONTAINS]->(c)
             RETURN count(*) AS count",
        )
        .param("parent_id", parent_id)
        .param("child_id", child_id);
        Ok(self.count(q).await? > 0)
    }

    async fn get_children(&self, id: &str) -> Result<Vec<Concept>> {
        let q = query(
            "MATCH (:Concept {id: $id})-[:CONTAINS]->(c:Concept)
             RETURN c ORDER BY c.id",
        )
        .param("id", id);
        self.concepts_from(q, "c").await
    }

    async fn get_parent(&self, id: &str) -> Result<Option<Concept>> {
        let q = query(
            "MATCH (p:Concept)-[:CONTAINS]->(:Concept {id: $id})
             RETURN p ORDER BY p.id LIMIT 1",
        )
        .param("id", id);
        Ok(self.concepts_from(q, "p").await?.into_iter().next())
    }

    async fn add_prerequisite(&self, concept_id: &str, prerequisite_id: &str) -> Result<bool> {
        let q = query(
            "MATCH (c:Concept {id: $concept_id}), (p:Concept {id: $prerequisite_id})
             MERGE (c)-[:HAS_PREREQUISITE]->(p)
             RETURN count(*) AS count",
        )
        .param("concept_id", concept_id)
        .param("prerequisite_id", prerequisite_id);
        Ok(self.count(q).await? > 0)
    }

    async fn get_prerequisites(&self, id: &str) -> Result<Vec<Concept>> {
        let q = query(
            "MATCH (:Concept {id: $id})-[:HAS_PREREQUISITE]->(p:Concept)
             RETURN p ORDER BY p.id",
        )
        .param("id", id);
        self.concepts_from(q, "p").await
    }

    async fn prerequisite_path_exists(&self, from: &str, to: &str) -> Result<bool> {
        if from == to {
            return Ok(true);
        }
        let q = query(
            "MATCH (a:Concept {id: $from}), (b:Concept {id: $to})
             MATCH path = (a)-[:HAS_PREREQUISITE*1..]->(b)
             RETURN count(path) AS count
             LIMIT 1",
        )
        .param("from", from)
        .param("to", to);
        Ok(self.count(q).await? > 0)
    }

    async fn link_same_as(&self, topic_id: &str, canonical: &str) -> Result<bool> {
        let q = query(
            "MATCH (t:Concept {id: $topic_id})
             MATCH (c:Concept)
             WHERE c <> t AND (c.id = $canonical OR c.name = $canonical)
             WITH t, c ORDER BY c.id LIMIT 1
             MERGE (t)-[:SAME_AS]->(c)
             RETURN count(*) AS count",
        )
        .param("topic_id", topic_id)
        .param("canonical", canonical);
        Ok(self.count(q).await? > 0)
    }

    // ========================================================================
    // Resources
    // ========================================================================

    async fn upsert_resource(&self, resource: &Resource) -> Result<()> {
        let q = query(
            "MERGE (r:Resource {resourceId: $id})
             SET r.title = $title,
                 r.type = $type,
                 r.url = $url,
                 r.price = $price,
                 r.grade = $grade
             WITH r
             OPTIONAL MATCH (r)-[old:EXPLAINS]->()
             DELETE old",
        )
        .param("id", resource.resource_id.as_str())
        .param("title", resource.title.as_str())
        .param("type", resource.resource_type.as_str())
        .param("url", resource.url.as_str())
        .param("price", resource.price)
        .param("grade", resource.grade);
        self.client.execute(q).await?;

        if let Some(topic_id) = &resource.topic_id {
            let link = query(
                "MATCH (r:Resource {resourceId: $id}), (t:Concept {id: $topic_id})
                 MERGE (r)-[:EXPLAINS]->(t)",
            )
            .param("id", resource.resource_id.as_str())
            .param("topic_id", topic_id.as_str());
            self.client.execute(link).await?;
        }
        Ok(())
    }

    async fn get_resource(&self, id: &str) -> Result<Option<Resource>> {
        let q = query(
            "MATCH (r:Resource {resourceId: $id})
             OPTIONAL MATCH (r)-[:EXPLAINS]->(t:Concept)
             RETURN r, t.id AS topic_id",
        )
        .param("id", id);
        let rows = self.client.query(q).await?;
        match rows.first() {
            Some(row) => Ok(Some(node_to_resource(
                &row_node(row, "r")?,
                row.get("topic_id").ok(),
            )?)),
            None => Ok(None),
        }
    }

    async fn list_resources(&self, topic_id: Option<&str>) -> Result<Vec<Resource>> {
        let q = match topic_id {
            Some(topic) => query(
                "MATCH (r:Resource)-[:EXPLAINS]->(t:Concept {id: $topic_id})
                 RETURN r, t.id AS topic_id ORDER BY r.resourceId",
            )
            .param("topic_id", topic),
            None => query(
                "MATCH (r:Resource)
                 OPTIONAL MATCH (r)-[:EXPLAINS]->(t:Concept)
                 RETURN r, t.id AS topic_id ORDER BY r.resourceId",
            ),
        };
        let rows = self.client.query(q).await?;
        rows.iter()
            .map(|row| node_to_resource(&row_node(row, "r")?, row.get("topic_id").ok()))
            .collect()
    }

    async fn delete_resource(&self, id: &str) -> Result<bool> {
        let q = query(
            "MATCH (r:Resource {resourceId: $id})
             DETACH DELETE r
             RETURN count(*) AS count",
        )
        .param("id", id);
        Ok(self.count(q).await? > 0)
    }

    // ========================================================================
    // Questions
    // ========================================================================

    async fn upsert_question(&self, question: &Question) -> Result<()> {
        let q = query(
            "MERGE (q:Question {questionId: $id})
             SET q.text = $text,
                 q.type = $type,
                 q.options = $options,
                 q.answer = $answer,
                 q.difficulty = $difficulty
             WITH q
             OPTIONAL MATCH (q)-[old:ASSESSES]->()
             DELETE old
             WITH DISTINCT q
             MATCH (c:Concept {id: $concept_id})
             MERGE (q)-[:ASSESSES]->(c)",
        )
        .param("id", question.question_id.as_str())
        .param("text", question.text.as_str())
        .param("type", question.question_type.as_str())
        .param("options", question.options.clone())
        .param("answer", question.answer.as_str())
        .param("difficulty", question.difficulty.as_str())
        .param("concept_id", question.concept_id.as_str());
        self.client.execute(q).await
    }

    async fn get_question(&self, id: &str) -> Result<Option<Question>> {
        let q = query(
            "MATCH (q:Question {questionId: $id})
             OPTIONAL MATCH (q)-[:ASSESSES]->(c:Concept)
             RETURN q, coalesce(c.id, '') AS concept_id",
        )
        .param("id", id);
        let rows = self.client.query(q).await?;
        match rows.first() {
            Some(row) => Ok(Some(node_to_question(
                &row_node(row, "q")?,
                row.get("concept_id").unwrap_or_default(),
            )?)),
            None => Ok(None),
        }
    }

    async fn list_questions(&self, concept_id: Option<&str>) -> Result<Vec<Question>> {
        let q = match concept_id {
            Some(concept) => query(
                "MATCH (q:Question)-[:ASSESSES]->(c:Concept {id: $concept_id})
                 RETURN q, c.id AS concept_id ORDER BY q.questionId",
            )
            .param("concept_id", concept),
            None => query(
                "MATCH (q:Question)
                 OPTIONAL MATCH (q)-[:ASSESSES]->(c:Concept)
                 RETURN q, coalesce(c.id, '') AS concept_id ORDER BY q.questionId",
            ),
        };
        let rows = self.client.query(q).await?;
        rows.iter()
            .map(|row| {
                node_to_question(&row_node(row, "q")?, row.get("concept_id").unwrap_or_default())
            })
            .collect()
    }

    async fn delete_question(&self, id: &str) -> Result<bool> {
        let q = query(
            "MATCH (q:Question {questionId: $id})
             DETACH DELETE q
             RETURN count(*) AS count",
        )
        .param("id", id);
        Ok(self.count(q).await? > 0)
    }

    // ========================================================================
    // Learning paths
    // ========================================================================

    async fn save_learning_path(&self, path: &LearningPath) -> Result<()> {
        let upsert = query(
            "MERGE (u:User {id: $user_id})
             MERGE (p:LearningPath {id: $id})
             ON CREATE SET p.createdAt = $created_at
             SET p.userId = $user_id,
                 p.goal = $goal,
                 p.status = $status,
                 p.updatedAt = $updated_at
             MERGE (u)-[:HAS_LEARNING_PATH]->(p)
             WITH p
             OPTIONAL MATCH (p)-[:HAS_STEP]->(old:LearningPathStep)
             DETACH DELETE old",
        )
        .param("id", path.id.as_str())
        .param("user_id", path.user_id.as_str())
        .param("goal", path.goal.as_str())
        .param("status", path.status.as_str())
        .param("created_at", path.created_at.to_rfc3339())
        .param("updated_at", path.updated_at.to_rfc3339());
        self.client.execute(upsert).await?;

        for step in &path.steps {
            let q = query(
                "MATCH (p:LearningPath {id: $id})
                 CREATE (p)-[:HAS_STEP]->(s:LearningPathStep {
                     stepNumber: $step_number,
                     conceptId: $concept_id,
                     title: $title,
                     description: $description
                 })",
            )
            .param("id", path.id.as_str())
            .param("step_number", step.step_number as i64)
            .param("concept_id", step.concept_id.as_str())
            .param("title", step.title.as_str())
            .param("description", step.description.clone());
            self.client.execute(q).await?;
        }

        debug!(path_id = %path.id, steps = path.steps.len(), status = path.status.as_str(), "Saved learning path");
        Ok(())
    }

    async fn get_learning_path(&self, id: &str) -> Result<Option<LearningPath>> {
        let q = query("MATCH (p:LearningPath {id: $id}) RETURN p").param("id", id);
        let rows = self.client.query(q).await?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };
        let node = row_node(row, "p")?;
        let raw_status: String = node.get("status")?;
        let created_at = parse_time(node.get("createdAt").ok()).unwrap_or_else(Utc::now);

        Ok(Some(LearningPath {
            id: node.get("id")?,
            user_id: node.get("userId")?,
            goal: node.get("goal")?,
            status: PathStatus::parse(&raw_status)
                .ok_or_else(|| anyhow::anyhow!("Unknown learning path status '{}'", raw_status))?,
            steps: self.steps_for(id).await?,
            created_at,
            updated_at: parse_time(node.get("updatedAt").ok()).unwrap_or(created_at),
        }))
    }

    async fn list_learning_paths(&self, user_id: &str) -> Result<Vec<LearningPath>> {
        let q = query(
            "MATCH (:User {id: $user_id})-[:HAS_LEARNING_PATH]->(p:LearningPath)
             RETURN p.id AS id ORDER BY p.createdAt DESC",
        )
        .param("user_id", user_id);
        let rows = self.client.query(q).await?;

        let mut paths = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.get("id").context("Missing learning path id")?;
            if let Some(path) = self.get_learning_path(&id).await? {
                paths.push(path);
            }
        }
        Ok(paths)
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    async fn count_concepts(&self) -> Result<usize> {
        self.count(query("MATCH (c:Concept) RETURN count(c) AS count")).await
    }

    async fn count_contains(&self) -> Result<usize> {
        self.count(query(
            "MATCH (:Concept)-[r:CONTAINS]->(:Concept) RETURN count(r) AS count",
        ))
        .await
    }

    async fn type_distribution(&self) -> Result<BTreeMap<String, usize>> {
        let rows = self
            .client
            .query(query(
                "MATCH (c:Concept) RETURN c.type AS type, count(c) AS count",
            ))
            .await?;

        let mut distribution = BTreeMap::new();
        for row in rows {
            let concept_type: String = row.get("type").unwrap_or_else(|_| "Unknown".to_string());
            let count: i64 = row.get("count").unwrap_or(0);
            distribution.insert(concept_type, count.max(0) as usize);
        }
        Ok(distribution)
    }

    async fn max_depth(&self, root_id: &str) -> Result<usize> {
        let q = query(
            "MATCH path = (:Concept {id: $id})-[:CONTAINS*0..]->(leaf:Concept)
             WHERE NOT (leaf)-[:CONTAINS]->()
             RETURN coalesce(max(length(path)), 0) AS count",
        )
        .param("id", root_id);
        self.count(q).await
    }

    async fn subtree_size(&self, root_id: &str) -> Result<usize> {
        let q = query(
            "MATCH (:Concept {id: $id})-[:CONTAINS*0..]->(c:Concept)
             RETURN count(DISTINCT c) AS count",
        )
        .param("id", root_id);
        self.count(q).await
    }

    async fn multi_parent_concepts(&self) -> Result<Vec<String>> {
        let rows = self
            .client
            .query(query(
                "MATCH (p:Concept)-[:CONTAINS]->(c:Concept)
                 WITH c, count(p) AS parents
                 WHERE parents > 1
                 RETURN c.id AS id ORDER BY id",
            ))
            .await?;
        rows.iter()
            .map(|row| row.get::<String>("id").context("Missing concept id"))
            .collect()
    }

    async fn orphan_concepts(&self) -> Result<Vec<String>> {
        let rows = self
            .client
            .query(query(
                "MATCH (c:Concept)
                 WHERE c.type IN ['Matter', 'Molecule', 'Atom', 'Particle']
                   AND NOT ()-[:CONTAINS]->(c)
                 RETURN c.id AS id ORDER BY id",
            ))
            .await?;
        rows.iter()
            .map(|row| row.get::<String>("id").context("Missing concept id"))
            .collect()
    }
}
