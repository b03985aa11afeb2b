//! Flat seed documents: grades and topics, prerequisites, resources,
//! questions. Every script is a no-op unless `seed_data` is set.

use anyhow::{Context, Result};
use async_trait::async_trait;
use syllabus_core::seed::{load_grades, load_prerequisites, load_questions, load_resources};
use syllabus_core::{Concept, ConceptType};
use syllabus_graph::relations::{link_child, link_equivalent, link_prerequisite};
use tracing::{debug, info, warn};

use crate::script::{SetupContext, SetupScript};

fn seeding_disabled(ctx: &SetupContext, script: &str) -> bool {
    if !ctx.config.seed_data {
        info!(script, "SEED_DATA disabled, skipping");
        return true;
    }
    false
}

pub struct SeedGradesTopics;

#[async_trait]
impl SetupScript for SeedGradesTopics {
    fn name(&self) -> &str {
        "seed-grades-topics"
    }

    fn description(&self) -> &str {
        "Create Grade and Topic concepts with SAME_AS links"
    }

    fn depends_on(&self) -> &[&'static str] {
        &["import-concepts-graph"]
    }

    async fn run(&self, ctx: &SetupContext) -> Result<()> {
        if seeding_disabled(ctx, self.name()) {
            return Ok(());
        }
        let grades = load_grades(&ctx.config.data_dir)?;
        let store = ctx.store.as_ref();

        let mut topics = 0;
        let mut equivalences = 0;
        for grade in &grades {
            store
                .upsert_concept(&Concept::new(&grade.id, &grade.name, ConceptType::Grade))
                .await
                .with_context(|| format!("Failed to upsert grade {}", grade.id))?;

            for topic in &grade.topics {
                let mut concept = Concept::new(&topic.id, &topic.name, ConceptType::Topic);
                concept.description = topic.description.clone();
                store
                    .upsert_concept(&concept)
                    .await
                    .with_context(|| format!("Failed to upsert topic {}", topic.id))?;
                link_child(store, &grade.id, &topic.id).await?;
                topics += 1;

                if let Some(canonical) = &topic.same_as {
                    if link_equivalent(store, &topic.id, canonical).await? {
                        equivalences += 1;
                    } else {
                        warn!(topic = %topic.id, canonical = %canonical, "SAME_AS target not found");
                    }
                }
            }
        }

        info!(grades = grades.len(), topics, equivalences, "Grades and topics seeded");
        Ok(())
    }
}

pub struct SeedPrerequisites;

#[async_trait]
impl SetupScript for SeedPrerequisites {
    fn name(&self) -> &str {
        "seed-prerequisites"
    }

    fn description(&self) -> &str {
        "Create HAS_PREREQUISITE edges between concepts"
    }

    fn depends_on(&self) -> &[&'static str] {
        &["import-concepts-graph"]
    }

    async fn run(&self, ctx: &SetupContext) -> Result<()> {
        if seeding_disabled(ctx, self.name()) {
            return Ok(());
        }
        let pairs = load_prerequisites(&ctx.config.data_dir)?;
        for pair in &pairs {
            link_prerequisite(ctx.store.as_ref(), &pair.concept_id, &pair.prerequisite_id)
                .await
                .with_context(|| format!("{} -> {}", pair.concept_id, pair.prerequisite_id))?;
            debug!(concept = %pair.concept_id, prerequisite = %pair.prerequisite_id, "Linked prerequisite");
        }
        info!(edges = pairs.len(), "Prerequisites seeded");
        Ok(())
    }
}

pub struct SeedResources;

#[async_trait]
impl SetupScript for SeedResources {
    fn name(&self) -> &str {
        "seed-resources"
    }

    fn description(&self) -> &str {
        "Create learning resources and EXPLAINS links to topics"
    }

    fn depends_on(&self) -> &[&'static str] {
        &["seed-grades-topics"]
    }

    async fn run(&self, ctx: &SetupContext) -> Result<()> {
        if seeding_disabled(ctx, self.name()) {
            return Ok(());
        }
        let resources = load_resources(&ctx.config.data_dir)?;
        for resource in &resources {
            ctx.store
                .upsert_resource(resource)
                .await
                .with_context(|| format!("Failed to upsert resource {}", resource.resource_id))?;
        }
        info!(resources = resources.len(), "Resources seeded");
        Ok(())
    }
}

pub struct SeedQuestions;

#[async_trait]
impl SetupScript for SeedQuestions {
    fn name(&self) -> &str {
        "seed-questions"
    }

    fn description(&self) -> &str {
        "Create assessment questions and ASSESSES links to concepts"
    }

    fn depends_on(&self) -> &[&'static str] {
        &["import-concepts-graph"]
    }

    async fn run(&self, ctx: &SetupContext) -> Result<()> {
        if seeding_disabled(ctx, self.name()) {
            return Ok(());
        }
        let questions = load_questions(&ctx.config.data_dir)?;
        for question in &questions {
            ctx.store
                .upsert_question(question)
                .await
                .with_context(|| format!("Failed to upsert question {}", question.question_id))?;
        }
        info!(questions = questions.len(), "Questions seeded");
        Ok(())
    }
}
