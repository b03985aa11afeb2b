//! Concept route handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use syllabus_core::concept::check_contains;
use syllabus_core::concept::model::{AddPrerequisiteRequest, CreateConceptRequest, UpdateConceptRequest};
use syllabus_core::{CatalogError, Concept, ConceptType};
use syllabus_graph::relations::link_prerequisite;

use crate::auth::AuthUser;
use crate::error::{ApiJson, ApiResult, AppError};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ConceptFilter {
    #[serde(rename = "type")]
    pub concept_type: Option<String>,
}

pub(crate) async fn load_concept(state: &AppState, id: &str) -> ApiResult<Concept> {
    state
        .store
        .get_concept(id)
        .await?
        .ok_or_else(|| CatalogError::ConceptNotFound(id.to_string()).into())
}

fn in_use(id: &str, reason: String) -> AppError {
    CatalogError::InUse {
        entity: "Concept",
        id: id.to_string(),
        reason,
    }
    .into()
}

pub async fn list_concepts(
    State(state): State<AppState>,
    Query(filter): Query<ConceptFilter>,
) -> ApiResult<Json<Vec<Concept>>> {
    let concept_type = filter
        .concept_type
        .as_deref()
        .map(str::parse::<ConceptType>)
        .transpose()?;
    Ok(Json(state.store.list_concepts(concept_type).await?))
}

pub async fn get_concept(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Concept>> {
    Ok(Json(load_concept(&state, &id).await?))
}

pub async fn create_concept(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(req): ApiJson<CreateConceptRequest>,
) -> ApiResult<(StatusCode, Json<Concept>)> {
    user.require_admin()?;
    req.validate()?;

    if state.store.get_concept(&req.id).await?.is_some() {
        return Err(CatalogError::AlreadyExists { entity: "Concept", id: req.id }.into());
    }

    let parent_id = req.parent_id.clone();
    let concept = req.into_concept();

    // Check the parent before writing so a bad parent leaves nothing behind.
    if let Some(parent_id) = &parent_id {
        let parent = load_concept(&state, parent_id).await?;
        check_contains(&parent, &concept)?;
    }

    state.store.upsert_concept(&concept).await?;
    if let Some(parent_id) = &parent_id {
        state.store.link_contains(parent_id, &concept.id).await?;
    }
    tracing::info!(id = %concept.id, concept_type = %concept.concept_type, user = %user.user_id, "Concept created");

    Ok((StatusCode::CREATED, Json(concept)))
}

pub async fn update_concept(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateConceptRequest>,
) -> ApiResult<Json<Concept>> {
    user.require_admin()?;
    req.validate()?;

    let mut concept = load_concept(&state, &id).await?;
    req.apply(&mut concept);
    state.store.upsert_concept(&concept).await?;

    Ok(Json(concept))
}

pub async fn delete_concept(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    user.require_admin()?;
    load_concept(&state, &id).await?;

    // Deleting would strand CONTAINS children or assessing questions.
    let children = state.store.get_children(&id).await?;
    if !children.is_empty() {
        let ids: Vec<_> = children.iter().map(|c| c.id.as_str()).collect();
        return Err(in_use(&id, format!("it contains {}", ids.join(", "))));
    }
    let questions = state.store.list_questions(Some(&id)).await?;
    if !questions.is_empty() {
        let ids: Vec<_> = questions.iter().map(|q| q.question_id.as_str()).collect();
        return Err(in_use(&id, format!("assessed by questions {}", ids.join(", "))));
    }

    if !state.store.delete_concept(&id).await? {
        return Err(CatalogError::ConceptNotFound(id).into());
    }
    tracing::info!(%id, user = %user.user_id, "Concept deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_children(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Vec<Concept>>> {
    load_concept(&state, &id).await?;
    Ok(Json(state.store.get_children(&id).await?))
}

/// The CONTAINS parent, or `null` for a root concept.
pub async fn get_parent(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Option<Concept>>> {
    load_concept(&state, &id).await?;
    Ok(Json(state.store.get_parent(&id).await?))
}

pub async fn get_prerequisites(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Concept>>> {
    load_concept(&state, &id).await?;
    Ok(Json(state.store.get_prerequisites(&id).await?))
}

pub async fn add_prerequisite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<AddPrerequisiteRequest>,
) -> ApiResult<(StatusCode, Json<Vec<Concept>>)> {
    user.require_admin()?;
    link_prerequisite(state.store.as_ref(), &id, &req.prerequisite_id).await?;
    Ok((StatusCode::CREATED, Json(state.store.get_prerequisites(&id).await?)))
}
