//! Resource route handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use syllabus_core::resource::model::{Resource, UpdateResourceRequest};
use syllabus_core::{CatalogError, ConceptType};

use crate::auth::AuthUser;
use crate::error::{ApiJson, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceFilter {
    pub topic_id: Option<String>,
}

async fn load_resource(state: &AppState, id: &str) -> ApiResult<Resource> {
    state
        .store
        .get_resource(id)
        .await?
        .ok_or_else(|| CatalogError::ResourceNotFound(id.to_string()).into())
}

/// The EXPLAINS target must be an existing Topic.
async fn check_topic(state: &AppState, topic_id: Option<&str>) -> ApiResult<()> {
    let Some(topic_id) = topic_id else {
        return Ok(());
    };
    match state.store.get_concept(topic_id).await? {
        Some(c) if c.concept_type == ConceptType::Topic => Ok(()),
        Some(c) => Err(CatalogError::validation(
            "topicId",
            format!("{} is a {}, not a Topic", topic_id, c.concept_type),
        )
        .into()),
        None => Err(CatalogError::validation("topicId", format!("unknown topic {}", topic_id)).into()),
    }
}

pub async fn list_resources(
    State(state): State<AppState>,
    Query(filter): Query<ResourceFilter>,
) -> ApiResult<Json<Vec<Resource>>> {
    Ok(Json(state.store.list_resources(filter.topic_id.as_deref()).await?))
}

pub async fn get_resource(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Resource>> {
    Ok(Json(load_resource(&state, &id).await?))
}

pub async fn create_resource(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(resource): ApiJson<Resource>,
) -> ApiResult<(StatusCode, Json<Resource>)> {
    user.require_admin()?;
    resource.validate()?;
    if state.store.get_resource(&resource.resource_id).await?.is_some() {
        return Err(CatalogError::AlreadyExists {
            entity: "Resource",
            id: resource.resource_id,
        }
        .into());
    }
    check_topic(&state, resource.topic_id.as_deref()).await?;

    state.store.upsert_resource(&resource).await?;
    Ok((StatusCode::CREATED, Json(resource)))
}

pub async fn update_resource(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateResourceRequest>,
) -> ApiResult<Json<Resource>> {
    user.require_admin()?;
    let current = load_resource(&state, &id).await?;
    let updated = req.apply(&current)?;
    if req.topic_id.is_some() {
        check_topic(&state, updated.topic_id.as_deref()).await?;
    }
    state.store.upsert_resource(&updated).await?;
    Ok(Json(updated))
}

pub async fn delete_resource(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    user.require_admin()?;
    if !state.store.delete_resource(&id).await? {
        return Err(CatalogError::ResourceNotFound(id).into());
    }
    Ok(StatusCode::NO_CONTENT)
}
