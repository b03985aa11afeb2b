//! Learning path route handlers. Paths are visible to their owner and to admins.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use syllabus_core::learning::model::{
    CreateLearningPathRequest, LearningPath, LearningPathStep, UpdateLearningPathRequest,
};
use syllabus_core::validation::FieldError;
use syllabus_core::CatalogError;

use crate::auth::AuthUser;
use crate::error::{ApiJson, ApiResult};
use crate::state::AppState;

/// Every step must point at an existing concept.
async fn check_steps(state: &AppState, steps: &[LearningPathStep]) -> ApiResult<()> {
    let mut missing = Vec::new();
    for (i, step) in steps.iter().enumerate() {
        if state.store.get_concept(&step.concept_id).await?.is_none() {
            missing.push(FieldError::new(
                format!("steps[{}].conceptId", i),
                format!("unknown concept {}", step.concept_id),
            ));
        }
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CatalogError::Validation(missing).into())
    }
}

async fn load_owned(state: &AppState, user: &AuthUser, id: &str) -> ApiResult<LearningPath> {
    let path = state
        .store
        .get_learning_path(id)
        .await?
        .ok_or_else(|| CatalogError::LearningPathNotFound(id.to_string()))?;
    user.require_self_or_admin(&path.user_id)?;
    Ok(path)
}

pub async fn create_learning_path(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(req): ApiJson<CreateLearningPathRequest>,
) -> ApiResult<(StatusCode, Json<LearningPath>)> {
    req.validate()?;
    check_steps(&state, &req.steps).await?;

    let path = req.into_path(&user.user_id);
    state.store.save_learning_path(&path).await?;
    tracing::info!(id = %path.id, user = %user.user_id, "Learning path created");

    Ok((StatusCode::CREATED, Json(path)))
}

pub async fn get_learning_path(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<LearningPath>> {
    Ok(Json(load_owned(&state, &user, &id).await?))
}

pub async fn update_learning_path(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateLearningPathRequest>,
) -> ApiResult<Json<LearningPath>> {
    let current = load_owned(&state, &user, &id).await?;
    let updated = req.apply(&current)?;
    if let Some(steps) = &req.steps {
        check_steps(&state, steps).await?;
    }
    state.store.save_learning_path(&updated).await?;
    tracing::info!(%id, status = updated.status.as_str(), steps = updated.steps.len(), "Learning path updated");

    Ok(Json(updated))
}

pub async fn list_user_learning_paths(
    State(state): State<AppState>,
    user: AuthUser,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<LearningPath>>> {
    user.require_self_or_admin(&user_id)?;
    Ok(Json(state.store.list_learning_paths(&user_id).await?))
}
