//! Question route handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use syllabus_core::question::model::{Question, UpdateQuestionRequest};
use syllabus_core::CatalogError;

use crate::auth::AuthUser;
use crate::error::{ApiJson, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionFilter {
    pub concept_id: Option<String>,
}

async fn load_question(state: &AppState, id: &str) -> ApiResult<Question> {
    state
        .store
        .get_question(id)
        .await?
        .ok_or_else(|| CatalogError::QuestionNotFound(id.to_string()).into())
}

async fn check_concept(state: &AppState, concept_id: &str) -> ApiResult<()> {
    if state.store.get_concept(concept_id).await?.is_none() {
        return Err(CatalogError::validation("conceptId", format!("unknown concept {}", concept_id)).into());
    }
    Ok(())
}

pub async fn list_questions(
    State(state): State<AppState>,
    Query(filter): Query<QuestionFilter>,
) -> ApiResult<Json<Vec<Question>>> {
    Ok(Json(state.store.list_questions(filter.concept_id.as_deref()).await?))
}

pub async fn get_question(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Question>> {
    Ok(Json(load_question(&state, &id).await?))
}

pub async fn create_question(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(question): ApiJson<Question>,
) -> ApiResult<(StatusCode, Json<Question>)> {
    user.require_admin()?;
    question.validate()?;
    if state.store.get_question(&question.question_id).await?.is_some() {
        return Err(CatalogError::AlreadyExists {
            entity: "Question",
            id: question.question_id,
        }
        .into());
    }
    check_concept(&state, &question.concept_id).await?;

    state.store.upsert_question(&question).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

pub async fn update_question(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateQuestionRequest>,
) -> ApiResult<Json<Question>> {
    user.require_admin()?;
    let current = load_question(&state, &id).await?;
    let updated = req.apply(&current)?;
    if updated.concept_id != current.concept_id {
        check_concept(&state, &updated.concept_id).await?;
    }
    state.store.upsert_question(&updated).await?;
    Ok(Json(updated))
}

pub async fn delete_question(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    user.require_admin()?;
    if !state.store.delete_question(&id).await? {
        return Err(CatalogError::QuestionNotFound(id).into());
    }
    Ok(StatusCode::NO_CONTENT)
}
