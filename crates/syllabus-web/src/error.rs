//! HTTP error mapping.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use syllabus_core::validation::FieldError;
use syllabus_core::CatalogError;

/// Error returned by every handler; rendered as `{"error": message}`.
#[derive(Debug)]
pub enum AppError {
    Catalog(CatalogError),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    Internal(anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Catalog(e) => match e {
                CatalogError::ConceptNotFound(_)
                | CatalogError::ResourceNotFound(_)
                | CatalogError::QuestionNotFound(_)
                | CatalogError::LearningPathNotFound(_) => StatusCode::NOT_FOUND,
                CatalogError::AlreadyExists { .. } | CatalogError::InUse { .. } => StatusCode::CONFLICT,
                CatalogError::Validation(_)
                | CatalogError::InvalidHierarchy(_)
                | CatalogError::InvalidTransition { .. }
                | CatalogError::Json(_) => StatusCode::BAD_REQUEST,
                CatalogError::Store(_) | CatalogError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let fields: Option<Vec<FieldError>> = match &self {
            AppError::Catalog(CatalogError::Validation(fields)) => Some(fields.clone()),
            _ => None,
        };
        let message = match self {
            AppError::Catalog(e) => e.to_string(),
            AppError::BadRequest(msg) | AppError::Unauthorized(msg) | AppError::Forbidden(msg) => msg,
            AppError::Internal(e) => format!("{:#}", e),
        };
        if status.is_server_error() {
            tracing::error!(%status, error = %message, "Request failed");
        }

        let body = match fields {
            Some(fields) => json!({ "error": message, "fields": fields }),
            None => json!({ "error": message }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        AppError::Catalog(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// `Json` body extractor whose rejections render as 400 `AppError`s.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

pub type ApiResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CatalogError::ConceptNotFound("X".into()), StatusCode::NOT_FOUND),
            (
                CatalogError::AlreadyExists { entity: "Concept", id: "X".into() },
                StatusCode::CONFLICT,
            ),
            (
                CatalogError::InUse { entity: "Concept", id: "X".into(), reason: "it contains Y".into() },
                StatusCode::CONFLICT,
            ),
            (CatalogError::validation("name", "empty"), StatusCode::BAD_REQUEST),
            (
                CatalogError::InvalidTransition { from: "completed".into(), to: "processing".into() },
                StatusCode::BAD_REQUEST,
            ),
            (CatalogError::store("down"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }
}
