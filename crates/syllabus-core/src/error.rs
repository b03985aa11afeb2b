//! Centralized error types for the syllabus catalog.

use thiserror::Error;

use crate::validation::FieldError;

/// Main error type for catalog operations.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Concept not found: {0}")]
    ConceptNotFound(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Question not found: {0}")]
    QuestionNotFound(String),

    #[error("Learning path not found: {0}")]
    LearningPathNotFound(String),

    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },

    #[error("{entity} {id} is still referenced: {reason}")]
    InUse {
        entity: &'static str,
        id: String,
        reason: String,
    },

    #[error("Validation failed: {}", format_fields(.0))]
    Validation(Vec<FieldError>),

    #[error("Invalid hierarchy: {0}")]
    InvalidHierarchy(String),

    #[error("Invalid status transition: cannot move from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    /// Create a single-field validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }

    /// Create a hierarchy error.
    pub fn hierarchy(msg: impl Into<String>) -> Self {
        Self::InvalidHierarchy(msg.into())
    }

    /// Wrap a backend failure.
    pub fn store(err: impl std::fmt::Display) -> Self {
        Self::Store(err.to_string())
    }
}

fn format_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_fields() {
        let err = CatalogError::Validation(vec![
            FieldError::new("name", "must not be empty"),
            FieldError::new("price", "must be >= 0"),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: name: must not be empty; price: must be >= 0"
        );
    }

    #[test]
    fn test_in_use_message() {
        let err = CatalogError::InUse {
            entity: "Concept",
            id: "MOL001".into(),
            reason: "it contains ATM001, ATM002".into(),
        };
        assert_eq!(err.to_string(), "Concept MOL001 is still referenced: it contains ATM001, ATM002");
    }
}
