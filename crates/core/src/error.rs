use serde::Serialize;

use crate::types::DbId;

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// A singleton section that has never been saved.
    #[error("No {entity} content found")]
    NoContent { entity: &'static str },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Validation failed: {}", join_fields(.0))]
    InvalidFields(Vec<FieldError>),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Field-level detail for validation failures, empty for everything else.
    pub fn fields(&self) -> &[FieldError] {
        match self {
            CoreError::InvalidFields(fields) => fields,
            _ => &[],
        }
    }
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_fields_message_lists_every_field() {
        let err = CoreError::InvalidFields(vec![
            FieldError::new("main_title_en", "is required"),
            FieldError::new("main_title_tr", "is required"),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: main_title_en: is required; main_title_tr: is required"
        );
        assert_eq!(err.fields().len(), 2);
    }

    #[test]
    fn no_content_message() {
        let err = CoreError::NoContent {
            entity: "hero video",
        };
        assert_eq!(err.to_string(), "No hero video content found");
        assert!(err.fields().is_empty());
    }
}
