use reqwest::StatusCode;
use serde::Deserialize;
use vitrin_core::error::{CoreError, FieldError};

/// Error body returned by the API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub fields: Vec<ApiFieldError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiFieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status} ({code}): {message}")]
    Api {
        status: StatusCode,
        code: String,
        message: String,
        fields: Vec<FieldError>,
    },

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ClientError {
    pub(crate) fn from_api(status: StatusCode, body: ApiErrorBody) -> Self {
        ClientError::Api {
            status,
            code: body.code,
            message: if body.error.is_empty() {
                status.to_string()
            } else {
                body.error
            },
            fields: body
                .fields
                .into_iter()
                .map(|f| FieldError::new(f.field, f.message))
                .collect(),
        }
    }
}

/// Map API failures onto the domain error the editor understands.
impl From<ClientError> for CoreError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api {
                status,
                message,
                fields,
                ..
            } => match status {
                StatusCode::BAD_REQUEST if !fields.is_empty() => CoreError::InvalidFields(fields),
                StatusCode::BAD_REQUEST => CoreError::Validation(message),
                StatusCode::UNAUTHORIZED => CoreError::Unauthorized(message),
                StatusCode::FORBIDDEN => CoreError::Forbidden(message),
                StatusCode::CONFLICT => CoreError::Conflict(message),
                _ => CoreError::Internal(format!("{status}: {message}")),
            },
            ClientError::NotAuthenticated => CoreError::Unauthorized(err.to_string()),
            other => CoreError::Internal(other.to_string()),
        }
    }
}
