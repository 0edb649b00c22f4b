//! Request extractors whose rejections use the API error envelope.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use vitrin_core::error::CoreError;

use crate::error::AppError;

/// `axum::Json` for request bodies. A body that is not valid JSON or does
/// not match the payload type (including a malformed stored-list shape) is a
/// 400 `VALIDATION_ERROR` instead of axum's plain-text 4xx.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(status = %rejection.status(), "Rejected request body");
        AppError::Core(CoreError::Validation(rejection.body_text()))
    }
}
