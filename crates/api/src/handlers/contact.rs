//! Contact form submission (public) and the admin inbox.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use vitrin_core::contact::{keys, ContactSubmission, MessageStatus, Pagination};
use vitrin_core::error::CoreError;
use vitrin_core::i18n::translate;
use vitrin_core::types::{DbId, Timestamp};
use vitrin_db::models::contact_message::{ContactMessage, ContactMessagePage, UpdateContactMessage};
use vitrin_db::repositories::ContactMessageRepo;

use super::header_locale;
use crate::error::{is_unique_violation, AppError, AppResult};
use crate::extract::JsonBody;
use crate::middleware::rbac::RequireEditor;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Public submission
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct SubmittedMessage {
    pub id: DbId,
    pub created_at: Timestamp,
}

fn failure(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "success": false, "error": message }))).into_response()
}

/// POST /api/v1/content/contact
///
/// Every message in the response is translated into the request locale.
pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(submission): JsonBody<ContactSubmission>,
) -> Response {
    let locale = header_locale(&headers);

    if let Err(key) = submission.validate() {
        return failure(StatusCode::BAD_REQUEST, translate(key, locale));
    }

    match ContactMessageRepo::create(&state.pool, &submission.normalized()).await {
        Ok(message) => {
            tracing::info!(message_id = message.id, "Stored contact message");
            (
                StatusCode::CREATED,
                Json(json!({
                    "success": true,
                    "data": SubmittedMessage { id: message.id, created_at: message.created_at },
                    "message": translate(keys::SUCCESS, locale),
                })),
            )
                .into_response()
        }
        Err(e) if is_unique_violation(&e) => {
            failure(StatusCode::CONFLICT, translate(keys::DUPLICATE, locale))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to store contact message");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                translate(keys::ERROR, locale),
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Admin inbox
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
}

/// GET /api/v1/admin/contact-messages?page=&limit=&status=
pub async fn list(
    RequireEditor(_user): RequireEditor,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<DataResponse<ContactMessagePage>>> {
    let status: MessageStatus = match query.status.as_deref() {
        Some(s) => s.parse()?,
        None => MessageStatus::All,
    };
    let page = Pagination::new(query.page, query.limit);

    let result = ContactMessageRepo::list(&state.pool, status, page).await?;
    Ok(Json(DataResponse::new(result)))
}

/// GET /api/v1/admin/contact-messages/{id}
pub async fn get_by_id(
    RequireEditor(_user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ContactMessage>>> {
    let message = ContactMessageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ContactMessage",
            id,
        }))?;
    Ok(Json(DataResponse::new(message)))
}

/// PUT /api/v1/admin/contact-messages/{id}
///
/// Omitted flags keep their stored values.
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    JsonBody(input): JsonBody<UpdateContactMessage>,
) -> AppResult<Json<DataResponse<ContactMessage>>> {
    if input.is_read.is_none() && input.is_processed.is_none() {
        return Err(AppError::BadRequest(
            "Provide is_read and/or is_processed".into(),
        ));
    }

    let message = ContactMessageRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ContactMessage",
            id,
        }))?;

    tracing::info!(
        user_id = user.user_id,
        message_id = id,
        is_read = message.is_read,
        is_processed = message.is_processed,
        "Updated contact message"
    );
    Ok(Json(DataResponse::new(message)))
}
