//! Generic read / upsert handlers for single-row content sections.
//!
//! One pair of handlers serves every [`SingletonContent`] repo; the route
//! table picks the section by type parameter.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;
use vitrin_core::draft::Draft;
use vitrin_core::error::CoreError;
use vitrin_db::singleton::{self, SingletonContent, UpsertOutcome};
use vitrin_db::DbPool;

use crate::error::AppResult;
use crate::extract::JsonBody;
use crate::middleware::rbac::RequireEditor;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response of a section save.
#[derive(Debug, Serialize)]
pub struct SavedResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub outcome: UpsertOutcome,
}

/// The published record, or 404 when the section was never saved.
pub(crate) async fn published<C: SingletonContent>(pool: &DbPool) -> AppResult<C::Record> {
    singleton::fetch::<C>(pool)
        .await?
        .ok_or_else(|| CoreError::NoContent { entity: C::ENTITY }.into())
}

/// GET /api/v1/admin/{section}
///
/// `data` is `null` until the first save, so the editor can open an empty form.
pub async fn show<C>(
    RequireEditor(_user): RequireEditor,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Option<C::Record>>>>
where
    C: SingletonContent,
    C::Record: Serialize,
{
    let record = singleton::fetch::<C>(&state.pool).await?;
    Ok(Json(DataResponse::new(record)))
}

/// PUT /api/v1/admin/{section}
///
/// Validates, then creates the row (201) or updates it in place (200).
pub async fn save<C>(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<C::Payload>,
) -> AppResult<(StatusCode, Json<SavedResponse<C::Record>>)>
where
    C: SingletonContent,
    C::Payload: Draft + DeserializeOwned,
    C::Record: Serialize,
{
    let saved = singleton::save::<C>(&state.pool, &payload).await?;

    tracing::info!(
        user_id = user.user_id,
        section = C::TABLE,
        outcome = ?saved.outcome,
        "Saved content section"
    );

    let status = match saved.outcome {
        UpsertOutcome::Created => StatusCode::CREATED,
        UpsertOutcome::Updated => StatusCode::OK,
    };
    Ok((
        status,
        Json(SavedResponse {
            success: true,
            data: saved.record,
            outcome: saved.outcome,
        }),
    ))
}
