//! Admin CRUD for services. Tags are replaced wholesale on every write.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use vitrin_core::draft::Draft;
use vitrin_core::error::CoreError;
use vitrin_core::types::DbId;
use vitrin_db::models::service::{SaveService, ServiceDetail, ServiceList};
use vitrin_db::repositories::{ServiceCollectionRepo, ServiceRepo};
use vitrin_db::singleton;

use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::middleware::rbac::RequireEditor;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Service",
        id,
    })
}

/// GET /api/v1/admin/services
///
/// Includes inactive services.
pub async fn list(
    RequireEditor(_user): RequireEditor,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ServiceList>>> {
    let collection = singleton::fetch::<ServiceCollectionRepo>(&state.pool).await?;
    let services = ServiceRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse::new(ServiceList {
        collection,
        services,
    })))
}

/// GET /api/v1/admin/services/{id}
pub async fn get_by_id(
    RequireEditor(_user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ServiceDetail>>> {
    let detail = ServiceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(detail)))
}

/// POST /api/v1/admin/services
///
/// A duplicate slug answers 409.
pub async fn create(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SaveService>,
) -> AppResult<(StatusCode, Json<DataResponse<ServiceDetail>>)> {
    payload.check()?;
    let detail = ServiceRepo::create(&state.pool, &payload).await?;

    tracing::info!(
        user_id = user.user_id,
        service_id = detail.service.id,
        tags = detail.tags.len(),
        "Service created via admin"
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(detail))))
}

/// PUT /api/v1/admin/services/{id}
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    JsonBody(payload): JsonBody<SaveService>,
) -> AppResult<Json<DataResponse<ServiceDetail>>> {
    payload.check()?;
    let detail = ServiceRepo::update(&state.pool, id, &payload)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        user_id = user.user_id,
        service_id = id,
        tags = detail.tags.len(),
        "Service updated"
    );
    Ok(Json(DataResponse::new(detail)))
}

/// DELETE /api/v1/admin/services/{id}
///
/// Media referenced by the service stay in storage and in `media`.
pub async fn delete(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ServiceRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(user_id = user.user_id, service_id = id, "Service deleted");
    Ok(StatusCode::NO_CONTENT)
}
