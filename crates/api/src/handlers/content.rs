//! Public read handlers. Records are returned with both languages; the
//! caller picks one (or uses `/content/homepage`).

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use vitrin_core::content::ContentDomain;
use vitrin_core::error::CoreError;
use vitrin_db::models::service::{ServiceDetail, ServiceList};
use vitrin_db::repositories::{
    ContactInfoRepo, CtaSectionRepo, HeroVideoRepo, ServiceCollectionRepo, ServiceRepo,
    WhyWeExistRepo,
};
use vitrin_db::singleton;
use vitrin_db::DbPool;

use crate::error::AppResult;
use crate::handlers::sections::published;
use crate::response::DataResponse;
use crate::state::AppState;

fn ok<T: Serialize>(data: T) -> Response {
    Json(DataResponse::new(data)).into_response()
}

/// Collection settings plus active services in display order.
pub(crate) async fn service_list(pool: &DbPool) -> AppResult<ServiceList> {
    Ok(ServiceList {
        collection: singleton::fetch::<ServiceCollectionRepo>(pool).await?,
        services: ServiceRepo::list_active(pool).await?,
    })
}

/// GET /api/v1/content/{domain}
///
/// A section that was never saved answers 404. The services list always
/// answers, with a `null` collection and no services on a fresh install.
pub async fn show_domain(
    State(state): State<AppState>,
    Path(domain): Path<String>,
) -> AppResult<Response> {
    let domain: ContentDomain = domain.parse()?;
    let pool = &state.pool;

    let response = match domain {
        ContentDomain::Hero => ok(published::<HeroVideoRepo>(pool).await?),
        ContentDomain::WhyWeExist => ok(published::<WhyWeExistRepo>(pool).await?),
        ContentDomain::CtaSection => ok(published::<CtaSectionRepo>(pool).await?),
        ContentDomain::ContactInfo => ok(published::<ContactInfoRepo>(pool).await?),
        ContentDomain::Services => ok(service_list(pool).await?),
    };
    Ok(response)
}

/// GET /api/v1/content/services/{slug}
pub async fn service_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<ServiceDetail>>> {
    let detail = ServiceRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or(CoreError::NoContent { entity: "service" })?;
    Ok(Json(DataResponse::new(detail)))
}
