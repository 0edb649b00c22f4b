//! Editor routes mounted at `/admin`. Every handler requires
//! [`RequireEditor`](crate::middleware::rbac::RequireEditor).

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use vitrin_db::repositories::{
    ContactInfoRepo, CtaSectionRepo, HeroVideoRepo, ServiceCollectionRepo, WhyWeExistRepo,
};

use crate::config::ServerConfig;
use crate::handlers::{contact, sections, services, upload};
use crate::state::AppState;

/// ```text
/// GET, PUT          /hero
/// GET, PUT          /why-we-exist
/// GET, PUT          /cta-section
/// GET, PUT          /contact-info
/// GET, PUT          /services/settings
/// GET, POST         /services
/// GET, PUT, DELETE  /services/{id}
/// POST              /upload
/// GET               /contact-messages
/// GET, PUT          /contact-messages/{id}
/// ```
pub fn router(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .route(
            "/hero",
            get(sections::show::<HeroVideoRepo>).put(sections::save::<HeroVideoRepo>),
        )
        .route(
            "/why-we-exist",
            get(sections::show::<WhyWeExistRepo>).put(sections::save::<WhyWeExistRepo>),
        )
        .route(
            "/cta-section",
            get(sections::show::<CtaSectionRepo>).put(sections::save::<CtaSectionRepo>),
        )
        .route(
            "/contact-info",
            get(sections::show::<ContactInfoRepo>).put(sections::save::<ContactInfoRepo>),
        )
        .route(
            "/services/settings",
            get(sections::show::<ServiceCollectionRepo>)
                .put(sections::save::<ServiceCollectionRepo>),
        )
        .route("/services", get(services::list).post(services::create))
        .route(
            "/services/{id}",
            get(services::get_by_id)
                .put(services::update)
                .delete(services::delete),
        )
        .route(
            "/upload",
            post(upload::upload).layer(DefaultBodyLimit::max(config.max_upload_bytes)),
        )
        .route("/contact-messages", get(contact::list))
        .route(
            "/contact-messages/{id}",
            get(contact::get_by_id).put(contact::update),
        )
}
