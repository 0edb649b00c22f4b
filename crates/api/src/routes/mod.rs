pub mod account;
pub mod admin;
pub mod auth;
pub mod content;
pub mod health;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/login                       login (public)
///
/// /account/profile                  own name and email (GET, PUT)
/// /account/password                 change own password (PUT)
///
/// /content/homepage                 every section in one locale
/// /content/contact                  contact form submission (POST)
/// /content/services/{slug}          service detail
/// /content/{domain}                 one section, both languages
///
/// /admin/hero                       singleton read / upsert
/// /admin/why-we-exist               singleton read / upsert
/// /admin/cta-section                singleton read / upsert
/// /admin/contact-info               singleton read / upsert
/// /admin/services/settings          collection read / upsert
/// /admin/services                   list, create
/// /admin/services/{id}              get, update, delete
/// /admin/upload                     multipart media upload
/// /admin/contact-messages           paginated inbox
/// /admin/contact-messages/{id}      get, mark read / processed
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/account", account::router())
        .nest("/content", content::router())
        .nest("/admin", admin::router(config))
}
