//! Public, unauthenticated routes mounted at `/content`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{contact, content, homepage};
use crate::state::AppState;

/// ```text
/// GET  /homepage          -> homepage::show
/// POST /contact           -> contact::submit
/// GET  /services/{slug}   -> content::service_by_slug
/// GET  /{domain}          -> content::show_domain
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/homepage", get(homepage::show))
        .route("/contact", post(contact::submit))
        .route("/services/{slug}", get(content::service_by_slug))
        .route("/{domain}", get(content::show_domain))
}
