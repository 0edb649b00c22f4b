use axum::routing::{get, put};
use axum::Router;

use crate::handlers::account;
use crate::state::AppState;

/// Routes mounted at `/account`. Any signed-in role may use them.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(account::profile).put(account::update_profile))
        .route("/password", put(account::change_password))
}
