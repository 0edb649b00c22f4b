use std::sync::Arc;

use vitrin_storage::ObjectStorage;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: every field is a pool handle or an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: vitrin_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Where uploaded media bytes go.
    pub storage: Arc<dyn ObjectStorage>,
}
