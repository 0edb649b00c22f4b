//! Role checks layered on [`AuthUser`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use vitrin_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// An authenticated admin or editor. Other roles get 403.
pub struct RequireEditor(pub AuthUser);

impl FromRequestParts<AppState> for RequireEditor {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.can_edit() {
            tracing::warn!(user_id = user.user_id, role = %user.role, "Content write refused");
            return Err(CoreError::Forbidden("Admin or editor role required".into()).into());
        }
        Ok(RequireEditor(user))
    }
}
