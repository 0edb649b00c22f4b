//! Self-service account handlers for any signed-in user.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use vitrin_core::account::{PasswordChange, ProfileUpdate};
use vitrin_core::error::{CoreError, FieldError};
use vitrin_core::types::{DbId, Timestamp};
use vitrin_db::models::user::User;
use vitrin_db::repositories::UserRepo;

use crate::auth::password::{hash_password, verify_password, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: Timestamp,
}

impl From<User> for Profile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PasswordChanged {
    pub changed: bool,
}

fn account_missing(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}

/// GET /api/v1/account/profile
pub async fn profile(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Profile>>> {
    let account = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| account_missing(user.user_id))?;
    Ok(Json(DataResponse::new(account.into())))
}

/// PUT /api/v1/account/profile
///
/// An email held by another account is a 409.
pub async fn update_profile(
    user: AuthUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<ProfileUpdate>,
) -> AppResult<Json<DataResponse<Profile>>> {
    input.check()?;
    let (name, email) = input.normalized();

    if UserRepo::email_taken_by_other(&state.pool, &email, user.user_id).await? {
        return Err(CoreError::Conflict("Email is already in use".into()).into());
    }

    let account = UserRepo::update_profile(&state.pool, user.user_id, &name, &email)
        .await?
        .ok_or_else(|| account_missing(user.user_id))?;

    tracing::info!(user_id = user.user_id, "Profile updated");
    Ok(Json(DataResponse::new(account.into())))
}

/// PUT /api/v1/account/password
///
/// A wrong current password is a field error, not a 401, so the session
/// stays valid.
pub async fn change_password(
    user: AuthUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<PasswordChange>,
) -> AppResult<Json<DataResponse<PasswordChanged>>> {
    input.check(MIN_PASSWORD_LENGTH)?;
    let current = input.current_password.as_deref().unwrap_or_default();
    let new = input.new_password.as_deref().unwrap_or_default();

    let account = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| account_missing(user.user_id))?;

    let valid = verify_password(current, &account.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        tracing::warn!(user_id = user.user_id, "Password change with wrong current password");
        return Err(CoreError::InvalidFields(vec![FieldError::new(
            "current_password",
            "is incorrect",
        )])
        .into());
    }

    let hash = hash_password(new)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    if !UserRepo::set_password_hash(&state.pool, user.user_id, &hash).await? {
        return Err(account_missing(user.user_id));
    }

    tracing::info!(user_id = user.user_id, "Password changed");
    Ok(Json(DataResponse::new(PasswordChanged { changed: true })))
}
