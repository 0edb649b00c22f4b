//! Repository for the `users` table.

use sqlx::PgPool;
use vitrin_core::types::DbId;

use crate::models::user::{CreateUser, User};

/// Column list for `users` queries.
const COLUMNS: &str = "\
    id, email, name, password_hash, role, is_active, last_login_at, created_at, updated_at";

/// Provides data access for admin accounts.
pub struct UserRepo;

impl UserRepo {
    /// Case-insensitive lookup by email.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE lower(email) = lower($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create the account, or reset the password, name and role of an
    /// existing one with the same email, reactivating it.
    pub async fn upsert(pool: &PgPool, dto: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, name, password_hash, role) \
             VALUES (lower($1), $2, $3, $4) \
             ON CONFLICT (email) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 password_hash = EXCLUDED.password_hash, \
                 role = EXCLUDED.role, \
                 is_active = true, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&dto.email)
            .bind(&dto.name)
            .bind(&dto.password_hash)
            .bind(&dto.role)
            .fetch_one(pool)
            .await
    }

    pub async fn touch_last_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Whether another account already uses `email`.
    pub async fn email_taken_by_other(
        pool: &PgPool,
        email: &str,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE lower(email) = lower($1) AND id <> $2)",
        )
        .bind(email)
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Set name and email. `None` if the account does not exist.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        name: &str,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET name = $2, email = lower($3), updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(name)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Store a new password hash. Returns `false` if the account does not exist.
    pub async fn set_password_hash(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
