//! Create or reset an admin account.
//!
//! | Env Var          | Required |
//! |------------------|----------|
//! | `DATABASE_URL`   | yes      |
//! | `ADMIN_EMAIL`    | yes      |
//! | `ADMIN_PASSWORD` | yes      |
//! | `ADMIN_NAME`     | no (`Admin`) |
//!
//! Running it again for the same email resets the password and role.

use anyhow::{bail, Context};
use vitrin_api::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use vitrin_core::roles::ROLE_ADMIN;
use vitrin_db::models::user::CreateUser;
use vitrin_db::repositories::UserRepo;
use vitrin_db::PoolConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vitrin_create_admin=info,vitrin_db=info".into()),
        )
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let email = std::env::var("ADMIN_EMAIL")
        .context("ADMIN_EMAIL must be set")?
        .trim()
        .to_lowercase();
    let password = std::env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD must be set")?;
    let name = std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Admin".into());

    if email.is_empty() || !email.contains('@') {
        bail!("ADMIN_EMAIL is not a valid email address");
    }
    validate_password_strength(&password, MIN_PASSWORD_LENGTH).map_err(anyhow::Error::msg)?;

    let password_hash =
        hash_password(&password).map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    let pool = vitrin_db::create_pool(&database_url, &PoolConfig::default())
        .await
        .context("Failed to connect to database")?;
    vitrin_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let user = UserRepo::upsert(
        &pool,
        &CreateUser {
            email,
            name,
            password_hash,
            role: ROLE_ADMIN.to_string(),
        },
    )
    .await
    .context("Failed to save admin user")?;

    tracing::info!(user_id = user.id, email = %user.email, "Admin account ready");
    Ok(())
}
