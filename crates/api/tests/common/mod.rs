#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;
use vitrin_api::auth::jwt::{generate_access_token, JwtConfig};
use vitrin_api::auth::password::hash_password;
use vitrin_api::config::ServerConfig;
use vitrin_api::router::build_app_router;
use vitrin_api::state::AppState;
use vitrin_core::roles::{ROLE_ADMIN, ROLE_EDITOR};
use vitrin_core::types::DbId;
use vitrin_db::models::user::CreateUser;
use vitrin_db::repositories::UserRepo;
use vitrin_storage::local::LocalStorage;

pub const PUBLIC_BASE_URL: &str = "http://localhost:3000/uploads";

/// Test `ServerConfig`: fixed JWT secret, short timeouts.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 60,
        },
        upload_timeout_secs: 10,
        max_upload_bytes: 2 * 1024 * 1024,
        locales_dir: None,
    }
}

/// The application router backed by local storage in a temporary directory.
/// The directory lives as long as the returned value.
pub struct TestApp {
    pub router: Router,
    pub uploads: TempDir,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

pub fn build_test_app(pool: PgPool) -> TestApp {
    let config = test_config();
    let uploads = tempfile::tempdir().expect("tempdir");
    let storage = Arc::new(LocalStorage::new(uploads.path(), PUBLIC_BASE_URL));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        storage,
    };
    TestApp {
        router: build_app_router(state, &config),
        uploads,
    }
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

pub async fn create_user(pool: &PgPool, email: &str, password: &str, role: &str) -> DbId {
    UserRepo::upsert(
        pool,
        &CreateUser {
            email: email.to_string(),
            name: "Test User".to_string(),
            password_hash: hash_password(password).expect("hashing should succeed"),
            role: role.to_string(),
        },
    )
    .await
    .expect("user upsert should succeed")
    .id
}

pub fn token_for(user_id: DbId, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt).expect("token")
}

/// A stored editor account and a bearer token for it.
pub async fn editor_token(pool: &PgPool) -> String {
    let id = create_user(pool, "editor@vitrin.test", "correct-horse-battery", ROLE_EDITOR).await;
    token_for(id, ROLE_EDITOR)
}

pub async fn admin_token(pool: &PgPool) -> String {
    let id = create_user(pool, "admin@vitrin.test", "correct-horse-battery", ROLE_ADMIN).await;
    token_for(id, ROLE_ADMIN)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Send a JSON body, with a bearer token when given.
pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send_json(app, Method::PUT, uri, Some(token), body).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send_json(app, Method::POST, uri, Some(token), body).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
