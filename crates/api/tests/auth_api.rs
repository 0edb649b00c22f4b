//! Login and the editor role gate on `/admin`.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, create_user, get, get_auth, send_json, token_for};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_returns_bearer_token(pool: PgPool) {
    let id = create_user(&pool, "Editor@Vitrin.test", "correct-horse-battery", "editor").await;
    let test = common::build_test_app(pool);

    let response = send_json(
        test.app(),
        Method::POST,
        "/api/v1/auth/login",
        None,
        json!({ "email": "editor@vitrin.test", "password": "correct-horse-battery" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["token_type"], "Bearer");
    assert_eq!(json["data"]["expires_in"], 3600);
    assert_eq!(json["data"]["user"]["id"], id);
    assert_eq!(json["data"]["user"]["role"], "editor");

    let token = json["data"]["access_token"].as_str().unwrap();
    let response = get_auth(test.app(), "/api/v1/admin/hero", token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_rejects_wrong_password_and_unknown_email(pool: PgPool) {
    create_user(&pool, "editor@vitrin.test", "correct-horse-battery", "editor").await;
    let test = common::build_test_app(pool);

    for (email, password) in [
        ("editor@vitrin.test", "wrong-password-here"),
        ("nobody@vitrin.test", "correct-horse-battery"),
    ] {
        let response = send_json(
            test.app(),
            Method::POST,
            "/api/v1/auth/login",
            None,
            json!({ "email": email, "password": password }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Invalid email or password");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_routes_require_token(pool: PgPool) {
    let test = common::build_test_app(pool);

    let response = get(test.app(), "/api/v1/admin/cta-section").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");

    let response = get_auth(test.app(), "/api/v1/admin/cta-section", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_routes_reject_other_roles(pool: PgPool) {
    let test = common::build_test_app(pool);
    let token = token_for(1, "viewer");

    let response = get_auth(test.app(), "/api/v1/admin/contact-messages", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");
}
