//! Service CRUD over HTTP and the public services reads.

mod common;

use axum::http::{Method, StatusCode};
use common::{admin_token, body_json, editor_token, get, get_auth, post_json_auth, put_json_auth, send_json};
use serde_json::json;
use sqlx::PgPool;

fn branding() -> serde_json::Value {
    json!({
        "title_en": "Brand Strategy",
        "title_tr": "Marka Stratejisi",
        "middle_title_en": "Who you are",
        "paragraph_1_tr": "Markanızı tanımlıyoruz",
        "tags": [
            { "tag_en": "Research", "tag_tr": "Araştırma" },
            { "tag_en": " ", "tag_tr": "" },
            { "tag_en": "Naming", "tag_tr": "İsimlendirme" }
        ]
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_service_derives_slug_and_collection(pool: PgPool) {
    let token = editor_token(&pool).await;
    let test = common::build_test_app(pool);

    let response = post_json_auth(test.app(), "/api/v1/admin/services", &token, branding()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let data = &body_json(response).await["data"];
    assert_eq!(data["slug"], "brand-strategy");
    assert_eq!(data["order_number"], 1);
    assert_eq!(data["is_active"], true);
    assert_eq!(data["tags"].as_array().unwrap().len(), 2);
    assert_eq!(data["tags"][1]["tag_tr"], "İsimlendirme");

    let public = body_json(get(test.app(), "/api/v1/content/services").await).await;
    assert_eq!(public["data"]["collection"]["main_title_en"], "SERVICES");
    assert_eq!(public["data"]["collection"]["main_title_tr"], "HİZMETLER");
    assert_eq!(public["data"]["services"][0]["slug"], "brand-strategy");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_slug_is_409(pool: PgPool) {
    let token = editor_token(&pool).await;
    let test = common::build_test_app(pool);

    post_json_auth(test.app(), "/api/v1/admin/services", &token, branding()).await;
    let response = post_json_auth(test.app(), "/api/v1/admin/services", &token, branding()).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_turkish_title_is_400(pool: PgPool) {
    let token = editor_token(&pool).await;
    let test = common::build_test_app(pool);

    let response = post_json_auth(
        test.app(),
        "/api/v1/admin/services",
        &token,
        json!({ "title_en": "Only English" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["fields"][0]["field"], "title_tr");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_replaces_tags_and_hides_inactive(pool: PgPool) {
    let token = editor_token(&pool).await;
    let test = common::build_test_app(pool);

    let created = body_json(
        post_json_auth(test.app(), "/api/v1/admin/services", &token, branding()).await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let mut body = branding();
    body["tags"] = json!([{ "tag_en": "Workshops", "tag_tr": "Atölyeler" }]);
    body["is_active"] = json!(false);
    let response = put_json_auth(test.app(), &format!("/api/v1/admin/services/{id}"), &token, body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = &body_json(response).await["data"];
    assert_eq!(data["tags"].as_array().unwrap().len(), 1);
    assert_eq!(data["tags"][0]["tag_en"], "Workshops");
    assert_eq!(data["is_active"], false);

    let public = get(test.app(), "/api/v1/content/services/brand-strategy").await;
    assert_eq!(public.status(), StatusCode::NOT_FOUND);

    let admin = get_auth(test.app(), &format!("/api/v1/admin/services/{id}"), &token).await;
    assert_eq!(admin.status(), StatusCode::OK);

    let list = body_json(get_auth(test.app(), "/api/v1/admin/services", &token).await).await;
    assert_eq!(list["data"]["services"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_detail_by_slug(pool: PgPool) {
    let token = editor_token(&pool).await;
    let test = common::build_test_app(pool);
    post_json_auth(test.app(), "/api/v1/admin/services", &token, branding()).await;

    let response = get(test.app(), "/api/v1/content/services/brand-strategy").await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = &body_json(response).await["data"];
    assert_eq!(data["title_tr"], "Marka Stratejisi");
    assert_eq!(data["paragraph_1_tr"], "Markanızı tanımlıyoruz");
    assert_eq!(data["tags"][0]["position"], 1);
    assert_eq!(data["tags"][1]["position"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_service(pool: PgPool) {
    let token = admin_token(&pool).await;
    let test = common::build_test_app(pool);

    let created = body_json(
        post_json_auth(test.app(), "/api/v1/admin/services", &token, branding()).await,
    )
    .await;
    let uri = format!(
        "/api/v1/admin/services/{}",
        created["data"]["id"].as_i64().unwrap()
    );

    let response = send_json(test.app(), Method::DELETE, &uri, Some(&token), json!({})).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send_json(test.app(), Method::DELETE, &uri, Some(&token), json!({})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_service_settings_singleton(pool: PgPool) {
    let token = editor_token(&pool).await;
    let test = common::build_test_app(pool);

    let response = put_json_auth(
        test.app(),
        "/api/v1/admin/services/settings",
        &token,
        json!({ "main_title_en": "WHAT WE DO", "main_title_tr": "NE YAPIYORUZ" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    post_json_auth(test.app(), "/api/v1/admin/services", &token, branding()).await;

    let public = body_json(get(test.app(), "/api/v1/content/services").await).await;
    assert_eq!(public["data"]["collection"]["main_title_en"], "WHAT WE DO");
}
