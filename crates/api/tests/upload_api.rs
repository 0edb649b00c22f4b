//! Multipart upload into local storage and binding the result to a section.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, editor_token, put_json_auth, send, PUBLIC_BASE_URL};
use serde_json::json;
use sqlx::PgPool;
use vitrin_db::repositories::MediaRepo;

const BOUNDARY: &str = "vitrin-test-boundary";

/// Build a multipart body with an optional file part and an optional context.
fn multipart(file: Option<(&str, &str, &[u8])>, context: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(context) = context {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"context\"\r\n\r\n{context}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, mime, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\nContent-Type: {mime}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn upload(app: axum::Router, token: &str, body: Vec<u8>) -> axum::http::Response<Body> {
    let request = Request::post("/api/v1/admin/upload")
        .header("authorization", format!("Bearer {token}"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upload_stores_object_and_media_row(pool: PgPool) {
    let token = editor_token(&pool).await;
    let test = common::build_test_app(pool.clone());
    let png = b"\x89PNG\r\n\x1a\nfake image bytes";

    let response = upload(
        test.app(),
        &token,
        multipart(Some(("Hero Banner (1).png", "image/png", png)), Some("cta-section")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["file_type"], "image");
    assert_eq!(data["mime_type"], "image/png");
    assert_eq!(data["original_filename"], "Hero Banner (1).png");
    assert_eq!(data["file_size"], png.len());

    let url = data["url"].as_str().unwrap();
    let prefix = format!("{PUBLIC_BASE_URL}/images/cta-section/");
    assert!(url.starts_with(&prefix), "unexpected url {url}");
    assert!(url.ends_with("_Hero_Banner__1_.png"), "unexpected url {url}");

    let media_id = data["media_id"].as_i64().unwrap();
    let media = MediaRepo::find_by_id(&pool, media_id).await.unwrap().unwrap();
    assert_eq!(media.upload_context, "cta-section");
    assert!(media.uploaded_by.is_some());

    let on_disk = test.uploads.path().join(&media.storage_path);
    assert_eq!(std::fs::read(on_disk).unwrap(), png);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upload_rejects_bad_type_context_and_missing_file(pool: PgPool) {
    let token = editor_token(&pool).await;
    let test = common::build_test_app(pool.clone());

    let response = upload(
        test.app(),
        &token,
        multipart(Some(("notes.pdf", "application/pdf", b"%PDF")), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = upload(
        test.app(),
        &token,
        multipart(Some(("a.png", "image/png", b"png")), Some("../etc")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = upload(test.app(), &token, multipart(None, Some("hero"))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM media")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unbinding_media_keeps_the_object(pool: PgPool) {
    let token = editor_token(&pool).await;
    let test = common::build_test_app(pool.clone());

    let uploaded = body_json(
        upload(
            test.app(),
            &token,
            multipart(Some(("bg.webp", "image/webp", b"RIFF....WEBP")), Some("cta-section")),
        )
        .await,
    )
    .await;
    let media_id = uploaded["data"]["media_id"].as_i64().unwrap();

    let mut section = json!({
        "main_title_en": "Title",
        "main_title_tr": "Başlık",
        "description_en": "Desc",
        "description_tr": "Açıklama",
        "background_image_media_id": media_id
    });
    let saved = body_json(
        put_json_auth(test.app(), "/api/v1/admin/cta-section", &token, section.clone()).await,
    )
    .await;
    assert_eq!(saved["data"]["background_image_url"], uploaded["data"]["url"]);

    section["background_image_media_id"] = json!(null);
    let cleared = body_json(
        put_json_auth(test.app(), "/api/v1/admin/cta-section", &token, section).await,
    )
    .await;
    assert!(cleared["data"]["background_image_url"].is_null());

    let media = MediaRepo::find_by_id(&pool, media_id).await.unwrap().unwrap();
    assert!(test.uploads.path().join(media.storage_path).exists());
}
