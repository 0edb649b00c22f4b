//! Integration tests for the single-row content sections.
//!
//! Exercises the fetch / upsert protocol against a real database:
//! - First save creates, later saves update the same row
//! - Racing first saves still leave one row
//! - Validation and the pending-upload gate reject before any write
//! - Legacy marquee shapes are normalized on read and canonical on write
//! - Clearing a media slot never deletes the media row

use assert_matches::assert_matches;
use serde_json::json;
use sqlx::PgPool;
use vitrin_core::draft::Draft;
use vitrin_core::list_shape::BilingualItem;
use vitrin_core::types::DbId;
use vitrin_core::validation::UPLOAD_PENDING;
use vitrin_db::models::contact_info::SaveContactInfo;
use vitrin_db::models::cta_section::SaveCtaSection;
use vitrin_db::models::hero::SaveHeroVideo;
use vitrin_db::models::media::CreateMedia;
use vitrin_db::models::why_we_exist::SaveWhyWeExist;
use vitrin_db::repositories::{
    ContactInfoRepo, CtaSectionRepo, HeroVideoRepo, MediaRepo, WhyWeExistRepo,
};
use vitrin_db::singleton::{fetch, save, upsert, SaveError, SingletonContent, UpsertOutcome};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_media(pool: &PgPool, file_type: &str, name: &str) -> DbId {
    let mime = if file_type == "video" { "video/mp4" } else { "image/png" };
    MediaRepo::create(
        pool,
        &CreateMedia {
            url: format!("https://cdn.example.com/{file_type}s/test/{name}"),
            storage_path: format!("{file_type}s/test/{name}"),
            file_type: file_type.to_string(),
            mime_type: mime.to_string(),
            original_filename: name.to_string(),
            file_size: 1024,
            upload_context: "test".to_string(),
            uploaded_by: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap();
    n
}

fn cta(title: &str) -> SaveCtaSection {
    SaveCtaSection {
        main_title_en: Some(title.to_string()),
        main_title_tr: Some(format!("{title} TR")),
        description_en: Some("Let's talk".to_string()),
        description_tr: Some("Konuşalım".to_string()),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Upsert protocol
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_first_save_creates_then_updates_in_place(pool: PgPool) {
    let video = new_media(&pool, "video", "hero.mp4").await;
    let payload = SaveHeroVideo {
        media_id: Some(video),
        title_en: Some("We build brands".into()),
        title_tr: Some("Marka inşa ederiz".into()),
        ..Default::default()
    };

    let first = save::<HeroVideoRepo>(&pool, &payload).await.unwrap();
    assert_eq!(first.outcome, UpsertOutcome::Created);
    assert_eq!(first.record.video_url.as_deref(), Some("https://cdn.example.com/videos/test/hero.mp4"));

    let second = save::<HeroVideoRepo>(&pool, &payload).await.unwrap();
    assert_eq!(second.outcome, UpsertOutcome::Updated);
    assert_eq!(second.record.id, first.record.id);
    assert_eq!(second.record.title_en, first.record.title_en);
    assert_eq!(count(&pool, "hero_videos").await, 1);

    let read = fetch::<HeroVideoRepo>(&pool).await.unwrap().unwrap();
    assert_eq!(read.id, first.record.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_racing_first_saves_leave_one_row(pool: PgPool) {
    let a = cta("First");
    let b = cta("Second");

    let (ra, rb) = tokio::join!(
        upsert::<CtaSectionRepo>(&pool, &a),
        upsert::<CtaSectionRepo>(&pool, &b),
    );
    let outcomes = [ra.unwrap().outcome, rb.unwrap().outcome];

    assert!(outcomes.contains(&UpsertOutcome::Created));
    assert!(outcomes.contains(&UpsertOutcome::Updated));
    assert_eq!(count(&pool, "cta_section").await, 1);
}

/// Save any section on its own runtime task, as a generic handler would.
async fn save_on_task<C>(pool: &PgPool, payload: C::Payload) -> UpsertOutcome
where
    C: SingletonContent + 'static,
    C::Payload: Draft + Send + 'static,
    C::Record: 'static,
{
    let pool = pool.clone();
    tokio::spawn(async move { save::<C>(&pool, &payload).await.map(|u| u.outcome) })
        .await
        .expect("save task should not panic")
        .expect("save should succeed")
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_generic_saves_run_on_spawned_tasks(pool: PgPool) {
    let contact = SaveContactInfo {
        email: Some("hello@vitrin.test".into()),
        ..Default::default()
    };

    assert_eq!(save_on_task::<CtaSectionRepo>(&pool, cta("Spawned")).await, UpsertOutcome::Created);
    assert_eq!(save_on_task::<CtaSectionRepo>(&pool, cta("Again")).await, UpsertOutcome::Updated);
    assert_eq!(save_on_task::<ContactInfoRepo>(&pool, contact).await, UpsertOutcome::Created);
    assert_eq!(count(&pool, "cta_section").await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_contact_info_second_save_keeps_first_fields(pool: PgPool) {
    let first = SaveContactInfo {
        email: Some("a@b.co".into()),
        ..Default::default()
    };
    let created = save::<ContactInfoRepo>(&pool, &first).await.unwrap();
    assert_eq!(created.outcome, UpsertOutcome::Created);

    let second = SaveContactInfo {
        email: Some("a@b.co".into()),
        phone: Some("+90 212 000 00 00".into()),
        address_en: Some("  ".into()),
        ..Default::default()
    };
    let updated = save::<ContactInfoRepo>(&pool, &second).await.unwrap();
    assert_eq!(updated.outcome, UpsertOutcome::Updated);

    let info = fetch::<ContactInfoRepo>(&pool).await.unwrap().unwrap();
    assert_eq!(info.id, created.record.id);
    assert_eq!(info.email.as_deref(), Some("a@b.co"));
    assert_eq!(info.phone.as_deref(), Some("+90 212 000 00 00"));
    assert_eq!(info.address_en, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_inactive_cta_row_is_updated_not_duplicated(pool: PgPool) {
    let (id,): (DbId,) = sqlx::query_as(
        "INSERT INTO cta_section (main_title_en, main_title_tr, description_en, description_tr, is_active) \
         VALUES ('Old', 'Eski', 'Desc', 'Açıklama', false) RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(fetch::<CtaSectionRepo>(&pool).await.unwrap().is_none());

    let saved = save::<CtaSectionRepo>(&pool, &cta("Back")).await.unwrap();
    assert_eq!(saved.outcome, UpsertOutcome::Updated);
    assert_eq!(saved.record.id, id);
    assert!(saved.record.is_active);
    assert_eq!(count(&pool, "cta_section").await, 1);
}

// ---------------------------------------------------------------------------
// Validation gate
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_required_video_is_rejected_without_write(pool: PgPool) {
    let err = save::<HeroVideoRepo>(&pool, &SaveHeroVideo::default())
        .await
        .unwrap_err();

    let SaveError::Invalid(err) = err else {
        panic!("expected a validation error, got {err:?}");
    };
    assert!(err.fields().iter().any(|f| f.field == "media_id"));
    assert_eq!(count(&pool, "hero_videos").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pending_upload_blocks_save(pool: PgPool) {
    let mut payload = cta("Pending");
    payload.pending_uploads = vec!["background_image_media_id".into()];

    let err = save::<CtaSectionRepo>(&pool, &payload).await.unwrap_err();
    assert_matches!(err, SaveError::Invalid(ref e) if e.fields().len() == 1);
    let SaveError::Invalid(e) = err else { unreachable!() };
    assert_eq!(e.fields()[0].field, "background_image_media_id");
    assert_eq!(e.fields()[0].message, UPLOAD_PENDING);
    assert_eq!(count(&pool, "cta_section").await, 0);
}

// ---------------------------------------------------------------------------
// Marquee list shapes
// ---------------------------------------------------------------------------

async fn insert_raw_cta(pool: &PgPool, marquee: serde_json::Value) {
    sqlx::query(
        "INSERT INTO cta_section (main_title_en, main_title_tr, description_en, description_tr, marquee_items) \
         VALUES ('Title', 'Başlık', 'Desc', 'Açıklama', $1)",
    )
    .bind(marquee)
    .execute(pool)
    .await
    .unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_legacy_string_list_is_read_as_shared_items(pool: PgPool) {
    insert_raw_cta(&pool, json!(["A", "B"])).await;

    let section = fetch::<CtaSectionRepo>(&pool).await.unwrap().unwrap();
    assert_eq!(
        section.marquee_items,
        vec![BilingualItem::shared("A"), BilingualItem::shared("B")]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_encoded_list_is_read_and_rewritten_canonically(pool: PgPool) {
    insert_raw_cta(&pool, json!(r#"[{"text_en":"Design","text_tr":"Tasarım"}]"#)).await;

    let section = fetch::<CtaSectionRepo>(&pool).await.unwrap().unwrap();
    assert_eq!(section.marquee_items, vec![BilingualItem::new("Design", "Tasarım")]);

    let mut payload = cta("Title");
    payload.marquee_items = section.marquee_items.clone();
    save::<CtaSectionRepo>(&pool, &payload).await.unwrap();

    let (stored,): (serde_json::Value,) = sqlx::query_as("SELECT marquee_items FROM cta_section")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, json!([{"text_en": "Design", "text_tr": "Tasarım"}]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_malformed_stored_list_is_a_read_error(pool: PgPool) {
    insert_raw_cta(&pool, json!(["A", {"text_en": "B"}])).await;

    let err = fetch::<CtaSectionRepo>(&pool).await.unwrap_err();
    assert_matches!(err, sqlx::Error::Decode(_));
}

// ---------------------------------------------------------------------------
// Media slots
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_clearing_a_slot_keeps_the_media_row(pool: PgPool) {
    let image = new_media(&pool, "image", "bg.png").await;
    let mut payload = cta("With image");
    payload.background_image_media_id = Some(image);
    let saved = save::<CtaSectionRepo>(&pool, &payload).await.unwrap();
    assert_eq!(saved.record.background_image_media_id, Some(image));
    assert!(saved.record.background_image_url.is_some());

    payload.background_image_media_id = None;
    let cleared = save::<CtaSectionRepo>(&pool, &payload).await.unwrap();
    assert_eq!(cleared.record.background_image_media_id, None);
    assert_eq!(cleared.record.background_image_url, None);

    assert!(MediaRepo::find_by_id(&pool, image).await.unwrap().is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_why_we_exist_video_slots(pool: PgPool) {
    let first = new_media(&pool, "video", "one.mp4").await;
    let second = new_media(&pool, "video", "two.mp4").await;
    let mut payload = SaveWhyWeExist {
        main_title_en: Some("Why we exist".into()),
        main_title_tr: Some("Neden varız".into()),
        video_1_media_id: Some(first),
        video_2_media_id: Some(second),
        ..Default::default()
    };

    let saved = save::<WhyWeExistRepo>(&pool, &payload).await.unwrap();
    assert_eq!(saved.record.videos.len(), 2);
    assert_eq!(saved.record.video(1).and_then(|v| v.media_id), Some(first));
    assert_eq!(saved.record.video(2).and_then(|v| v.media_id), Some(second));

    payload.video_1_media_id = None;
    let saved = save::<WhyWeExistRepo>(&pool, &payload).await.unwrap();
    assert_eq!(saved.outcome, UpsertOutcome::Updated);
    assert_eq!(saved.record.videos.len(), 2);
    assert_eq!(saved.record.video(1).and_then(|v| v.media_id), None);
    assert_eq!(saved.record.video(2).and_then(|v| v.url.as_deref()), Some("https://cdn.example.com/videos/test/two.mp4"));
    assert_eq!(count(&pool, "why_videos").await, 2);
    assert_eq!(count(&pool, "media").await, 2);
}
