//! Repository for the `why_sections` singleton and its `why_videos` slots.

use async_trait::async_trait;
use sqlx::PgConnection;
use vitrin_core::types::DbId;

use crate::models::why_we_exist::{SaveWhyWeExist, WhySection, WhyVideo, WhyWeExist, VIDEO_SLOTS};
use crate::singleton::SingletonContent;

/// Column list for `why_sections` queries.
const SECTION_COLUMNS: &str = "\
    id, main_title_en, main_title_tr, left_title_en, left_title_tr, \
    right_paragraph_1_en, right_paragraph_1_tr, right_paragraph_2_en, right_paragraph_2_tr, \
    bottom_text_en, bottom_text_tr, created_at, updated_at";

/// Provides data access for the "why we exist" section.
pub struct WhyWeExistRepo;

impl WhyWeExistRepo {
    async fn videos(conn: &mut PgConnection, section_id: DbId) -> Result<Vec<WhyVideo>, sqlx::Error> {
        sqlx::query_as::<_, WhyVideo>(
            "SELECT wv.id, wv.section_id, wv.video_position, wv.media_id, \
                    m.url, m.original_filename, m.file_type \
             FROM why_videos wv \
             LEFT JOIN media m ON m.id = wv.media_id \
             WHERE wv.section_id = $1 \
             ORDER BY wv.video_position ASC",
        )
        .bind(section_id)
        .fetch_all(conn)
        .await
    }
}

#[async_trait]
impl SingletonContent for WhyWeExistRepo {
    const TABLE: &'static str = "why_sections";
    const ENTITY: &'static str = "why we exist section";

    type Payload = SaveWhyWeExist;
    type Record = WhyWeExist;

    async fn find_identity(conn: &mut PgConnection) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM why_sections ORDER BY created_at DESC, id DESC LIMIT 1")
            .fetch_optional(conn)
            .await
    }

    async fn fetch(conn: &mut PgConnection) -> Result<Option<WhyWeExist>, sqlx::Error> {
        let query = format!(
            "SELECT {SECTION_COLUMNS} FROM why_sections ORDER BY created_at DESC, id DESC LIMIT 1"
        );
        let Some(section) = sqlx::query_as::<_, WhySection>(&query)
            .fetch_optional(&mut *conn)
            .await?
        else {
            return Ok(None);
        };
        let videos = Self::videos(conn, section.id).await?;
        Ok(Some(WhyWeExist { section, videos }))
    }

    async fn update(
        conn: &mut PgConnection,
        id: DbId,
        payload: &SaveWhyWeExist,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE why_sections SET \
                 main_title_en = $2, main_title_tr = $3, \
                 left_title_en = $4, left_title_tr = $5, \
                 right_paragraph_1_en = $6, right_paragraph_1_tr = $7, \
                 right_paragraph_2_en = $8, right_paragraph_2_tr = $9, \
                 bottom_text_en = $10, bottom_text_tr = $11, \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&payload.main_title_en)
        .bind(&payload.main_title_tr)
        .bind(&payload.left_title_en)
        .bind(&payload.left_title_tr)
        .bind(&payload.right_paragraph_1_en)
        .bind(&payload.right_paragraph_1_tr)
        .bind(&payload.right_paragraph_2_en)
        .bind(&payload.right_paragraph_2_tr)
        .bind(&payload.bottom_text_en)
        .bind(&payload.bottom_text_tr)
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn insert(conn: &mut PgConnection, payload: &SaveWhyWeExist) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO why_sections \
                 (main_title_en, main_title_tr, left_title_en, left_title_tr, \
                  right_paragraph_1_en, right_paragraph_1_tr, \
                  right_paragraph_2_en, right_paragraph_2_tr, \
                  bottom_text_en, bottom_text_tr) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING id",
        )
        .bind(&payload.main_title_en)
        .bind(&payload.main_title_tr)
        .bind(&payload.left_title_en)
        .bind(&payload.left_title_tr)
        .bind(&payload.right_paragraph_1_en)
        .bind(&payload.right_paragraph_1_tr)
        .bind(&payload.right_paragraph_2_en)
        .bind(&payload.right_paragraph_2_tr)
        .bind(&payload.bottom_text_en)
        .bind(&payload.bottom_text_tr)
        .fetch_one(conn)
        .await
    }

    /// Upsert both video slots, keyed by `(section_id, video_position)`.
    /// An empty slot keeps its row with a NULL media id.
    async fn write_children(
        conn: &mut PgConnection,
        id: DbId,
        payload: &SaveWhyWeExist,
    ) -> Result<(), sqlx::Error> {
        for position in 1..=VIDEO_SLOTS {
            sqlx::query(
                "INSERT INTO why_videos (section_id, video_position, media_id) \
                 VALUES ($1, $2, $3) \
                 ON CONFLICT (section_id, video_position) DO UPDATE SET \
                     media_id = EXCLUDED.media_id, \
                     updated_at = NOW()",
            )
            .bind(id)
            .bind(position)
            .bind(payload.video_media_id(position))
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }
}
