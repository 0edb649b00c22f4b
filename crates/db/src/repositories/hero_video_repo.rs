//! Repository for the `hero_videos` singleton.

use async_trait::async_trait;
use sqlx::PgConnection;
use vitrin_core::types::DbId;

use crate::models::hero::{HeroVideo, SaveHeroVideo};
use crate::singleton::SingletonContent;

/// Columns of the joined hero read.
const COLUMNS: &str = "\
    hv.id, hv.media_id, hv.mobile_media_id, hv.title_en, hv.title_tr, \
    hv.description_en, hv.description_tr, hv.is_active, hv.created_at, hv.updated_at, \
    m.url AS video_url, m.mime_type AS video_mime_type, \
    mm.url AS mobile_video_url, mm.mime_type AS mobile_video_mime_type";

/// Provides data access for the hero video section.
pub struct HeroVideoRepo;

#[async_trait]
impl SingletonContent for HeroVideoRepo {
    const TABLE: &'static str = "hero_videos";
    const ENTITY: &'static str = "hero video";

    type Payload = SaveHeroVideo;
    type Record = HeroVideo;

    async fn find_identity(conn: &mut PgConnection) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT id FROM hero_videos WHERE is_active = true \
             ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .fetch_optional(conn)
        .await
    }

    async fn fetch(conn: &mut PgConnection) -> Result<Option<HeroVideo>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM hero_videos hv \
             LEFT JOIN media m ON m.id = hv.media_id \
             LEFT JOIN media mm ON mm.id = hv.mobile_media_id \
             WHERE hv.is_active = true \
             ORDER BY hv.created_at DESC, hv.id DESC LIMIT 1"
        );
        sqlx::query_as::<_, HeroVideo>(&query)
            .fetch_optional(conn)
            .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: DbId,
        payload: &SaveHeroVideo,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE hero_videos SET \
                 media_id = $2, mobile_media_id = $3, \
                 title_en = $4, title_tr = $5, \
                 description_en = $6, description_tr = $7, \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(payload.media_id)
        .bind(payload.mobile_media_id)
        .bind(&payload.title_en)
        .bind(&payload.title_tr)
        .bind(&payload.description_en)
        .bind(&payload.description_tr)
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn insert(conn: &mut PgConnection, payload: &SaveHeroVideo) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO hero_videos \
                 (media_id, mobile_media_id, title_en, title_tr, description_en, description_tr) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id",
        )
        .bind(payload.media_id)
        .bind(payload.mobile_media_id)
        .bind(&payload.title_en)
        .bind(&payload.title_tr)
        .bind(&payload.description_en)
        .bind(&payload.description_tr)
        .fetch_one(conn)
        .await
    }
}
