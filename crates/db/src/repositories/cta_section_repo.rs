//! Repository for the `cta_section` singleton.
//!
//! `marquee_items` is decoded here, once, from whatever shape the row holds;
//! writes always store the canonical object list.
//!
//! A save targets the newest row whatever its `is_active` flag and
//! reactivates it.

use async_trait::async_trait;
use sqlx::PgConnection;
use vitrin_core::list_shape;
use vitrin_core::types::DbId;

use crate::models::cta_section::{CtaSection, CtaSectionRow, SaveCtaSection};
use crate::singleton::SingletonContent;

/// Columns of the joined CTA read.
const COLUMNS: &str = "\
    cs.id, cs.main_title_en, cs.main_title_tr, cs.description_en, cs.description_tr, \
    cs.button_text_en, cs.button_text_tr, cs.button_link, cs.background_image_media_id, \
    cs.marquee_items, cs.is_active, cs.created_at, cs.updated_at, \
    m.url AS background_image_url";

/// Provides data access for the CTA section.
pub struct CtaSectionRepo;

#[async_trait]
impl SingletonContent for CtaSectionRepo {
    const TABLE: &'static str = "cta_section";
    const ENTITY: &'static str = "CTA section";

    type Payload = SaveCtaSection;
    type Record = CtaSection;

    async fn find_identity(conn: &mut PgConnection) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM cta_section ORDER BY id DESC LIMIT 1")
            .fetch_optional(conn)
            .await
    }

    async fn fetch(conn: &mut PgConnection) -> Result<Option<CtaSection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cta_section cs \
             LEFT JOIN media m ON m.id = cs.background_image_media_id \
             WHERE cs.is_active = true \
             ORDER BY cs.id DESC LIMIT 1"
        );
        let row = sqlx::query_as::<_, CtaSectionRow>(&query)
            .fetch_optional(conn)
            .await?;
        row.map(|r| CtaSection::try_from(r).map_err(|e| sqlx::Error::Decode(Box::new(e))))
            .transpose()
    }

    async fn update(
        conn: &mut PgConnection,
        id: DbId,
        payload: &SaveCtaSection,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE cta_section SET \
                 main_title_en = $2, main_title_tr = $3, \
                 description_en = $4, description_tr = $5, \
                 button_text_en = $6, button_text_tr = $7, \
                 button_link = $8, background_image_media_id = $9, \
                 marquee_items = $10, is_active = true, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&payload.main_title_en)
        .bind(&payload.main_title_tr)
        .bind(&payload.description_en)
        .bind(&payload.description_tr)
        .bind(&payload.button_text_en)
        .bind(&payload.button_text_tr)
        .bind(payload.button_link_or_default())
        .bind(payload.background_image_media_id)
        .bind(list_shape::encode(&payload.marquee_items))
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn insert(conn: &mut PgConnection, payload: &SaveCtaSection) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO cta_section \
                 (main_title_en, main_title_tr, description_en, description_tr, \
                  button_text_en, button_text_tr, button_link, \
                  background_image_media_id, marquee_items) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING id",
        )
        .bind(&payload.main_title_en)
        .bind(&payload.main_title_tr)
        .bind(&payload.description_en)
        .bind(&payload.description_tr)
        .bind(&payload.button_text_en)
        .bind(&payload.button_text_tr)
        .bind(payload.button_link_or_default())
        .bind(payload.background_image_media_id)
        .bind(list_shape::encode(&payload.marquee_items))
        .fetch_one(conn)
        .await
    }
}
