//! Repository for `services` and their `service_contents` and `service_tags`.
//!
//! A service and its content row are written together; tags are replaced
//! wholesale. Every write runs in one transaction so a failing tag leaves the
//! previous service untouched.

use sqlx::{PgConnection, PgPool};
use vitrin_core::types::DbId;

use crate::models::service::{SaveService, Service, ServiceDetail, ServiceTag, TagInput};
use crate::repositories::ServiceCollectionRepo;
use crate::singleton::{lock_table, SingletonContent};

/// Columns of the joined service read.
const COLUMNS: &str = "\
    s.id, s.collection_id, s.order_number, s.title_en, s.title_tr, s.slug, s.is_active, \
    s.created_at, s.updated_at, \
    c.image_media_id, m.url AS image_url, \
    c.middle_title_en, c.middle_title_tr, \
    c.paragraph_1_en, c.paragraph_1_tr, c.paragraph_2_en, c.paragraph_2_tr";

const FROM: &str = "\
    FROM services s \
    LEFT JOIN service_contents c ON c.service_id = s.id \
    LEFT JOIN media m ON m.id = c.image_media_id";

/// Provides data access for services.
pub struct ServiceRepo;

impl ServiceRepo {
    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Active services in display order.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Service>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} {FROM} WHERE s.is_active = true \
             ORDER BY s.order_number ASC, s.id ASC"
        );
        sqlx::query_as::<_, Service>(&query).fetch_all(pool).await
    }

    /// Every service, including inactive ones, in display order.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Service>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM} ORDER BY s.order_number ASC, s.id ASC");
        sqlx::query_as::<_, Service>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ServiceDetail>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::detail(&mut *conn, id).await
    }

    /// Public lookup; inactive services are not found.
    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<ServiceDetail>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        let id: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM services WHERE slug = $1 AND is_active = true")
                .bind(slug)
                .fetch_optional(&mut *conn)
                .await?;
        match id {
            Some(id) => Self::detail(&mut *conn, id).await,
            None => Ok(None),
        }
    }

    async fn detail(conn: &mut PgConnection, id: DbId) -> Result<Option<ServiceDetail>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM} WHERE s.id = $1");
        let Some(service) = sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
        else {
            return Ok(None);
        };
        let tags = sqlx::query_as::<_, ServiceTag>(
            "SELECT id, position, tag_en, tag_tr FROM service_tags \
             WHERE service_id = $1 ORDER BY position ASC",
        )
        .bind(id)
        .fetch_all(conn)
        .await?;
        Ok(Some(ServiceDetail { service, tags }))
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Create a service under the collection, creating the collection with
    /// default titles if this is the first service. An omitted order number
    /// places it last.
    pub async fn create(pool: &PgPool, payload: &SaveService) -> Result<ServiceDetail, sqlx::Error> {
        let mut tx = pool.begin().await?;

        lock_table(&mut *tx, ServiceCollectionRepo::TABLE).await?;
        let collection_id = ServiceCollectionRepo::ensure_exists(&mut *tx).await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO services (collection_id, order_number, title_en, title_tr, slug, is_active) \
             VALUES ($1, COALESCE($2, (SELECT COALESCE(MAX(order_number), 0) + 1 FROM services)), \
                     $3, $4, $5, COALESCE($6, true)) \
             RETURNING id",
        )
        .bind(collection_id)
        .bind(payload.order_number)
        .bind(&payload.title_en)
        .bind(&payload.title_tr)
        .bind(payload.resolved_slug())
        .bind(payload.is_active)
        .fetch_one(&mut *tx)
        .await?;

        Self::write_content(&mut *tx, id, payload).await?;
        Self::write_tags(&mut *tx, id, payload.kept_tags()).await?;

        let detail = Self::detail(&mut *tx, id).await?.ok_or(sqlx::Error::RowNotFound)?;
        tx.commit().await?;

        tracing::info!(service_id = id, slug = %detail.service.slug, "Created service");
        Ok(detail)
    }

    /// Overwrite a service, its content and its tags. Omitted order number
    /// and active flag keep their stored values. Returns `None` if the
    /// service does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        payload: &SaveService,
    ) -> Result<Option<ServiceDetail>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE services SET \
                 order_number = COALESCE($2, order_number), \
                 title_en = $3, title_tr = $4, slug = $5, \
                 is_active = COALESCE($6, is_active), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING id",
        )
        .bind(id)
        .bind(payload.order_number)
        .bind(&payload.title_en)
        .bind(&payload.title_tr)
        .bind(payload.resolved_slug())
        .bind(payload.is_active)
        .fetch_optional(&mut *tx)
        .await?;
        if updated.is_none() {
            return Ok(None);
        }

        Self::write_content(&mut *tx, id, payload).await?;
        Self::write_tags(&mut *tx, id, payload.kept_tags()).await?;

        let detail = Self::detail(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(detail)
    }

    /// Delete a service with its content and tags. Its media stay in place.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM service_tags WHERE service_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM service_contents WHERE service_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn write_content(
        conn: &mut PgConnection,
        service_id: DbId,
        payload: &SaveService,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO service_contents \
                 (service_id, image_media_id, middle_title_en, middle_title_tr, \
                  paragraph_1_en, paragraph_1_tr, paragraph_2_en, paragraph_2_tr) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (service_id) DO UPDATE SET \
                 image_media_id = EXCLUDED.image_media_id, \
                 middle_title_en = EXCLUDED.middle_title_en, \
                 middle_title_tr = EXCLUDED.middle_title_tr, \
                 paragraph_1_en = EXCLUDED.paragraph_1_en, \
                 paragraph_1_tr = EXCLUDED.paragraph_1_tr, \
                 paragraph_2_en = EXCLUDED.paragraph_2_en, \
                 paragraph_2_tr = EXCLUDED.paragraph_2_tr, \
                 updated_at = NOW()",
        )
        .bind(service_id)
        .bind(payload.image_media_id)
        .bind(&payload.middle_title_en)
        .bind(&payload.middle_title_tr)
        .bind(&payload.paragraph_1_en)
        .bind(&payload.paragraph_1_tr)
        .bind(&payload.paragraph_2_en)
        .bind(&payload.paragraph_2_tr)
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn write_tags<'a>(
        conn: &mut PgConnection,
        service_id: DbId,
        tags: impl Iterator<Item = &'a TagInput> + Send,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM service_tags WHERE service_id = $1")
            .bind(service_id)
            .execute(&mut *conn)
            .await?;
        for (position, tag) in (1i32..).zip(tags) {
            sqlx::query(
                "INSERT INTO service_tags (service_id, position, tag_en, tag_tr) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(service_id)
            .bind(position)
            .bind(tag.tag_en.trim())
            .bind(tag.tag_tr.trim())
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }
}
