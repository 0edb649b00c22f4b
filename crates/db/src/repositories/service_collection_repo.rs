//! Repository for the `service_collections` singleton.

use async_trait::async_trait;
use sqlx::PgConnection;
use vitrin_core::types::DbId;

use crate::models::service::{
    SaveServiceCollection, ServiceCollection, DEFAULT_COLLECTION_TITLE_EN,
    DEFAULT_COLLECTION_TITLE_TR,
};
use crate::singleton::SingletonContent;

/// Columns of the joined collection read.
const COLUMNS: &str = "\
    sc.id, sc.main_title_en, sc.main_title_tr, sc.main_image_media_id, \
    sc.created_at, sc.updated_at, m.url AS main_image_url";

/// Provides data access for the services page settings.
pub struct ServiceCollectionRepo;

impl ServiceCollectionRepo {
    /// Id of the collection row, creating it with default titles when
    /// none exists. Callers must hold the collection's advisory lock.
    pub async fn ensure_exists(conn: &mut PgConnection) -> Result<DbId, sqlx::Error> {
        if let Some(id) = Self::find_identity(&mut *conn).await? {
            return Ok(id);
        }
        let id = sqlx::query_scalar(
            "INSERT INTO service_collections (main_title_en, main_title_tr) \
             VALUES ($1, $2) RETURNING id",
        )
        .bind(DEFAULT_COLLECTION_TITLE_EN)
        .bind(DEFAULT_COLLECTION_TITLE_TR)
        .fetch_one(conn)
        .await?;
        tracing::info!(collection_id = id, "Created default service collection");
        Ok(id)
    }
}

#[async_trait]
impl SingletonContent for ServiceCollectionRepo {
    const TABLE: &'static str = "service_collections";
    const ENTITY: &'static str = "service collection";

    type Payload = SaveServiceCollection;
    type Record = ServiceCollection;

    async fn find_identity(conn: &mut PgConnection) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM service_collections ORDER BY id ASC LIMIT 1")
            .fetch_optional(conn)
            .await
    }

    async fn fetch(conn: &mut PgConnection) -> Result<Option<ServiceCollection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM service_collections sc \
             LEFT JOIN media m ON m.id = sc.main_image_media_id \
             ORDER BY sc.id ASC LIMIT 1"
        );
        sqlx::query_as::<_, ServiceCollection>(&query)
            .fetch_optional(conn)
            .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: DbId,
        payload: &SaveServiceCollection,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE service_collections SET \
                 main_title_en = $2, main_title_tr = $3, main_image_media_id = $4, \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&payload.main_title_en)
        .bind(&payload.main_title_tr)
        .bind(payload.main_image_media_id)
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn insert(
        conn: &mut PgConnection,
        payload: &SaveServiceCollection,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO service_collections (main_title_en, main_title_tr, main_image_media_id) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&payload.main_title_en)
        .bind(&payload.main_title_tr)
        .bind(payload.main_image_media_id)
        .fetch_one(conn)
        .await
    }
}
