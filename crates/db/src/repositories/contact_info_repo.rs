//! Repository for the `contact_info` singleton.

use async_trait::async_trait;
use sqlx::PgConnection;
use vitrin_core::types::DbId;

use crate::models::contact_info::{ContactInfo, SaveContactInfo};
use crate::singleton::SingletonContent;

/// Column list for `contact_info` queries.
const COLUMNS: &str = "\
    id, email, phone, address_en, address_tr, linkedin_url, instagram_url, \
    created_at, updated_at";

/// Provides data access for the contact details.
pub struct ContactInfoRepo;

#[async_trait]
impl SingletonContent for ContactInfoRepo {
    const TABLE: &'static str = "contact_info";
    const ENTITY: &'static str = "contact info";

    type Payload = SaveContactInfo;
    type Record = ContactInfo;

    async fn find_identity(conn: &mut PgConnection) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM contact_info ORDER BY created_at DESC, id DESC LIMIT 1")
            .fetch_optional(conn)
            .await
    }

    async fn fetch(conn: &mut PgConnection) -> Result<Option<ContactInfo>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM contact_info ORDER BY created_at DESC, id DESC LIMIT 1");
        sqlx::query_as::<_, ContactInfo>(&query)
            .fetch_optional(conn)
            .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: DbId,
        payload: &SaveContactInfo,
    ) -> Result<(), sqlx::Error> {
        let p = payload.normalized();
        sqlx::query(
            "UPDATE contact_info SET \
                 email = $2, phone = $3, address_en = $4, address_tr = $5, \
                 linkedin_url = $6, instagram_url = $7, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&p.email)
        .bind(&p.phone)
        .bind(&p.address_en)
        .bind(&p.address_tr)
        .bind(&p.linkedin_url)
        .bind(&p.instagram_url)
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn insert(conn: &mut PgConnection, payload: &SaveContactInfo) -> Result<DbId, sqlx::Error> {
        let p = payload.normalized();
        sqlx::query_scalar(
            "INSERT INTO contact_info \
                 (email, phone, address_en, address_tr, linkedin_url, instagram_url) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id",
        )
        .bind(&p.email)
        .bind(&p.phone)
        .bind(&p.address_en)
        .bind(&p.address_tr)
        .bind(&p.linkedin_url)
        .bind(&p.instagram_url)
        .fetch_one(conn)
        .await
    }
}
