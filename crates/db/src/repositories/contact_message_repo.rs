//! Repository for the `contact_messages` table.

use sqlx::PgPool;
use vitrin_core::contact::{ContactSubmission, MessageStatus, Pagination};
use vitrin_core::types::DbId;

use crate::models::contact_message::{ContactMessage, ContactMessagePage, UpdateContactMessage};

/// Column list for `contact_messages` queries.
const COLUMNS: &str = "\
    id, name, email, phone, company, message, service_interest, \
    is_read, is_processed, created_at, updated_at";

/// Provides data access for the contact inbox.
pub struct ContactMessageRepo;

impl ContactMessageRepo {
    /// Store a submission. The caller validates and normalizes it first.
    pub async fn create(
        pool: &PgPool,
        submission: &ContactSubmission,
    ) -> Result<ContactMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO contact_messages \
                 (name, email, phone, company, message, service_interest) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(&submission.name)
            .bind(&submission.email)
            .bind(&submission.phone)
            .bind(&submission.company)
            .bind(&submission.message)
            .bind(&submission.service_interest)
            .fetch_one(pool)
            .await
    }

    /// Newest-first page of messages matching `status`.
    pub async fn list(
        pool: &PgPool,
        status: MessageStatus,
        page: Pagination,
    ) -> Result<ContactMessagePage, sqlx::Error> {
        let filter = match status {
            MessageStatus::All => "",
            MessageStatus::Unread => "WHERE is_read = false",
            MessageStatus::Read => "WHERE is_read = true",
            MessageStatus::Processed => "WHERE is_processed = true",
        };

        let count_query = format!("SELECT COUNT(*) FROM contact_messages {filter}");
        let total: i64 = sqlx::query_scalar(&count_query).fetch_one(pool).await?;

        let query = format!(
            "SELECT {COLUMNS} FROM contact_messages {filter} \
             ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        let messages = sqlx::query_as::<_, ContactMessage>(&query)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        Ok(ContactMessagePage {
            messages,
            pagination: page.page_info(total),
        })
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ContactMessage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contact_messages WHERE id = $1");
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update the read / processed flags. Returns `None` if the message does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        dto: &UpdateContactMessage,
    ) -> Result<Option<ContactMessage>, sqlx::Error> {
        let query = format!(
            "UPDATE contact_messages SET \
                 is_read = COALESCE($2, is_read), \
                 is_processed = COALESCE($3, is_processed), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(id)
            .bind(dto.is_read)
            .bind(dto.is_processed)
            .fetch_optional(pool)
            .await
    }
}
