//! Fetch / upsert protocol for content sections stored as a single row.
//!
//! A section has no caller-visible id: "the" row is whatever the repo's
//! identity query finds (usually the most recent active row). Writes
//! discover that identity inside a transaction, update it in place or insert
//! the first row, write any slotted children, and re-read the result through
//! the same query `fetch` uses before committing.
//!
//! Concurrent first saves are serialised with a transaction-scoped advisory
//! lock keyed on the table name, so two racing inserts cannot leave two rows.

use async_trait::async_trait;
use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use vitrin_core::draft::Draft;
use vitrin_core::error::CoreError;
use vitrin_core::types::DbId;

/// A content section persisted as one row (plus optional child rows).
#[async_trait]
pub trait SingletonContent: Send + Sync {
    /// Table holding the section row; also the advisory lock key.
    const TABLE: &'static str;

    /// Human-readable section name for messages.
    const ENTITY: &'static str;

    type Payload: Sync;
    type Record: Send;

    /// Id of the row a save should update, if one exists.
    async fn find_identity(conn: &mut PgConnection) -> Result<Option<DbId>, sqlx::Error>;

    /// The current record joined with its media.
    async fn fetch(conn: &mut PgConnection) -> Result<Option<Self::Record>, sqlx::Error>;

    /// Overwrite every mutable column of row `id`.
    async fn update(conn: &mut PgConnection, id: DbId, payload: &Self::Payload) -> Result<(), sqlx::Error>;

    /// Insert the first row and return its id.
    async fn insert(conn: &mut PgConnection, payload: &Self::Payload) -> Result<DbId, sqlx::Error>;

    /// Upsert slotted child rows of `id`. Most sections have none.
    async fn write_children(
        _conn: &mut PgConnection,
        _id: DbId,
        _payload: &Self::Payload,
    ) -> Result<(), sqlx::Error> {
        Ok(())
    }
}

/// Whether a save created the row or updated it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    Created,
    Updated,
}

#[derive(Debug)]
pub struct Upserted<R> {
    pub record: R,
    pub outcome: UpsertOutcome,
}

/// A rejected or failed save.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error(transparent)]
    Invalid(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Take the transaction-scoped advisory lock for `table`.
pub(crate) async fn lock_table(conn: &mut PgConnection, table: &str) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(table)
        .execute(conn)
        .await?;
    Ok(())
}

/// Read the current record. `None` when the section has never been saved.
pub async fn fetch<C: SingletonContent>(pool: &PgPool) -> Result<Option<C::Record>, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    C::fetch(&mut *conn).await
}

/// Create-or-update the section row in one transaction.
///
/// The payload is written as given; validation is the caller's job (see
/// [`save`]).
pub async fn upsert<C: SingletonContent>(
    pool: &PgPool,
    payload: &C::Payload,
) -> Result<Upserted<C::Record>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    lock_table(&mut *tx, C::TABLE).await?;

    let (id, outcome) = match C::find_identity(&mut *tx).await? {
        Some(id) => {
            C::update(&mut *tx, id, payload).await?;
            (id, UpsertOutcome::Updated)
        }
        None => (C::insert(&mut *tx, payload).await?, UpsertOutcome::Created),
    };

    C::write_children(&mut *tx, id, payload).await?;

    let record = C::fetch(&mut *tx).await?.ok_or(sqlx::Error::RowNotFound)?;
    tx.commit().await?;

    tracing::debug!(table = C::TABLE, id, ?outcome, "Upserted singleton content");
    Ok(Upserted { record, outcome })
}

/// Validate the payload (including the pending-upload gate) and upsert it.
pub async fn save<C>(pool: &PgPool, payload: &C::Payload) -> Result<Upserted<C::Record>, SaveError>
where
    C: SingletonContent,
    C::Payload: Draft,
{
    payload.check()?;
    Ok(upsert::<C>(pool, payload).await?)
}
