/// Primary key of every table (`BIGSERIAL`).
pub type DbId = i64;

/// Stored as `TIMESTAMPTZ`, handled in UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
