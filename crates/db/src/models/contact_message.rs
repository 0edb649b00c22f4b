//! Messages from the public contact form.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vitrin_core::contact::PageInfo;
use vitrin_core::types::{DbId, Timestamp};

/// A row from the `contact_messages` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: String,
    pub service_interest: Option<String>,
    pub is_read: bool,
    pub is_processed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for marking a message. `None` leaves the flag unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateContactMessage {
    pub is_read: Option<bool>,
    pub is_processed: Option<bool>,
}

/// One page of the admin inbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessagePage {
    pub messages: Vec<ContactMessage>,
    pub pagination: PageInfo,
}
