//! Public contact form rules and admin inbox paging.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const MIN_MESSAGE_CHARS: usize = 10;
pub const MAX_MESSAGE_CHARS: usize = 5000;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;
/// Highest page number accepted; larger requests are clamped.
pub const MAX_PAGE: i64 = 1_000_000;

pub(crate) static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

/// Translation keys for contact form outcomes.
pub mod keys {
    pub const REQUIRED_FIELDS: &str = "api.contact.required_fields";
    pub const INVALID_EMAIL: &str = "api.contact.invalid_email";
    pub const MESSAGE_TOO_SHORT: &str = "api.contact.message_too_short";
    pub const MESSAGE_TOO_LONG: &str = "api.contact.message_too_long";
    pub const SUCCESS: &str = "api.contact.success";
    pub const ERROR: &str = "api.contact.error";
    pub const DUPLICATE: &str = "api.contact.duplicate";
}

/// A message sent through the public contact form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(alias = "serviceInterest")]
    pub service_interest: Option<String>,
}

impl ContactSubmission {
    /// Validate the submission; the error is a translation key.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() || self.message.trim().is_empty() {
            return Err(keys::REQUIRED_FIELDS);
        }
        if !EMAIL_PATTERN.is_match(self.email.trim()) {
            return Err(keys::INVALID_EMAIL);
        }
        let len = self.message.trim().chars().count();
        if len < MIN_MESSAGE_CHARS {
            return Err(keys::MESSAGE_TOO_SHORT);
        }
        if len > MAX_MESSAGE_CHARS {
            return Err(keys::MESSAGE_TOO_LONG);
        }
        Ok(())
    }

    /// Trimmed copy ready for storage; the email is lower-cased and blank
    /// optional fields become `None`.
    pub fn normalized(&self) -> ContactSubmission {
        ContactSubmission {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: trimmed(self.phone.as_deref()),
            company: trimmed(self.company.as_deref()),
            message: self.message.trim().to_string(),
            service_interest: trimmed(self.service_interest.as_deref()),
        }
    }
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Admin inbox
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    #[default]
    All,
    Unread,
    Read,
    Processed,
}

impl std::str::FromStr for MessageStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(MessageStatus::All),
            "unread" => Ok(MessageStatus::Unread),
            "read" => Ok(MessageStatus::Read),
            "processed" => Ok(MessageStatus::Processed),
            other => Err(CoreError::Validation(format!(
                "Invalid status '{other}'. Must be one of: all, unread, read, processed"
            ))),
        }
    }
}

/// 1-based page request, clamped to sane bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).clamp(1, MAX_PAGE),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn page_info(&self, total: i64) -> PageInfo {
        PageInfo {
            current_page: self.page,
            total_pages: total.saturating_add(self.limit - 1) / self.limit,
            total_messages: total,
            has_next_page: self.page.saturating_mul(self.limit) < total,
            has_prev_page: self.page > 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_messages: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}
