//! Self-service account changes: profile details and password.

use serde::Deserialize;

use crate::contact::EMAIL_PATTERN;
use crate::error::CoreError;
use crate::validation::FieldErrors;

pub const MAX_NAME_LENGTH: usize = 100;

/// New name and email for the signed-in account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl ProfileUpdate {
    pub fn check(&self) -> Result<(), CoreError> {
        let mut errors = FieldErrors::new();
        errors.require("name", self.name.as_deref());
        errors.require("email", self.email.as_deref());

        if let Some(name) = self.name.as_deref() {
            if name.trim().chars().count() > MAX_NAME_LENGTH {
                errors.push("name", format!("must be at most {MAX_NAME_LENGTH} characters"));
            }
        }
        if let Some(email) = self.email.as_deref() {
            if !errors.has("email") && !EMAIL_PATTERN.is_match(email.trim()) {
                errors.push("email", "must be a valid email address");
            }
        }
        errors.into_result()
    }

    /// Trimmed name and lower-cased email. Call after [`check`](Self::check).
    pub fn normalized(&self) -> (String, String) {
        (
            self.name.as_deref().unwrap_or_default().trim().to_string(),
            self.email.as_deref().unwrap_or_default().trim().to_lowercase(),
        )
    }
}

/// Password change request. The current password is verified by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PasswordChange {
    #[serde(default, alias = "currentPassword")]
    pub current_password: Option<String>,
    #[serde(default, alias = "newPassword")]
    pub new_password: Option<String>,
    #[serde(default, alias = "confirmPassword")]
    pub confirm_password: Option<String>,
}

impl PasswordChange {
    /// Presence, confirmation match and minimum length of the new password.
    pub fn check(&self, min_length: usize) -> Result<(), CoreError> {
        let mut errors = FieldErrors::new();
        errors.require("current_password", self.current_password.as_deref());
        errors.require("new_password", self.new_password.as_deref());
        errors.require("confirm_password", self.confirm_password.as_deref());

        if let (Some(new), Some(confirm)) = (&self.new_password, &self.confirm_password) {
            if !errors.has("new_password") && new.chars().count() < min_length {
                errors.push("new_password", format!("must be at least {min_length} characters"));
            }
            if !errors.has("confirm_password") && new != confirm {
                errors.push("confirm_password", "does not match the new password");
            }
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(err: CoreError) -> Vec<String> {
        err.fields().iter().map(|f| f.field.clone()).collect()
    }

    #[test]
    fn profile_requires_name_and_valid_email() {
        let err = ProfileUpdate::default().check().unwrap_err();
        assert_eq!(fields(err), vec!["name", "email"]);

        let bad = ProfileUpdate {
            name: Some("Ada".into()),
            email: Some("ada@example".into()),
        };
        assert_eq!(fields(bad.check().unwrap_err()), vec!["email"]);
    }

    #[test]
    fn profile_is_normalized() {
        let update = ProfileUpdate {
            name: Some("  Ada Lovelace ".into()),
            email: Some(" Ada@Example.COM".into()),
        };
        update.check().unwrap();
        assert_eq!(
            update.normalized(),
            ("Ada Lovelace".to_string(), "ada@example.com".to_string())
        );
    }

    #[test]
    fn password_change_rules() {
        let change = |new: &str, confirm: &str| PasswordChange {
            current_password: Some("old-password".into()),
            new_password: Some(new.into()),
            confirm_password: Some(confirm.into()),
        };

        assert!(change("long-enough-pass", "long-enough-pass").check(12).is_ok());
        assert_eq!(fields(change("short", "short").check(12).unwrap_err()), vec!["new_password"]);
        assert_eq!(
            fields(change("long-enough-pass", "long-enough-typo").check(12).unwrap_err()),
            vec!["confirm_password"]
        );
        assert_eq!(
            fields(PasswordChange::default().check(12).unwrap_err()),
            vec!["current_password", "new_password", "confirm_password"]
        );
    }

    #[test]
    fn camel_case_body_is_accepted() {
        let change: PasswordChange = serde_json::from_str(
            r#"{"currentPassword":"a","newPassword":"b","confirmPassword":"b"}"#,
        )
        .unwrap();
        assert_eq!(change.new_password.as_deref(), Some("b"));
    }
}
