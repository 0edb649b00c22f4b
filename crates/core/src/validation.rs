//! Field-level validation helpers shared by every content payload.
//!
//! Payload structs use `validator` derives for simple per-field rules; the
//! cross-field rules (bilingual pairs, upload gate, list shapes) go through
//! [`FieldErrors`]. Both end up as [`CoreError::InvalidFields`].

use validator::ValidationErrors;

use crate::error::{CoreError, FieldError};

/// Message used when a media slot holds a file that was never uploaded.
pub const UPLOAD_PENDING: &str = "upload pending: upload the selected file before saving";

/// Accumulates field errors so a single response can list all of them.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    /// Require a non-blank value.
    pub fn require(&mut self, field: &str, value: Option<&str>) {
        if is_blank(value) {
            self.push(field, "is required");
        }
    }

    /// Require both halves of a bilingual pair (`{base}_en` / `{base}_tr`).
    ///
    /// Each missing half is reported under its own column name.
    pub fn require_pair(&mut self, base: &str, en: Option<&str>, tr: Option<&str>) {
        self.require(&format!("{base}_en"), en);
        self.require(&format!("{base}_tr"), tr);
    }

    /// Require that an optional value is present.
    ///
    /// Skipped when the field already has an error (a pending upload, say).
    pub fn require_some<T>(&mut self, field: &str, value: Option<&T>) {
        if value.is_none() && !self.has(field) {
            self.push(field, "is required");
        }
    }

    /// Refuse every slot that still holds a local, un-uploaded file.
    pub fn reject_pending_uploads(&mut self, pending: &[String]) {
        for slot in pending {
            self.push(slot.clone(), UPLOAD_PENDING);
        }
    }

    /// Merge errors produced by `validator` derives.
    pub fn extend_validator(&mut self, errors: ValidationErrors) {
        self.0.extend(field_errors_from(&errors));
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|f| f.field == field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[FieldError] {
        &self.0
    }

    pub fn into_result(self) -> Result<(), CoreError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidFields(self.0))
        }
    }
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        CoreError::InvalidFields(field_errors_from(&errors))
    }
}

/// Flatten `validator` output into sorted [`FieldError`]s.
fn field_errors_from(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| describe_code(&e.code));
                FieldError::new(field.clone(), message)
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn describe_code(code: &str) -> String {
    match code {
        "required" => "is required".to_string(),
        "length" => "has an invalid length".to_string(),
        "email" => "must be a valid email address".to_string(),
        "url" => "must be a valid URL".to_string(),
        "range" => "is out of range".to_string(),
        other => format!("is invalid ({other})"),
    }
}

/// True when the value is missing or whitespace only.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// `validator` custom rule: the string must contain a non-whitespace character.
pub fn non_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut err = validator::ValidationError::new("required");
        err.message = Some("is required".into());
        return Err(err);
    }
    Ok(())
}
