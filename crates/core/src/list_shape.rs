//! Stored shapes of bilingual item lists (CTA marquee items and similar).
//!
//! Older rows hold the list in one of three shapes. The repository decodes the
//! raw JSON once with [`StoredList::detect`] and everything past that point
//! only sees canonical [`BilingualItem`]s.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::locale::Locale;

const MALFORMED: &str = "malformed list shape";

/// One list entry in canonical form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BilingualItem {
    #[serde(default)]
    pub text_en: String,
    #[serde(default)]
    pub text_tr: String,
}

impl BilingualItem {
    pub fn new(en: impl Into<String>, tr: impl Into<String>) -> Self {
        Self {
            text_en: en.into(),
            text_tr: tr.into(),
        }
    }

    /// A legacy entry: one string shared by both languages.
    pub fn shared(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            text_en: text.clone(),
            text_tr: text,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text_en.trim().is_empty() && self.text_tr.trim().is_empty()
    }

    pub fn display(&self, locale: Locale) -> &str {
        crate::bilingual::display(Some(self.text_en.as_str()), Some(self.text_tr.as_str()), locale)
    }
}

/// The shape a list was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredList {
    /// `[{"text_en": "...", "text_tr": "..."}]`
    ObjectList(Vec<BilingualItem>),
    /// `["A", "B"]`
    LegacyStringList(Vec<String>),
    /// A JSON string whose content is one of the other shapes.
    EncodedString(String),
}

impl StoredList {
    /// Classify a raw JSON value. `null` is an empty object list.
    pub fn detect(value: Value) -> Result<Self, CoreError> {
        match value {
            Value::Null => Ok(StoredList::ObjectList(Vec::new())),
            Value::String(s) => Ok(StoredList::EncodedString(s)),
            Value::Array(items) if items.is_empty() => Ok(StoredList::ObjectList(Vec::new())),
            Value::Array(items) if items.iter().all(Value::is_string) => {
                let strings = items
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect();
                Ok(StoredList::LegacyStringList(strings))
            }
            Value::Array(items) if items.iter().all(Value::is_object) => {
                let objects = items
                    .into_iter()
                    .map(serde_json::from_value::<BilingualItem>)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| CoreError::Validation(MALFORMED.to_string()))?;
                Ok(StoredList::ObjectList(objects))
            }
            _ => Err(CoreError::Validation(MALFORMED.to_string())),
        }
    }

    /// Convert to canonical items.
    ///
    /// An encoded string is unwrapped one level only; a string inside a string
    /// is rejected.
    pub fn into_items(self) -> Result<Vec<BilingualItem>, CoreError> {
        match self {
            StoredList::ObjectList(items) => Ok(items),
            StoredList::LegacyStringList(strings) => {
                Ok(strings.into_iter().map(BilingualItem::shared).collect())
            }
            StoredList::EncodedString(raw) => {
                if raw.trim().is_empty() {
                    return Ok(Vec::new());
                }
                let inner: Value = serde_json::from_str(&raw)
                    .map_err(|_| CoreError::Validation(MALFORMED.to_string()))?;
                match StoredList::detect(inner)? {
                    StoredList::EncodedString(_) => {
                        Err(CoreError::Validation(MALFORMED.to_string()))
                    }
                    shape => shape.into_items(),
                }
            }
        }
    }
}

/// Decode any stored shape into canonical items.
pub fn normalize(value: Value) -> Result<Vec<BilingualItem>, CoreError> {
    StoredList::detect(value)?.into_items()
}

/// `serde` adapter: accept any stored shape in a request body.
///
/// Use with `#[serde(default, deserialize_with = "list_shape::deserialize_items")]`.
pub fn deserialize_items<'de, D>(deserializer: D) -> Result<Vec<BilingualItem>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    normalize(value).map_err(serde::de::Error::custom)
}

/// Encode canonical items for storage (always the object-list shape).
pub fn encode(items: &[BilingualItem]) -> Value {
    serde_json::to_value(items).unwrap_or(Value::Array(Vec::new()))
}
