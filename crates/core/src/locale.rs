//! The two display languages of the site.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Tr,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Tr];

    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Tr => "tr",
        }
    }

    /// The language used when this one has no text.
    pub fn other(self) -> Locale {
        match self {
            Locale::En => Locale::Tr,
            Locale::Tr => Locale::En,
        }
    }

    /// Resolve the request locale.
    ///
    /// The primary tag of `Accept-Language` wins when it is Turkish; otherwise
    /// an explicit `X-Locale` header is honoured; English is the default.
    pub fn from_headers(accept_language: Option<&str>, x_locale: Option<&str>) -> Locale {
        let primary = accept_language
            .and_then(|h| h.split(',').next())
            .and_then(|tag| tag.split(';').next())
            .and_then(|tag| tag.trim().split('-').next())
            .map(str::to_ascii_lowercase);

        if primary.as_deref() == Some("tr") {
            return Locale::Tr;
        }

        match x_locale.map(str::trim) {
            Some("tr") => Locale::Tr,
            _ => Locale::En,
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Locale {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "tr" => Ok(Locale::Tr),
            other => Err(CoreError::Validation(format!(
                "Unsupported locale '{other}'. Must be one of: en, tr"
            ))),
        }
    }
}
