//! Content section identifiers and slug rules.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::CoreError;

pub const MAX_SLUG_LEN: usize = 255;

static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid regex"));

/// Content sections readable through the public API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentDomain {
    Hero,
    WhyWeExist,
    CtaSection,
    Services,
    ContactInfo,
}

impl ContentDomain {
    pub const ALL: [ContentDomain; 5] = [
        ContentDomain::Hero,
        ContentDomain::WhyWeExist,
        ContentDomain::CtaSection,
        ContentDomain::Services,
        ContentDomain::ContactInfo,
    ];

    /// Path segment used by the API.
    pub fn slug(self) -> &'static str {
        match self {
            ContentDomain::Hero => "hero",
            ContentDomain::WhyWeExist => "why-we-exist",
            ContentDomain::CtaSection => "cta-section",
            ContentDomain::Services => "services",
            ContentDomain::ContactInfo => "contact-info",
        }
    }

    /// Human-readable name used in error messages.
    pub fn entity(self) -> &'static str {
        match self {
            ContentDomain::Hero => "hero video",
            ContentDomain::WhyWeExist => "why we exist",
            ContentDomain::CtaSection => "CTA section",
            ContentDomain::Services => "services",
            ContentDomain::ContactInfo => "contact info",
        }
    }
}

impl std::str::FromStr for ContentDomain {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentDomain::ALL
            .into_iter()
            .find(|d| d.slug() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown content section '{s}'")))
    }
}

/// Derive a URL slug from a title. Turkish letters are folded to ASCII.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars().map(fold_char) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn fold_char(c: char) -> char {
    match c {
        'ç' | 'Ç' => 'c',
        'ğ' | 'Ğ' => 'g',
        'ı' | 'I' | 'İ' => 'i',
        'ö' | 'Ö' => 'o',
        'ş' | 'Ş' => 's',
        'ü' | 'Ü' => 'u',
        other => other,
    }
}

pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.len() > MAX_SLUG_LEN || !SLUG_PATTERN.is_match(slug) {
        return Err(CoreError::Validation(format!(
            "Invalid slug '{slug}'. Use lowercase letters, digits and single dashes"
        )));
    }
    Ok(())
}
