//! Bilingual (`_en` / `_tr`) field pairs and display fallback.

use crate::locale::Locale;

/// Resolve a pair for display.
///
/// Returns the requested language when it has non-whitespace text, the other
/// language when that does, and `""` otherwise. Storage is never touched.
pub fn display<'a>(en: Option<&'a str>, tr: Option<&'a str>, locale: Locale) -> &'a str {
    let (first, second) = match locale {
        Locale::En => (en, tr),
        Locale::Tr => (tr, en),
    };
    [first, second]
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_other_language() {
        assert_eq!(display(Some(""), Some("X"), Locale::En), "X");
        assert_eq!(display(None, Some("X"), Locale::En), "X");
    }

    #[test]
    fn both_empty_yields_empty() {
        assert_eq!(display(Some(""), Some(""), Locale::En), "");
        assert_eq!(display(None, None, Locale::Tr), "");
    }

    #[test]
    fn requested_language_wins_when_present() {
        assert_eq!(display(Some("Y"), Some("X"), Locale::Tr), "X");
        assert_eq!(display(Some("Y"), Some("X"), Locale::En), "Y");
    }

    #[test]
    fn whitespace_counts_as_empty() {
        assert_eq!(display(Some("  "), Some("Merhaba"), Locale::En), "Merhaba");
    }
}
