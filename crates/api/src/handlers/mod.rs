pub mod account;
pub mod auth;
pub mod contact;
pub mod content;
pub mod homepage;
pub mod sections;
pub mod services;
pub mod upload;

use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::HeaderMap;
use vitrin_core::locale::Locale;

/// Locale of a request from `Accept-Language` / `X-Locale`.
pub(crate) fn header_locale(headers: &HeaderMap) -> Locale {
    let header = |name| headers.get(name).and_then(|v| v.to_str().ok());
    Locale::from_headers(header(ACCEPT_LANGUAGE.as_str()), header("x-locale"))
}
