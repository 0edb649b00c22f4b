//! Translation catalogue for messages the API returns to site visitors.
//!
//! Catalogue files are JSON objects, nested or flat; nested keys are joined
//! with `.` (`{"api": {"contact": {"success": ".."}}}` -> `api.contact.success`).
//! The built-in catalogue is compiled in; `init_from_dir` replaces it with
//! `{dir}/en.json` and `{dir}/tr.json`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{LazyLock, RwLock};

use serde_json::Value;

use crate::error::CoreError;
use crate::locale::Locale;

const EMBEDDED_EN: &str = include_str!("../locales/en.json");
const EMBEDDED_TR: &str = include_str!("../locales/tr.json");

static CATALOG: LazyLock<RwLock<Catalog>> = LazyLock::new(|| RwLock::new(Catalog::embedded()));

#[derive(Debug, Default, Clone)]
pub struct Catalog {
    messages: HashMap<Locale, HashMap<String, String>>,
}

impl Catalog {
    /// The compiled-in catalogue. Malformed embedded files yield an empty one.
    pub fn embedded() -> Self {
        let mut catalog = Catalog::default();
        for (locale, raw) in [(Locale::En, EMBEDDED_EN), (Locale::Tr, EMBEDDED_TR)] {
            if let Ok(messages) = parse(raw) {
                catalog.messages.insert(locale, messages);
            }
        }
        catalog
    }

    /// Load `{dir}/{code}.json` for every locale. Missing files are skipped.
    pub fn load_dir(dir: &Path) -> Result<Self, CoreError> {
        let mut catalog = Catalog::default();
        for locale in Locale::ALL {
            let path = dir.join(format!("{}.json", locale.code()));
            if !path.exists() {
                continue;
            }
            let raw = std::fs::read_to_string(&path).map_err(|e| {
                CoreError::Internal(format!("Failed to read {}: {e}", path.display()))
            })?;
            catalog.messages.insert(locale, parse(&raw)?);
        }
        Ok(catalog)
    }

    pub fn is_empty(&self) -> bool {
        self.messages.values().all(HashMap::is_empty)
    }

    /// Look up `key` in `locale`, then in English, then return the key itself.
    pub fn translate(&self, key: &str, locale: Locale) -> String {
        self.lookup(key, locale)
            .or_else(|| self.lookup(key, Locale::En))
            .unwrap_or(key)
            .to_string()
    }

    fn lookup(&self, key: &str, locale: Locale) -> Option<&str> {
        self.messages
            .get(&locale)
            .and_then(|m| m.get(key))
            .map(String::as_str)
    }
}

/// Replace the process-wide catalogue with the files in `dir`.
pub fn init_from_dir(dir: &Path) -> Result<(), CoreError> {
    let catalog = Catalog::load_dir(dir)?;
    let mut guard = CATALOG
        .write()
        .map_err(|_| CoreError::Internal("translation catalogue lock poisoned".into()))?;
    *guard = catalog;
    Ok(())
}

/// Translate with the process-wide catalogue, reloading the built-in one if
/// the current catalogue is empty.
pub fn translate(key: &str, locale: Locale) -> String {
    let needs_reload = CATALOG.read().map_or(true, |c| c.is_empty());
    if needs_reload {
        if let Ok(mut guard) = CATALOG.write() {
            if guard.is_empty() {
                tracing::debug!("Translation catalogue empty, loading built-in messages");
                *guard = Catalog::embedded();
            }
        }
    }
    match CATALOG.read() {
        Ok(catalog) => catalog.translate(key, locale),
        Err(_) => key.to_string(),
    }
}

fn parse(raw: &str) -> Result<HashMap<String, String>, CoreError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| CoreError::Internal(format!("Invalid translation file: {e}")))?;
    let mut out = HashMap::new();
    flatten("", &value, &mut out);
    Ok(out)
}

fn flatten(prefix: &str, value: &Value, out: &mut HashMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                flatten(&key, v, out);
            }
        }
        Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        _ => {}
    }
}
