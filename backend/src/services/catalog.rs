//! Translation catalog
//!
//! Read-only translation store shared by every request. Translations are
//! loaded once at registration from `<directory>/<locale>.json` and kept in
//! a `rust_i18n::SimpleBackend`. The catalog never holds a "current"
//! locale; callers always pass the locale they want.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use rust_i18n::{Backend, SimpleBackend};
use serde_json::Value;

use crate::utils::i18n::{I18nError, LocaleSet};

pub struct Catalog {
    backend: SimpleBackend,
    /// Known keys per locale, in sorted order
    keys: HashMap<String, Vec<String>>,
    directory: PathBuf,
}

impl Catalog {
    /// Load translations for every configured locale.
    ///
    /// A missing file yields an empty table for that locale; a file that
    /// cannot be read or parsed aborts registration.
    pub fn load(directory: impl AsRef<Path>, locales: &LocaleSet) -> Result<Self, I18nError> {
        let directory = directory.as_ref().to_path_buf();
        let mut tables = Vec::with_capacity(locales.len());

        for locale in locales.iter() {
            let path = directory.join(format!("{}.json", locale));
            if !path.exists() {
                tracing::warn!("No translation file for locale '{}' at {}", locale, path.display());
                tables.push((locale.to_string(), BTreeMap::new()));
                continue;
            }

            let content = fs::read_to_string(&path)
                .map_err(|source| I18nError::ReadCatalog { path: path.clone(), source })?;
            let value: Value = serde_json::from_str(&content)
                .map_err(|source| I18nError::ParseCatalog { path: path.clone(), source })?;

            let mut table = BTreeMap::new();
            flatten_into(&path, None, &value, &mut table)?;
            tracing::debug!("Loaded {} translations for '{}' from {}", table.len(), locale, path.display());
            tables.push((locale.to_string(), table));
        }

        Ok(Self::from_tables(directory, tables))
    }

    /// Build a catalog from in-memory tables
    pub fn from_tables(
        directory: PathBuf,
        tables: impl IntoIterator<Item = (String, BTreeMap<String, String>)>,
    ) -> Self {
        let mut backend = SimpleBackend::new();
        let mut keys = HashMap::new();

        for (locale, table) in tables {
            let data: HashMap<&str, &str> =
                table.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
            backend.add_translations(&locale, &data);
            keys.insert(locale, table.into_keys().collect());
        }

        Self { backend, keys, directory }
    }

    /// Look up `key` for `locale`. `None` when either is unknown.
    pub fn translate(&self, locale: &str, key: &str) -> Option<String> {
        self.backend.translate(locale, key).map(|s| s.to_string())
    }

    /// All translations of `locale`, keyed by their flattened key
    pub fn entries(&self, locale: &str) -> BTreeMap<String, String> {
        let Some(keys) = self.keys.get(locale) else {
            return BTreeMap::new();
        };

        keys.iter()
            .filter_map(|key| self.translate(locale, key).map(|value| (key.clone(), value)))
            .collect()
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("directory", &self.directory)
            .field("locales", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Flatten nested objects into dot-separated keys
fn flatten_into(
    path: &Path,
    prefix: Option<&str>,
    value: &Value,
    out: &mut BTreeMap<String, String>,
) -> Result<(), I18nError> {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let full_key = match prefix {
                    Some(prefix) => format!("{}.{}", prefix, key),
                    None => key.clone(),
                };
                flatten_into(path, Some(&full_key), child, out)?;
            }
            Ok(())
        },
        Value::String(text) => {
            let key = prefix.unwrap_or_default().to_string();
            out.insert(key, text.clone());
            Ok(())
        },
        _ => Err(I18nError::InvalidCatalogEntry {
            path: path.to_path_buf(),
            key: prefix.unwrap_or("<root>").to_string(),
        }),
    }
}
