//! Request-scoped translator
//!
//! Every request gets its own [`RequestI18n`], created by the locale
//! middleware and stored in the request extensions. Clones of the handle
//! share that one request's locale so that a locale changed by a handler is
//! seen by the view merger, but two requests never share a handle.

use std::sync::{Arc, RwLock};

use axum::{extract::FromRequestParts, http::request::Parts};
use serde_json::{Map, Value};

use crate::services::catalog::Catalog;
use crate::utils::ApiError;

/// Context key holding the resolved locale in view data
pub const LOCALE_KEY: &str = "locale";
/// Context key holding the translation table in view data
pub const TRANSLATIONS_KEY: &str = "t";

#[derive(Clone)]
pub struct RequestI18n {
    locale: Arc<RwLock<String>>,
    catalog: Arc<Catalog>,
}

impl RequestI18n {
    pub fn new(catalog: Arc<Catalog>, locale: impl Into<String>) -> Self {
        Self { locale: Arc::new(RwLock::new(locale.into())), catalog }
    }

    pub fn set_locale(&self, locale: impl Into<String>) {
        let locale = locale.into();
        let mut current = self.locale.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = locale;
    }

    pub fn locale(&self) -> String {
        self.locale.read().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }

    /// Translate `key` into the current locale.
    ///
    /// Falls back to the key itself when no translation exists.
    pub fn translate(&self, key: &str) -> String {
        let locale = self.locale();
        match self.catalog.translate(&locale, key) {
            Some(text) => text,
            None => {
                tracing::debug!("Missing translation for '{}' in locale '{}'", key, locale);
                key.to_string()
            },
        }
    }

    /// Translate `key` and substitute `{{name}}` placeholders
    pub fn translate_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        args.iter().fold(self.translate(key), |text, (name, value)| {
            text.replace(&format!("{{{{{}}}}}", name), value)
        })
    }

    /// Translation data merged into view rendering contexts
    pub fn view_data(&self) -> Map<String, Value> {
        let locale = self.locale();
        let translations: Map<String, Value> = self
            .catalog
            .entries(&locale)
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();

        let mut data = Map::new();
        data.insert(LOCALE_KEY.to_string(), Value::String(locale));
        data.insert(TRANSLATIONS_KEY.to_string(), Value::Object(translations));
        data
    }
}

impl std::fmt::Debug for RequestI18n {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestI18n").field("locale", &self.locale()).finish()
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequestI18n
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<RequestI18n>().cloned().ok_or_else(|| {
            tracing::error!("RequestI18n missing for {}; is the locale middleware installed?", parts.uri);
            ApiError::internal_error("Localization is not available for this request")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn catalog() -> Arc<Catalog> {
        let mut de = BTreeMap::new();
        de.insert("proverb".to_string(), "Ende gut, alles gut.".to_string());
        de.insert("greeting".to_string(), "Hallo {{name}}!".to_string());
        let mut fr = BTreeMap::new();
        fr.insert("proverb".to_string(), "Tout est bien qui finit bien.".to_string());

        Arc::new(Catalog::from_tables(
            PathBuf::from("mem"),
            vec![("de".to_string(), de), ("fr".to_string(), fr)],
        ))
    }

    #[test]
    fn test_set_get_locale() {
        let i18n = RequestI18n::new(catalog(), "de");
        assert_eq!(i18n.locale(), "de");

        i18n.set_locale("fr");
        assert_eq!(i18n.locale(), "fr");
    }

    #[test]
    fn test_translate_follows_locale() {
        let i18n = RequestI18n::new(catalog(), "de");
        assert_eq!(i18n.translate("proverb"), "Ende gut, alles gut.");

        i18n.set_locale("fr");
        assert_eq!(i18n.translate("proverb"), "Tout est bien qui finit bien.");
    }

    #[test]
    fn test_translate_missing_returns_key() {
        let i18n = RequestI18n::new(catalog(), "fr");
        assert_eq!(i18n.translate("greeting"), "greeting");

        // Unknown locale, e.g. an unvalidated header value
        i18n.set_locale("xx");
        assert_eq!(i18n.translate("proverb"), "proverb");
    }

    #[test]
    fn test_translate_with_arguments() {
        let i18n = RequestI18n::new(catalog(), "de");
        assert_eq!(i18n.translate_with("greeting", &[("name", "Ada")]), "Hallo Ada!");
    }

    #[test]
    fn test_clones_share_request_state_but_instances_do_not() {
        let shared = catalog();
        let first = RequestI18n::new(Arc::clone(&shared), "de");
        let handle = first.clone();
        let second = RequestI18n::new(shared, "de");

        handle.set_locale("fr");

        assert_eq!(first.locale(), "fr");
        assert_eq!(second.locale(), "de");
    }

    #[test]
    fn test_view_data() {
        let i18n = RequestI18n::new(catalog(), "fr");
        let data = i18n.view_data();

        assert_eq!(data[LOCALE_KEY], "fr");
        assert_eq!(data[TRANSLATIONS_KEY]["proverb"], "Tout est bien qui finit bien.");
        assert_eq!(data[TRANSLATIONS_KEY].as_object().map(|t| t.len()), Some(1));
    }
}
