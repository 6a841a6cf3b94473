//! Internationalization utilities for the backend
//!
//! This module holds the registration-time pieces of localization: the
//! allow-list of supported locales and the default-locale extraction that
//! feeds it. Nothing here is per-request; the request-scoped translator
//! lives in [`super::translator`].

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Name of the route path parameter inspected by the locale middleware
pub const LANGUAGE_CODE_PARAM: &str = "languageCode";

/// Errors raised while registering localization.
///
/// All of these are fatal: the service must not start serving traffic
/// without a usable locale configuration.
#[derive(Error, Debug)]
pub enum I18nError {
    #[error("No locales defined!")]
    NoLocalesDefined,

    #[error("Locales array is empty!")]
    EmptyLocales,

    #[error("Failed to read translation file {}: {source}", .path.display())]
    ReadCatalog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse translation file {}: {source}", .path.display())]
    ParseCatalog {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Translation '{key}' in {} must be a string or an object", .path.display())]
    InvalidCatalogEntry { path: PathBuf, key: String },

    #[error("Invalid language header field: {0}")]
    InvalidHeaderName(String),
}

/// Return the first configured locale.
///
/// Used as the fallback default when no explicit default locale is set.
pub fn extract_default_locale(locales: Option<&[String]>) -> Result<&str, I18nError> {
    let locales = locales.ok_or(I18nError::NoLocalesDefined)?;
    locales.first().map(String::as_str).ok_or(I18nError::EmptyLocales)
}

/// Ordered, non-empty allow-list of locale codes.
///
/// Built once at registration and shared read-only between requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSet {
    codes: Arc<[String]>,
}

impl LocaleSet {
    pub fn new(locales: Option<&[String]>) -> Result<Self, I18nError> {
        extract_default_locale(locales)?;
        let codes = locales.unwrap_or_default();
        Ok(Self { codes: codes.into() })
    }

    /// Whether `code` is one of the configured locales (exact match)
    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    /// The implicit default locale
    pub fn first(&self) -> &str {
        // Non-emptiness is checked in `new`.
        &self.codes[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Resolve the default locale: the configured default if present,
/// otherwise the first locale of the set.
pub fn resolve_default_locale(default_locale: Option<&str>, locales: &LocaleSet) -> String {
    match default_locale {
        Some(code) if !code.trim().is_empty() => code.to_string(),
        _ => locales.first().to_string(),
    }
}
