//! Locale resolution middleware
//!
//! Picks exactly one locale per request and attaches a fresh
//! [`RequestI18n`] to the request extensions before the handler runs.
//!
//! Signals are checked in a fixed order and the first one present wins:
//! 1. the `languageCode` path parameter (validated)
//! 2. the configured query parameter (validated)
//! 3. the configured header (accepted as given, not validated)
//! 4. otherwise the default locale stays in place
//!
//! A path or query locale outside the allow-list ends the request with a
//! 404 and the handler never runs. A repeated query key is rejected when
//! any of its values is outside the allow-list.

use std::fmt;

use axum::{
    extract::{Query, RawPathParams, Request, State},
    middleware::Next,
    response::Response,
};

use crate::plugin::LocalizationPlugin;
use crate::utils::i18n::{LANGUAGE_CODE_PARAM, LocaleSet};
use crate::utils::{ApiError, RequestI18n};

/// Where the resolved locale came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleSource {
    PathParameter,
    QueryParameter,
    Header,
    Default,
}

impl fmt::Display for LocaleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PathParameter => "path parameter",
            Self::QueryParameter => "query parameter",
            Self::Header => "header",
            Self::Default => "default",
        };
        f.write_str(name)
    }
}

/// Locale signals found on one request
///
/// `query` holds every value of the configured query key, in order.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocaleSignals<'a> {
    pub path: Option<&'a str>,
    pub query: &'a [&'a str],
    pub header: Option<&'a str>,
}

/// Pick the locale for one request.
///
/// Returns `Ok(None)` when no signal is present and the default applies.
pub fn resolve_locale(
    locales: &LocaleSet,
    signals: LocaleSignals<'_>,
) -> Result<Option<(String, LocaleSource)>, ApiError> {
    if let Some(code) = signals.path.filter(|code| !code.is_empty()) {
        if !locales.contains(code) {
            return Err(ApiError::locale_not_available(code));
        }
        return Ok(Some((code.to_string(), LocaleSource::PathParameter)));
    }

    let mut query_codes = signals.query.iter().copied().filter(|code| !code.is_empty());
    if let Some(code) = query_codes.clone().find(|code| !locales.contains(code)) {
        return Err(ApiError::locale_not_available(code));
    }
    if let Some(code) = query_codes.next() {
        return Ok(Some((code.to_string(), LocaleSource::QueryParameter)));
    }

    // Header values are not checked against the allow-list.
    Ok(signals
        .header
        .filter(|code| !code.is_empty())
        .map(|code| (code.to_string(), LocaleSource::Header)))
}

/// Middleware resolving the request locale.
///
/// The translator is attached before any check so that error paths can
/// still translate, even for requests that get rejected here.
pub async fn locale_middleware(
    State(plugin): State<LocalizationPlugin>,
    path_params: Option<RawPathParams>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let i18n = plugin.new_request_i18n();
    req.extensions_mut().insert(i18n.clone());

    let path_code = path_params.as_ref().and_then(|params| {
        params.iter().find(|(key, _)| *key == LANGUAGE_CODE_PARAM).map(|(_, value)| value)
    });

    let query = match plugin.query_parameter() {
        Some(_) => Query::<Vec<(String, String)>>::try_from_uri(req.uri())
            .map(|Query(pairs)| pairs)
            .unwrap_or_default(),
        None => Vec::new(),
    };
    let query_codes: Vec<&str> = match plugin.query_parameter() {
        Some(name) => query
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect(),
        None => Vec::new(),
    };

    let header_code = plugin
        .language_header_field()
        .and_then(|name| req.headers().get(name))
        .and_then(|value| value.to_str().ok())
        .map(str::trim);

    let signals = LocaleSignals { path: path_code, query: &query_codes, header: header_code };

    match resolve_locale(plugin.locales(), signals) {
        Ok(Some((locale, source))) => {
            tracing::debug!("Resolved locale '{}' from {} for {}", locale, source, req.uri());
            i18n.set_locale(locale);
        },
        Ok(None) => {
            tracing::debug!(
                "Resolved locale '{}' from {} for {}",
                plugin.default_locale(),
                LocaleSource::Default,
                req.uri()
            );
        },
        Err(err) => {
            tracing::warn!("Rejected {} {}: {}", req.method(), req.uri(), err);
            return Err(err);
        },
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locales() -> LocaleSet {
        let codes = vec!["de".to_string(), "en".to_string(), "fr".to_string()];
        LocaleSet::new(Some(codes.as_slice())).unwrap()
    }

    fn resolve(signals: LocaleSignals<'_>) -> Result<Option<(String, LocaleSource)>, ApiError> {
        resolve_locale(&locales(), signals)
    }

    #[test]
    fn test_no_signal_uses_default() {
        assert!(resolve(LocaleSignals::default()).unwrap().is_none());
    }

    #[test]
    fn test_path_parameter() {
        let resolved = resolve(LocaleSignals { path: Some("fr"), ..Default::default() }).unwrap();
        assert_eq!(resolved, Some(("fr".to_string(), LocaleSource::PathParameter)));
    }

    #[test]
    fn test_invalid_path_parameter_is_rejected() {
        let err = resolve(LocaleSignals { path: Some("en-US"), ..Default::default() }).unwrap_err();
        assert!(matches!(err, ApiError::LocaleNotAvailable(ref code) if code == "en-US"));
        assert_eq!(err.to_string(), "No localization available for en-US");
    }

    #[test]
    fn test_invalid_query_parameter_is_rejected() {
        let err = resolve(LocaleSignals { query: &["xx"], ..Default::default() }).unwrap_err();
        assert_eq!(err.to_string(), "No localization available for xx");
    }

    #[test]
    fn test_header_is_not_validated() {
        let resolved = resolve(LocaleSignals { header: Some("xx"), ..Default::default() }).unwrap();
        assert_eq!(resolved, Some(("xx".to_string(), LocaleSource::Header)));
    }

    #[test]
    fn test_empty_values_count_as_absent() {
        let resolved = resolve(LocaleSignals {
            path: None,
            query: &[""],
            header: Some(""),
        })
        .unwrap();
        assert!(resolved.is_none());

        let resolved = resolve(LocaleSignals { query: &[""], header: Some("en"), ..Default::default() })
            .unwrap();
        assert_eq!(resolved, Some(("en".to_string(), LocaleSource::Header)));
    }

    #[test]
    fn test_priority_order() {
        let all = LocaleSignals { path: Some("fr"), query: &["en"], header: Some("de") };
        assert_eq!(resolve(all).unwrap(), Some(("fr".to_string(), LocaleSource::PathParameter)));

        let query_and_header = LocaleSignals { query: &["fr"], header: Some("en"), ..Default::default() };
        assert_eq!(
            resolve(query_and_header).unwrap(),
            Some(("fr".to_string(), LocaleSource::QueryParameter))
        );

        let header_only = LocaleSignals { header: Some("en"), ..Default::default() };
        assert_eq!(resolve(header_only).unwrap(), Some(("en".to_string(), LocaleSource::Header)));
    }

    #[test]
    fn test_higher_priority_invalid_signal_is_not_skipped() {
        // An invalid path locale rejects even when a valid query locale exists
        let signals = LocaleSignals { path: Some("xx"), query: &["fr"], header: Some("en") };
        assert!(resolve(signals).is_err());

        let signals = LocaleSignals { query: &["xx"], header: Some("en"), ..Default::default() };
        assert!(resolve(signals).is_err());
    }

    #[test]
    fn test_repeated_query_values_are_all_validated() {
        for query in [&["xx", "fr"][..], &["fr", "xx"][..], &["", "xx"][..]] {
            let err = resolve(LocaleSignals { query, ..Default::default() }).unwrap_err();
            assert_eq!(err.to_string(), "No localization available for xx");
        }

        let resolved = resolve(LocaleSignals { query: &["", "fr", "de"], ..Default::default() }).unwrap();
        assert_eq!(resolved, Some(("fr".to_string(), LocaleSource::QueryParameter)));
    }
}
