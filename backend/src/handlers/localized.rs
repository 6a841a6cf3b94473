use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};

use crate::AppState;
use crate::models::{LocalizedMessage, ValidationPayload, View};
use crate::utils::{RequestI18n, ValidatedJson};

/// Translation key of the sample message
pub const MESSAGE_KEY: &str = "proverb";

// Message in the default locale
#[utoipa::path(
    get,
    path = "/no/language-code/path/parameter",
    responses(
        (status = 200, description = "Message in the resolved locale", body = LocalizedMessage)
    ),
    tag = "Localization"
)]
pub async fn default_locale_resource(i18n: RequestI18n) -> Json<LocalizedMessage> {
    Json(LocalizedMessage {
        locale: i18n.locale(),
        requested_locale: None,
        message: i18n.translate(MESSAGE_KEY),
    })
}

// Message in the locale named by the path
#[utoipa::path(
    get,
    path = "/{languageCode}/localized/resource",
    params(
        ("languageCode" = String, Path, description = "Requested locale")
    ),
    responses(
        (status = 200, description = "Message in the requested locale", body = LocalizedMessage),
        (status = 404, description = "Locale not available")
    ),
    tag = "Localization"
)]
pub async fn localized_resource(
    i18n: RequestI18n,
    Path(language_code): Path<String>,
) -> Json<LocalizedMessage> {
    tracing::debug!("Localized resource requested in '{}'", language_code);

    Json(LocalizedMessage {
        locale: i18n.locale(),
        requested_locale: Some(language_code),
        message: i18n.translate(MESSAGE_KEY),
    })
}

// Rendered page in the locale named by the path
#[utoipa::path(
    get,
    path = "/{languageCode}/localized/view",
    params(
        ("languageCode" = String, Path, description = "Requested locale")
    ),
    responses(
        (status = 200, description = "Rendered HTML page", body = String, content_type = "text/html"),
        (status = 404, description = "Locale not available")
    ),
    tag = "Localization"
)]
pub async fn localized_view(Path(language_code): Path<String>) -> View {
    View::new("test").with("requestedLocale", language_code)
}

// Payload validation with a localized failure message
#[utoipa::path(
    post,
    path = "/{languageCode}/localized/validation",
    params(
        ("languageCode" = String, Path, description = "Requested locale")
    ),
    request_body = ValidationPayload,
    responses(
        (status = 204, description = "Payload accepted"),
        (status = 400, description = "Validation failed, message in the requested locale"),
        (status = 404, description = "Locale not available")
    ),
    tag = "Localization"
)]
pub async fn localized_validation(
    ValidatedJson(payload): ValidatedJson<ValidationPayload>,
) -> StatusCode {
    tracing::debug!("Accepted payload: param={}", payload.param);
    StatusCode::NO_CONTENT
}

// Message in the locale named by the configured header
#[utoipa::path(
    get,
    path = "/localized/with/headers",
    responses(
        (status = 200, description = "Message in the header's locale", body = LocalizedMessage)
    ),
    tag = "Localization"
)]
pub async fn localized_with_headers(
    State(state): State<Arc<AppState>>,
    i18n: RequestI18n,
    headers: HeaderMap,
) -> Json<LocalizedMessage> {
    let requested_locale = state
        .plugin
        .language_header_field()
        .and_then(|name| headers.get(name))
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    Json(LocalizedMessage {
        locale: i18n.locale(),
        requested_locale,
        message: i18n.translate(MESSAGE_KEY),
    })
}

// Message in the locale named by the configured query parameter
#[utoipa::path(
    get,
    path = "/localized/with/query",
    responses(
        (status = 200, description = "Message in the query's locale", body = LocalizedMessage),
        (status = 404, description = "Locale not available")
    ),
    tag = "Localization"
)]
pub async fn localized_with_query(
    State(state): State<Arc<AppState>>,
    i18n: RequestI18n,
    Query(query): Query<Vec<(String, String)>>,
) -> Json<LocalizedMessage> {
    let requested_locale = state.plugin.query_parameter().and_then(|name| {
        query
            .into_iter()
            .find(|(key, value)| key == name && !value.is_empty())
            .map(|(_, value)| value)
    });

    Json(LocalizedMessage {
        locale: i18n.locale(),
        requested_locale,
        message: i18n.translate(MESSAGE_KEY),
    })
}
