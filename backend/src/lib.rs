//! Per-request locale resolution and translation for axum services.
//!
//! [`LocalizationPlugin`] resolves one locale per request from the route's
//! `languageCode` path parameter, a query parameter or a header, attaches a
//! request-scoped [`RequestI18n`] for handlers and error paths, and merges
//! translations into view responses.

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{get, post},
};
use utoipa::OpenApi;

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod plugin;
pub mod services;
pub mod utils;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use models::View;
pub use plugin::LocalizationPlugin;
pub use utils::{ApiError, ApiResult, RequestI18n, extract_default_locale};

pub struct AppState {
    pub plugin: LocalizationPlugin,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::localized::default_locale_resource,
        handlers::localized::localized_resource,
        handlers::localized::localized_view,
        handlers::localized::localized_validation,
        handlers::localized::localized_with_headers,
        handlers::localized::localized_with_query,
    ),
    components(schemas(models::LocalizedMessage, models::ValidationPayload)),
    tags((name = "Localization", description = "Locale-aware sample routes"))
)]
pub struct ApiDoc;

/// Build the application router with localization installed on every
/// localized route.
pub fn build_router(plugin: LocalizationPlugin) -> Router {
    let state = Arc::new(AppState { plugin: plugin.clone() });

    let localized = Router::new()
        .route("/no/language-code/path/parameter", get(handlers::default_locale_resource))
        .route("/:languageCode/localized/resource", get(handlers::localized_resource))
        .route("/:languageCode/localized/view", get(handlers::localized_view))
        .route("/:languageCode/localized/validation", post(handlers::localized_validation))
        .route("/localized/with/headers", get(handlers::localized_with_headers))
        .route("/localized/with/query", get(handlers::localized_with_query));

    plugin
        .register(localized)
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
