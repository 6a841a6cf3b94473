// Common test utilities and helpers

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

use crate::build_router;
use crate::config::I18nConfig;
use crate::plugin::LocalizationPlugin;
use crate::services::{TemplateDirRenderer, ViewRenderer};

pub const TRANSLATION_DE: &str = "Ende gut, alles gut.";
pub const TRANSLATION_EN: &str = "All's well that ends well.";
pub const TRANSLATION_FR: &str = "Tout est bien qui finit bien.";

/// Locales `[de, en, fr]`, query parameter `lang`, header `language`
pub fn test_i18n_config() -> I18nConfig {
    I18nConfig {
        locales: Some(vec!["de".to_string(), "en".to_string(), "fr".to_string()]),
        default_locale: None,
        directory: Path::new(env!("CARGO_MANIFEST_DIR")).join("locales"),
        query_parameter: Some("lang".to_string()),
        language_header_field: Some("language".to_string()),
    }
}

pub fn test_renderer() -> Arc<dyn ViewRenderer> {
    Arc::new(TemplateDirRenderer::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("views")))
}

pub fn create_test_plugin() -> LocalizationPlugin {
    LocalizationPlugin::new(&test_i18n_config(), test_renderer())
        .expect("Failed to register localization")
}

/// The sample application with the test configuration
pub fn create_test_app() -> Router {
    build_router(create_test_plugin())
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("Request failed")
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    get_with_headers(app, uri, &[]).await
}

pub async fn get_with_headers(app: &Router, uri: &str, headers: &[(&str, &str)]) -> Response<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let text = body_text(response).await;
    serde_json::from_str(&text).expect("Body is not JSON")
}
