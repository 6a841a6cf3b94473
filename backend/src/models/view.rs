//! View responses
//!
//! A handler returning [`View`] produces a "view" response: the template
//! name and its rendering context travel in the response extensions until
//! the render middleware turns them into HTML. Until then other layers can
//! still inspect and extend the context.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};

use crate::utils::RequestI18n;

/// Context key holding the resolved locale for templates (e.g. `<html lang>`)
pub const LANGUAGE_CODE_KEY: &str = "languageCode";

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    template: String,
    context: Map<String, Value>,
}

impl View {
    pub fn new(template: impl Into<String>) -> Self {
        Self { template: template.into(), context: Map::new() }
    }

    /// Add a single context entry
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn context(&self) -> &Map<String, Value> {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.context
    }
}

impl IntoResponse for View {
    fn into_response(self) -> Response {
        let mut response = StatusCode::OK.into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// Whether the response still carries an unrendered view
pub fn is_view(response: &Response) -> bool {
    response.extensions().get::<View>().is_some()
}

/// Merge the request's translation data into a rendering context.
///
/// Keys unrelated to translation are left alone. The translation keys and
/// `languageCode` always take the request's values.
pub fn merge_view_context(context: &mut Map<String, Value>, i18n: &RequestI18n) {
    let data = i18n.view_data();
    let locale = i18n.locale();

    context.extend(data);
    context.insert(LANGUAGE_CODE_KEY.to_string(), Value::String(locale));
}
