//! View context middleware
//!
//! Runs after the handler. For view responses it merges the request's
//! translation data and `languageCode` into the template context; every
//! other response passes through untouched.

use axum::{extract::Request, middleware::Next, response::Response};

use crate::models::view::{View, is_view, merge_view_context};
use crate::utils::RequestI18n;

pub async fn view_context_middleware(req: Request, next: Next) -> Response {
    let i18n = req.extensions().get::<RequestI18n>().cloned();

    let mut response = next.run(req).await;

    let Some(i18n) = i18n else {
        return response;
    };
    if !is_view(&response) {
        return response;
    }

    if let Some(view) = response.extensions_mut().get_mut::<View>() {
        merge_view_context(view.context_mut(), &i18n);
        tracing::debug!("Merged locale '{}' into view '{}'", i18n.locale(), view.template());
    }

    response
}
