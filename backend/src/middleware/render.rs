//! View rendering middleware
//!
//! Turns a pending [`View`] into an HTML body once every other layer has
//! had its chance to extend the context.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::models::view::View;
use crate::plugin::LocalizationPlugin;
use crate::services::ViewRenderer;

pub async fn render_view_middleware(
    State(plugin): State<LocalizationPlugin>,
    req: Request,
    next: Next,
) -> Response {
    let response = next.run(req).await;
    render_view(plugin.renderer(), response)
}

/// Render the response's pending view, if any
pub fn render_view(renderer: &dyn ViewRenderer, mut response: Response) -> Response {
    let Some(view) = response.extensions_mut().remove::<View>() else {
        return response;
    };

    match renderer.render(view.template(), view.context()) {
        Ok(html) => {
            let (mut parts, _) = response.into_parts();
            parts.headers.remove(header::CONTENT_LENGTH);
            parts
                .headers
                .insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"));
            Response::from_parts(parts, Body::from(html))
        },
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{ApiError, ApiResult};
    use axum::http::StatusCode;
    use serde_json::{Map, Value};

    struct EchoRenderer;

    impl ViewRenderer for EchoRenderer {
        fn render(&self, template: &str, context: &Map<String, Value>) -> ApiResult<String> {
            if template == "broken" {
                return Err(ApiError::view_render(template, "boom"));
            }
            Ok(format!("{}:{}", template, Value::Object(context.clone())))
        }
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_renders_view_response() {
        let response = View::new("page").with("a", 1).into_response();
        let response = render_view(&EchoRenderer, response);

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html; charset=utf-8");
        assert!(response.extensions().get::<View>().is_none());
        assert_eq!(body_text(response).await, r#"page:{"a":1}"#);
    }

    #[tokio::test]
    async fn test_keeps_status_of_view_response() {
        let response = (StatusCode::CREATED, View::new("page")).into_response();
        let response = render_view(&EchoRenderer, response);
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_non_view_passes_through() {
        let response = render_view(&EchoRenderer, "plain".into_response());
        assert_eq!(body_text(response).await, "plain");
    }

    #[tokio::test]
    async fn test_render_failure_becomes_error_response() {
        let response = render_view(&EchoRenderer, View::new("broken").into_response());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
