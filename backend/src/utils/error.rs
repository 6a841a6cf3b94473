use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// API Error with rich context and automatic error trait implementations
///
/// Messages are final by the time the error is built: sites that need a
/// localized message translate through the request's `RequestI18n` before
/// constructing the error. Nothing here reads a global locale.
#[derive(Error, Debug)]
pub enum ApiError {
    // Resource errors 3xxx
    #[error("No localization available for {0}")]
    LocaleNotAvailable(String),

    // Validation errors 4xxx
    #[error("{0}")]
    ValidationError(String),

    // System errors 5xxx
    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Failed to render view '{template}': {message}")]
    ViewRender { template: String, message: String },

    // Generic wrapper for other errors - auto-convert from anyhow::Error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// Helper to create unsupported locale error
    pub fn locale_not_available(code: impl Into<String>) -> Self {
        Self::LocaleNotAvailable(code.into())
    }

    /// Helper to create validation error
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// Helper to create internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }

    /// Helper to create view rendering error
    pub fn view_render(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ViewRender { template: template.into(), message: message.into() }
    }

    pub fn error_code(&self) -> i32 {
        match self {
            // Resource errors 3xxx
            Self::LocaleNotAvailable(_) => 3001,

            // Validation errors 4xxx
            Self::ValidationError(_) => 4001,

            // System errors 5xxx
            Self::InternalError(_) => 5001,
            Self::Other(_) => 5001,
            Self::ViewRender { .. } => 5003,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.error_code() {
            3000..=3999 => StatusCode::NOT_FOUND,
            4001..=4999 => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let response = ApiErrorResponse { code: self.error_code(), message: self.to_string(), details: None };

        (status, Json(response)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
