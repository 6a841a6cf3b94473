//! JSON body extractor with localized validation failures

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use super::translator::RequestI18n;
use super::ApiError;

/// Translation key used for rejected payloads
pub const VALIDATION_FAILED_KEY: &str = "validation.failed";

/// Like `Json<T>`, but runs `validator` rules and reports failures in the
/// request's locale.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // Grab the translator before the body extractor consumes the request
        let i18n = req.extensions().get::<RequestI18n>().cloned();

        let value = match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => value,
            Err(rejection) => {
                tracing::debug!("Payload rejected: {}", rejection.body_text());
                return Err(validation_failed(i18n.as_ref()));
            },
        };

        if let Err(errors) = value.validate() {
            tracing::debug!("Payload failed validation: {}", errors);
            return Err(validation_failed(i18n.as_ref()));
        }

        Ok(Self(value))
    }
}

fn validation_failed(i18n: Option<&RequestI18n>) -> ApiError {
    let message = match i18n {
        Some(i18n) => i18n.translate(VALIDATION_FAILED_KEY),
        None => "Validation failed".to_string(),
    };
    ApiError::validation_error(message)
}
