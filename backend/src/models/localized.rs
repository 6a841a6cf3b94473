use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedMessage {
    /// Locale the request was resolved to
    pub locale: String,
    /// Locale the client asked for, if it asked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_locale: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ValidationPayload {
    #[validate(length(min = 1))]
    pub param: String,
}
