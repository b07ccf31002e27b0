use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The API error response structure
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorPayload {
    /// Human readable error message
    pub message: String,
    /// The HTTP status code
    pub code: u16,
    /// Error kind, e.g. `SELF_REFERENCE` or `DUPLICATE_EDGE`
    pub r#type: String,
    /// Additional error details (optional)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub details: Option<serde_json::Value>,
}
