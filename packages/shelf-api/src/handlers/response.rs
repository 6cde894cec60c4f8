//! Response types and helpers for HTTP endpoints.

use serde::Serialize;
use serde_json::Value;
use shelf_core::assets::Asset;

/// Body carrying only a human-readable outcome.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body returned after adding a book.
#[derive(Debug, Serialize)]
pub struct CreateBookResponse {
    pub message: String,
    /// Business key of the new record
    #[serde(rename = "srNo")]
    pub sr_no: Value,
}

/// Body returned when listing assets.
#[derive(Debug, Serialize)]
pub struct AssetListResponse {
    pub assets: Vec<Asset>,
}

/// Body returned by the health probe.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Consistent API error response wrapper
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Error code (HTTP status code as string)
    pub code: String,
    /// Error message
    pub message: String,
    /// Optional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Names of missing required fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

/// Consistent error response wrapper
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always false for error responses
    pub success: bool,
    /// Error information
    pub error: ApiError,
}

/// Helper to create a message body
pub fn message_response(message: impl Into<String>) -> MessageResponse {
    MessageResponse {
        message: message.into(),
    }
}

/// Helper to create error response
pub fn error_response(code: u16, message: String, details: Option<String>) -> ErrorResponse {
    ErrorResponse {
        success: false,
        error: ApiError {
            code: code.to_string(),
            message,
            details,
            fields: None,
        },
    }
}

/// Helper to create a missing-fields error response
pub fn missing_fields_response(code: u16, message: String, fields: Vec<String>) -> ErrorResponse {
    let mut response = error_response(code, message, None);
    response.error.fields = Some(fields);
    response
}
