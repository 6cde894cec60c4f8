//! Request utilities for HTTP endpoints.

use std::collections::HashMap;

use http_body_util::BodyExt;
use hyper::body::{Body, Bytes};
use hyper::Response;
use percent_encoding::percent_decode_str;
use serde::Serialize;
use serde_json::Value;
use tokio::time;

use crate::router::RouterError;
use shelf_core::ShelfError;

/// Type alias for matchit parameters with explicit lifetimes
pub type MatchitParams<'a, 'b> = matchit::Params<'a, 'b>;

/// Helper function to read request body with timeout
pub async fn read_request_body_with_timeout<B>(body: B, timeout_ms: u64) -> Result<Bytes, RouterError>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let timeout_duration = time::Duration::from_millis(timeout_ms);
    let body = time::timeout(timeout_duration, body.collect())
        .await
        .map_err(|_| RouterError::Timeout)?
        .map_err(|e| RouterError::InternalError(format!("Failed to read request body: {}", e)))?;
    Ok(body.to_bytes())
}

/// Parses a JSON request body. An empty body reads as an empty object.
pub fn parse_json_body(body: &Bytes) -> Result<Value, RouterError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_slice(body)
        .map_err(|e| RouterError::BadRequest(format!("Failed to parse request: {}", e)))
}

/// Returns a percent-decoded path parameter.
pub fn path_param(params: &MatchitParams<'_, '_>, name: &str) -> Result<String, RouterError> {
    let raw = params
        .get(name)
        .ok_or_else(|| RouterError::BadRequest(format!("Missing path parameter '{}'", name)))?;
    Ok(percent_decode_str(raw).decode_utf8_lossy().into_owned())
}

/// Parse query parameters from URL query string.
///
/// `+` decodes to a space. Later duplicates replace earlier ones.
pub fn parse_query_params(query_str: Option<&str>) -> HashMap<String, String> {
    let mut params = HashMap::new();

    if let Some(query_str) = query_str {
        for pair in query_str.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            params.insert(decode_component(key), decode_component(value));
        }
    }

    params
}

fn decode_component(raw: &str) -> String {
    percent_decode_str(&raw.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}

/// Map ShelfError to appropriate RouterError
pub fn map_shelf_error_to_router_error(e: ShelfError) -> RouterError {
    match e {
        ShelfError::MissingFields { fields } => RouterError::MissingFields(fields),
        ShelfError::NotFound { .. } => RouterError::NotFound(e.to_string()),
        e if e.is_client_error() => RouterError::BadRequest(e.to_string()),
        e => RouterError::InternalError(e.to_string()),
    }
}

/// Runs store work on the blocking pool and maps its error.
pub async fn run_blocking<T, F>(work: F) -> Result<T, RouterError>
where
    F: FnOnce() -> Result<T, ShelfError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| RouterError::InternalError(format!("Store task failed: {}", e)))?
        .map_err(map_shelf_error_to_router_error)
}

/// Serializes `data` into a JSON response.
pub fn json_response<T: Serialize>(status: u16, data: &T) -> Result<Response<Bytes>, RouterError> {
    let json = serde_json::to_vec(data)
        .map_err(|e| RouterError::InternalError(format!("Failed to serialize response: {}", e)))?;
    build_response(status, json)
}

/// Helper to build HTTP response with proper error handling
pub fn build_response(status: u16, json: Vec<u8>) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Bytes::from(json))
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}
