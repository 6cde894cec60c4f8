//! CORS headers for browser clients.

use hyper::body::Bytes;
use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE,
};
use hyper::Response;

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type";
const PREFLIGHT_MAX_AGE_SECONDS: u64 = 3600;

/// Precomputed CORS header values.
#[derive(Debug, Clone)]
pub struct Cors {
    origin: HeaderValue,
}

impl Cors {
    /// Builds the policy for `origin`. An origin that is not a valid header
    /// value falls back to `*`.
    pub fn new(origin: &str) -> Self {
        let origin = HeaderValue::from_str(origin).unwrap_or_else(|_| {
            tracing::error!(
                origin = %origin,
                "Invalid CORS origin; expected a valid HeaderValue"
            );
            HeaderValue::from_static("*")
        });
        Self { origin }
    }

    /// Adds the CORS headers to `response`.
    pub fn apply(&self, response: &mut Response<Bytes>) {
        let headers = response.headers_mut();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.origin.clone());
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
    }

    /// Answer to an `OPTIONS` preflight request.
    pub fn preflight(&self) -> Response<Bytes> {
        let mut response = Response::new(Bytes::new());
        *response.status_mut() = hyper::StatusCode::NO_CONTENT;
        self.apply(&mut response);
        response
            .headers_mut()
            .insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from(PREFLIGHT_MAX_AGE_SECONDS));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_sets_origin() {
        let cors = Cors::new("http://localhost:3000");
        let mut response = Response::new(Bytes::new());
        cors.apply(&mut response);

        assert_eq!(
            response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
    }

    #[test]
    fn test_preflight_is_no_content() {
        let response = Cors::new("*").preflight();
        assert_eq!(response.status(), 204);
        assert!(response.body().is_empty());
        assert_eq!(response.headers()[ACCESS_CONTROL_MAX_AGE], "3600");
        assert!(response.headers()[ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap()
            .contains("DELETE"));
    }

    #[test]
    fn test_invalid_origin_falls_back_to_any() {
        let cors = Cors::new("bad\norigin");
        let mut response = Response::new(Bytes::new());
        cors.apply(&mut response);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
