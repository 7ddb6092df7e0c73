//! Response construction for relayed payloads.
//!
//! # Responsibilities
//! - Render JSON bodies with an explicit status
//! - Attach the cache hint of the upstream call that produced the body
//!
//! # Design Decisions
//! - Payloads are kept as `serde_json::Value`; no schema is imposed

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::upstream::CacheHint;

/// A JSON payload with status and cache hint.
#[derive(Debug, Clone)]
pub struct JsonPayload {
    pub status: StatusCode,
    pub body: Value,
    pub cache: CacheHint,
}

impl JsonPayload {
    /// 200 with a cache hint.
    pub fn ok(body: Value, cache: CacheHint) -> Self {
        Self {
            status: StatusCode::OK,
            body,
            cache,
        }
    }

    /// Arbitrary status, no cache hint.
    pub fn with_status(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body,
            cache: CacheHint::NONE,
        }
    }
}

impl IntoResponse for JsonPayload {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();
        if let Some((name, value)) = self.cache.header_value() {
            response.headers_mut().insert(name, value);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::CACHE_CONTROL;
    use serde_json::json;

    #[test]
    fn test_ok_carries_cache_header() {
        let response = JsonPayload::ok(json!({"a": 1}), CacheHint::CLAN).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CACHE_CONTROL).unwrap(),
            "public, s-maxage=60"
        );
    }

    #[test]
    fn test_passthrough_has_no_cache_header() {
        let response =
            JsonPayload::with_status(StatusCode::TOO_MANY_REQUESTS, json!({"reason": "throttled"}))
                .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().get(CACHE_CONTROL).is_none());
    }
}
