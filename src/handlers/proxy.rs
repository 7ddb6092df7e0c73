//! Generic passthrough to the mirror upstream.
//!
//! The incoming path below `/proxy/` is split into segments, each segment is
//! decoded and re-encoded on its own, and the raw query is appended as-is.
//! A segment that does not decode is passed through untouched.
//! Upstream status and JSON body are returned without translation.

use axum::extract::State;
use axum::http::Uri;

use crate::config::UpstreamKind;
use crate::error::{RelayError, RelayResult};
use crate::http::response::JsonPayload;
use crate::http::server::AppState;
use crate::upstream::{CacheHint, UpstreamClient, UpstreamError};

const RESOURCE: &str = "proxy";

/// Route prefix stripped before forwarding.
pub const PROXY_PREFIX: &str = "/proxy/";

/// `GET /proxy/{*path}`
pub async fn proxy(State(state): State<AppState>, uri: Uri) -> RelayResult<JsonPayload> {
    let raw_path = uri.path().strip_prefix(PROXY_PREFIX).unwrap_or_default();
    let segments = decode_segments(raw_path);
    forward(&state.upstream, &segments, uri.query()).await
}

/// Forward `segments` and the raw `query` to the mirror upstream.
pub async fn forward(
    upstream: &UpstreamClient,
    segments: &[PathSegment],
    query: Option<&str>,
) -> RelayResult<JsonPayload> {
    if !upstream.has_credential(UpstreamKind::Mirror) {
        return Err(RelayError::Configuration(
            "API Key not configured on server".into(),
        ));
    }

    let path = encode_segments(segments);
    let response = upstream
        .get(UpstreamKind::Mirror, RESOURCE, &path, query, CacheHint::NONE)
        .await
        .map_err(|e| match e {
            UpstreamError::MissingCredential(_) => {
                RelayError::Configuration("API Key not configured on server".into())
            }
            UpstreamError::Transport(e) => {
                tracing::error!(path = %path, error = %e, "Proxy error");
                fetch_failed()
            }
        })?;

    let body = response.json().map_err(|e| {
        tracing::error!(path = %path, status = response.status.as_u16(), error = %e, "Proxy received non-JSON body");
        fetch_failed()
    })?;

    Ok(JsonPayload::with_status(response.status, body))
}

fn fetch_failed() -> RelayError {
    RelayError::Internal("Failed to fetch data from upstream API".into())
}

/// One path segment below the proxy prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Percent-decoded text, re-encoded before forwarding.
    Decoded(String),
    /// Text that did not decode as UTF-8, forwarded exactly as received.
    Raw(String),
}

impl PathSegment {
    pub fn decoded(segment: impl Into<String>) -> Self {
        PathSegment::Decoded(segment.into())
    }

    fn encode(&self) -> String {
        match self {
            PathSegment::Decoded(text) => urlencoding::encode(text).into_owned(),
            PathSegment::Raw(text) => text.clone(),
        }
    }
}

/// Split a raw request path into segments, dropping empty ones.
pub fn decode_segments(raw_path: &str) -> Vec<PathSegment> {
    raw_path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match urlencoding::decode(segment) {
            Ok(decoded) => PathSegment::Decoded(decoded.into_owned()),
            Err(_) => PathSegment::Raw(segment.to_string()),
        })
        .collect()
}

/// Encode each segment independently and join with `/`.
pub fn encode_segments(segments: &[PathSegment]) -> String {
    segments
        .iter()
        .map(PathSegment::encode)
        .collect::<Vec<_>>()
        .join("/")
}
