//! Request handlers.
//!
//! # Data Flow
//! ```text
//! GET /clan/{tag}      → clan.rs    (one upstream call, status translation)
//! GET /player/{tag}    → player.rs  (three concurrent calls, merged)
//! GET /proxy/{*path}   → proxy.rs   (verbatim passthrough)
//! GET /health          → health.rs
//! ```
//!
//! # Design Decisions
//! - Credentials are checked before any upstream call is issued
//! - Failures are resolved here; nothing is retried

pub mod clan;
pub mod health;
pub mod player;
pub mod proxy;

use serde_json::Value;

use crate::error::{RelayError, RelayResult};
use crate::tag::TagError;
use crate::upstream::{UpstreamError, UpstreamResponse};

/// Handler for tag routes hit without a tag, e.g. `/clan/`.
pub async fn missing_tag() -> RelayError {
    TagError::Empty.into()
}

/// Translate a failed upstream call for a resource that must succeed.
pub(crate) fn upstream_failure(resource: &'static str, err: UpstreamError) -> RelayError {
    match err {
        UpstreamError::MissingCredential(kind) => {
            tracing::error!(resource, upstream = ?kind, "Upstream credential missing");
            RelayError::missing_credential()
        }
        UpstreamError::Transport(e) => {
            tracing::error!(resource, error = %e, "Failed to fetch upstream data");
            RelayError::internal()
        }
    }
}

/// Require a 2xx JSON answer; 404 becomes `not_found`, other statuses pass through.
pub(crate) fn expect_success(
    resource: &'static str,
    response: UpstreamResponse,
    not_found: &str,
) -> RelayResult<Value> {
    if !response.is_success() {
        if response.status == axum::http::StatusCode::NOT_FOUND {
            return Err(RelayError::NotFound(not_found.to_string()));
        }
        tracing::warn!(resource, status = response.status.as_u16(), "Upstream returned error status");
        return Err(RelayError::Upstream {
            status: response.status,
            status_text: response.status_text().to_string(),
        });
    }

    response.json().map_err(|e| {
        tracing::error!(resource, error = %e, "Malformed upstream body");
        RelayError::internal()
    })
}
