//! Relay error taxonomy and its HTTP mapping.
//!
//! Every handler resolves failures into a [`RelayError`] at its boundary;
//! the error carries its own status code and renders as
//! `{"error": <message>, "status": <code>}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::tag::TagError;

/// Handler-level error with HTTP response mapping.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The caller supplied no identifier (400).
    #[error("{0}")]
    MissingInput(String),

    /// Upstream credential is not configured (500).
    #[error("{0}")]
    Configuration(String),

    /// Upstream has no such entity (404).
    #[error("{0}")]
    NotFound(String),

    /// Upstream answered with another non-2xx status, passed through.
    #[error("API Error: {status_text}")]
    Upstream {
        status: StatusCode,
        status_text: String,
    },

    /// Transport failure, malformed body or anything unexpected (500).
    /// The message is what the caller sees; details are logged separately.
    #[error("{0}")]
    Internal(String),
}

impl RelayError {
    pub fn internal() -> Self {
        RelayError::Internal("Internal Server Error".into())
    }

    pub fn missing_credential() -> Self {
        RelayError::Configuration("Server configuration error: API Key missing".into())
    }

    /// Status code this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingInput(_) => StatusCode::BAD_REQUEST,
            RelayError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::NotFound(_) => StatusCode::NOT_FOUND,
            RelayError::Upstream { status, .. } => *status,
            RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TagError> for RelayError {
    fn from(err: TagError) -> Self {
        RelayError::MissingInput(err.to_string())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = axum::Json(json!({
            "error": self.to_string(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

/// Result type alias for handlers.
pub type RelayResult<T> = Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            RelayError::MissingInput("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RelayError::missing_credential().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RelayError::NotFound("Clan not found".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(RelayError::internal().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_upstream_status_passes_through() {
        let err = RelayError::Upstream {
            status: StatusCode::SERVICE_UNAVAILABLE,
            status_text: "Service Unavailable".into(),
        };
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.to_string(), "API Error: Service Unavailable");
    }

    #[test]
    fn test_tag_error_is_missing_input() {
        let err: RelayError = TagError::Empty.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Tag is required");
    }

    #[test]
    fn test_into_response_uses_error_status() {
        let response = RelayError::NotFound("Player not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
