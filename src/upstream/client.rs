//! Outbound HTTP client for the game-statistics API.
//!
//! # Responsibilities
//! - Build upstream URLs from a base, an encoded path and a raw query
//! - Attach bearer credential and JSON accept header
//! - Enforce connect and per-call timeouts
//! - Buffer the body so handlers can inspect status before parsing
//!
//! # Design Decisions
//! - One pooled `reqwest::Client` shared by all handlers
//! - No retries: a failed call is reported once and translated by the caller
//! - Timeout expiry surfaces as a transport error

use axum::body::Bytes;
use axum::http::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::Value;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::{Credential, Credentials, RelayConfig, UpstreamKind};
use crate::observability::metrics;
use crate::upstream::CacheHint;

/// Errors from a single upstream call.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// No bearer token configured for the upstream.
    #[error("no credential configured for {0:?} upstream")]
    MissingCredential(UpstreamKind),

    /// Connection, timeout or body read failure.
    #[error("upstream transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// A buffered upstream answer.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Canonical reason phrase of the status, e.g. "Service Unavailable".
    pub fn status_text(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("Unknown Status")
    }

    /// Decode the body as JSON.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

#[derive(Debug, Clone)]
struct Endpoint {
    base_url: String,
    credential: Option<Credential>,
}

/// Shared client for both upstream bases.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    official: Endpoint,
    mirror: Endpoint,
}

impl UpstreamClient {
    /// Build a client from a validated config and resolved credentials.
    pub fn new(config: &RelayConfig, credentials: Credentials) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .timeout(Duration::from_secs(config.timeouts.upstream_secs))
            .user_agent(concat!("royale-relay/", env!("CARGO_PKG_VERSION")));
        if !config.upstreams.use_env_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            official: Endpoint {
                base_url: config.upstreams.official.base_url.clone(),
                credential: credentials.official,
            },
            mirror: Endpoint {
                base_url: config.upstreams.mirror.base_url.clone(),
                credential: credentials.mirror,
            },
        })
    }

    fn endpoint(&self, kind: UpstreamKind) -> &Endpoint {
        match kind {
            UpstreamKind::Official => &self.official,
            UpstreamKind::Mirror => &self.mirror,
        }
    }

    /// Whether a bearer token is configured for `kind`.
    pub fn has_credential(&self, kind: UpstreamKind) -> bool {
        self.endpoint(kind).credential.is_some()
    }

    /// Issue one GET against `kind`.
    ///
    /// `path` must already be percent-encoded segment by segment; `query` is
    /// appended verbatim. `resource` labels logs and metrics.
    pub async fn get(
        &self,
        kind: UpstreamKind,
        resource: &'static str,
        path: &str,
        query: Option<&str>,
        hint: CacheHint,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let endpoint = self.endpoint(kind);
        let credential = endpoint
            .credential
            .as_ref()
            .ok_or(UpstreamError::MissingCredential(kind))?;

        let url = build_url(&endpoint.base_url, path, query);
        let start = Instant::now();

        tracing::debug!(
            resource,
            upstream = ?kind,
            path = %path,
            max_age_secs = hint.max_age().as_secs(),
            "Calling upstream"
        );

        let result = self.send(&url, credential).await;

        match &result {
            Ok(response) => {
                tracing::debug!(
                    resource,
                    status = response.status.as_u16(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Upstream responded"
                );
                metrics::record_upstream_call(resource, &response.status.as_u16().to_string(), start);
            }
            Err(e) => {
                tracing::warn!(
                    resource,
                    error = %e,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Upstream call failed"
                );
                metrics::record_upstream_call(resource, "error", start);
            }
        }

        result
    }

    async fn send(&self, url: &str, credential: &Credential) -> Result<UpstreamResponse, UpstreamError> {
        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, credential.bearer())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        Ok(UpstreamResponse { status, body })
    }
}

/// Join a base URL, an encoded path and an optional raw query.
pub fn build_url(base_url: &str, path: &str, query: Option<&str>) -> String {
    let mut url = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );

    if let Some(query) = query.filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(query);
    }

    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url() {
        assert_eq!(
            build_url("https://api.example.com/v1/", "clans/%23ABC", None),
            "https://api.example.com/v1/clans/%23ABC"
        );
        assert_eq!(
            build_url("https://api.example.com/v1", "cards", Some("limit=5")),
            "https://api.example.com/v1/cards?limit=5"
        );
        assert_eq!(
            build_url("https://api.example.com/v1", "cards", Some("")),
            "https://api.example.com/v1/cards"
        );
    }

    #[test]
    fn test_status_text() {
        let response = UpstreamResponse {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: Bytes::new(),
        };
        assert_eq!(response.status_text(), "Service Unavailable");
        assert!(!response.is_success());
    }

    #[test]
    fn test_client_reports_configured_credentials() {
        let credentials = Credentials {
            official: Some(Credential::new("t")),
            mirror: None,
        };
        let client = UpstreamClient::new(&RelayConfig::default(), credentials).unwrap();
        assert!(client.has_credential(UpstreamKind::Official));
        assert!(!client.has_credential(UpstreamKind::Mirror));
    }

    #[tokio::test]
    async fn test_missing_credential_fails_before_sending() {
        let client = UpstreamClient::new(&RelayConfig::default(), Credentials::default()).unwrap();
        let err = client
            .get(UpstreamKind::Mirror, "test", "cards", None, CacheHint::NONE)
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::MissingCredential(UpstreamKind::Mirror)));
    }
}
