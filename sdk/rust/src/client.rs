use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status body returned by `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

/// A relay answer: the HTTP status plus the decoded JSON body.
///
/// Error statuses are not turned into `Err`; the relay always answers with
/// a JSON body and callers decide what a non-2xx means for them.
#[derive(Debug, Clone)]
pub struct RelayResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl RelayResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The `error` message of a failed call, if the relay supplied one.
    pub fn error_message(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }
}

pub struct RelayClient {
    client: Client,
    relay_url: String,
}

impl RelayClient {
    pub fn new(relay_url: &str) -> Self {
        Self::with_client(Client::new(), relay_url)
    }

    /// Use a preconfigured `reqwest::Client` (proxy settings, timeouts).
    pub fn with_client(client: Client, relay_url: &str) -> Self {
        Self {
            client,
            relay_url: relay_url.trim_end_matches('/').to_string(),
        }
    }

    /// Check that the relay is up.
    pub async fn health(&self) -> Result<HealthStatus, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .get(format!("{}/health", self.relay_url))
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(format!("Relay returned error status {}: {}", status, text).into());
        }

        Ok(serde_json::from_str::<HealthStatus>(&text)?)
    }

    /// Look up a clan by tag. The tag may be given with or without `#`.
    pub async fn clan(&self, tag: &str) -> Result<RelayResponse, reqwest::Error> {
        self.get(&format!("/clan/{}", urlencoding::encode(tag)))
            .await
    }

    /// Look up a player profile merged with battle log and upcoming chests.
    pub async fn player(&self, tag: &str) -> Result<RelayResponse, reqwest::Error> {
        self.get(&format!("/player/{}", urlencoding::encode(tag)))
            .await
    }

    /// Forward an arbitrary upstream path through the relay's proxy route.
    ///
    /// `path` is split on `/` and each segment is encoded on its own, so a
    /// tag such as `#ABC` survives as a single segment.
    pub async fn proxy(
        &self,
        path: &str,
        query: Option<&str>,
    ) -> Result<RelayResponse, reqwest::Error> {
        let encoded = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        let mut target = format!("/proxy/{}", encoded);
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            target.push('?');
            target.push_str(query.trim_start_matches('?'));
        }

        self.get(&target).await
    }

    async fn get(&self, path: &str) -> Result<RelayResponse, reqwest::Error> {
        let resp = self
            .client
            .get(format!("{}{}", self.relay_url, path))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.json::<Value>().await?;
        Ok(RelayResponse { status, body })
    }
}
