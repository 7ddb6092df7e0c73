//! Shared utilities for integration testing.

use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use royale_relay::config::{Credential, Credentials, RelayConfig};
use royale_relay::{HttpServer, Shutdown};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// What the mock upstream answers for one request.
pub struct MockReply {
    pub status: u16,
    pub body: String,
    pub delay: Option<Duration>,
}

impl MockReply {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// A request as the mock upstream saw it.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct SeenRequest {
    /// Raw path and query, still percent-encoded.
    pub target: String,
    pub authorization: Option<String>,
}

pub struct MockUpstream {
    pub addr: SocketAddr,
    calls: Arc<AtomicU32>,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

#[allow(dead_code)]
impl MockUpstream {
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn official_base(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub fn mirror_base(&self) -> String {
        format!("http://{}/mirror/v1", self.addr)
    }
}

/// Start a programmable upstream. `reply` receives the raw request path.
pub async fn start_mock_upstream<F>(reply: F) -> MockUpstream
where
    F: Fn(&str) -> MockReply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let calls = Arc::new(AtomicU32::new(0));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let reply = Arc::new(reply);

    let app = {
        let calls = calls.clone();
        let seen = seen.clone();
        Router::new().fallback(move |uri: Uri, headers: HeaderMap| {
            let calls = calls.clone();
            let seen = seen.clone();
            let reply = reply.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                seen.lock().unwrap().push(SeenRequest {
                    target: uri
                        .path_and_query()
                        .map(|pq| pq.as_str().to_string())
                        .unwrap_or_default(),
                    authorization: headers
                        .get(AUTHORIZATION)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string),
                });

                let MockReply { status, body, delay } = (*reply)(uri.path());
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }

                (
                    StatusCode::from_u16(status).unwrap(),
                    [("content-type", "application/json")],
                    body,
                )
                    .into_response()
            }
        })
    };

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, calls, seen }
}

/// Relay config pointing both upstreams at the mock.
pub fn relay_config(upstream: &MockUpstream) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstreams.official.base_url = upstream.official_base();
    config.upstreams.mirror.base_url = upstream.mirror_base();
    config.upstreams.use_env_proxy = false;
    config.timeouts.upstream_secs = 5;
    config
}

/// Credentials for both upstreams.
pub fn test_credentials() -> Credentials {
    Credentials {
        official: Some(Credential::new("official-token")),
        mirror: Some(Credential::new("mirror-token")),
    }
}

/// A relay running in the background.
pub struct RunningRelay {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl RunningRelay {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RunningRelay {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_relay(config: RelayConfig, credentials: Credentials) -> RunningRelay {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, credentials).unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    RunningRelay { addr, shutdown }
}

/// Inbound client that ignores proxy environment variables.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
