//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, CORS, metrics)
//! - Bind server to listener
//! - Serve until the shutdown signal fires

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderValue, Method, Request},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{CorsConfig, Credentials, RelayConfig, UpstreamKind};
use crate::handlers::{self, clan, health, player, proxy};
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::observability::metrics;
use crate::upstream::UpstreamClient;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
    pub player_upstream: UpstreamKind,
}

impl AppState {
    pub fn new(config: &RelayConfig, credentials: Credentials) -> Result<Self, reqwest::Error> {
        Ok(Self {
            upstream: UpstreamClient::new(config, credentials)?,
            player_upstream: config.routes.player_upstream,
        })
    }
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and credentials.
    pub fn new(config: RelayConfig, credentials: Credentials) -> Result<Self, reqwest::Error> {
        for (kind, present) in [
            (UpstreamKind::Official, credentials.official.is_some()),
            (UpstreamKind::Mirror, credentials.mirror.is_some()),
        ] {
            if !present {
                tracing::warn!(upstream = ?kind, "No credential configured; dependent routes will fail");
            }
        }

        let state = AppState::new(&config, credentials)?;
        let router = build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &RelayConfig, state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::get_health))
        .route("/clan/{tag}", get(clan::get_clan))
        .route("/clan/", get(handlers::missing_tag))
        .route("/player/{tag}", get(player::get_player))
        .route("/player/", get(handlers::missing_tag))
        .route("/proxy/{*path}", get(proxy::proxy))
        .with_state(state)
        .layer(middleware::from_fn(track_request))
        .layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.timeouts.request_secs,
                )))
                .layer(cors_layer(&config.cors)),
        )
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers(Any);

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

/// Log and record every routed request.
async fn track_request(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let request_id = request_id(request.headers()).to_string();
    let method = request.method().clone();

    let response = next.run(request).await;
    let status = response.status();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        route = %route,
        status = status.as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Request finished"
    );
    metrics::record_request(route, status.as_u16(), start);

    response
}
