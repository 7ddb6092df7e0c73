//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Deserializer, Serialize};

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream API endpoints.
    pub upstreams: UpstreamsConfig,

    /// Per-route upstream selection.
    pub routes: RoutesConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Cross-origin settings for the browser dashboard.
    pub cors: CorsConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// The two upstream bases the relay talks to.
///
/// Fields left out of an `[upstreams.*]` table fall back to that upstream's
/// own defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamsConfig {
    /// Direct game-statistics API.
    #[serde(deserialize_with = "official_upstream")]
    pub official: UpstreamConfig,

    /// Rate-limit friendly mirror, used by the generic proxy route.
    #[serde(deserialize_with = "mirror_upstream")]
    pub mirror: UpstreamConfig,

    /// Honour `HTTPS_PROXY` and friends for outbound calls.
    pub use_env_proxy: bool,
}

impl Default for UpstreamsConfig {
    fn default() -> Self {
        Self {
            official: UpstreamConfig::official(),
            mirror: UpstreamConfig::mirror(),
            use_env_proxy: true,
        }
    }
}

/// A single upstream base.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Base URL that request paths are appended to.
    pub base_url: String,

    /// Environment variable holding the bearer token.
    pub token_env: String,
}

impl UpstreamConfig {
    /// Defaults of the direct API.
    pub fn official() -> Self {
        Self {
            base_url: "https://api.clashroyale.com/v1".to_string(),
            token_env: "CR_API_KEY".to_string(),
        }
    }

    /// Defaults of the mirror.
    pub fn mirror() -> Self {
        Self {
            base_url: "https://proxy.royaleapi.dev/v1".to_string(),
            token_env: "CR_PROXY_API_KEY".to_string(),
        }
    }
}

/// An `[upstreams.*]` table as written, before defaults are applied.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PartialUpstreamConfig {
    base_url: Option<String>,
    token_env: Option<String>,
}

impl PartialUpstreamConfig {
    fn resolve(self, defaults: UpstreamConfig) -> UpstreamConfig {
        UpstreamConfig {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            token_env: self.token_env.unwrap_or(defaults.token_env),
        }
    }
}

fn official_upstream<'de, D: Deserializer<'de>>(deserializer: D) -> Result<UpstreamConfig, D::Error> {
    Ok(PartialUpstreamConfig::deserialize(deserializer)?.resolve(UpstreamConfig::official()))
}

fn mirror_upstream<'de, D: Deserializer<'de>>(deserializer: D) -> Result<UpstreamConfig, D::Error> {
    Ok(PartialUpstreamConfig::deserialize(deserializer)?.resolve(UpstreamConfig::mirror()))
}

/// Names one of the configured upstreams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamKind {
    #[default]
    Official,
    Mirror,
}

/// Route-level upstream selection.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RoutesConfig {
    /// Upstream used by the player lookup.
    pub player_upstream: UpstreamKind,
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Timeout of a single upstream call in seconds.
    pub upstream_secs: u64,

    /// Inbound request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 10,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) when `RUST_LOG` is unset.
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins. Empty allows any origin.
    pub allowed_origins: Vec<String>,
}
