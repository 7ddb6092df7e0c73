//! Upstream game-statistics API access.
//!
//! # Data Flow
//! ```text
//! handler
//!     → tag.rs / path encoding (encoded path segments)
//!     → client.rs (credential, timeout, GET, buffered body)
//!     → UpstreamResponse (status + bytes)
//!     → handler translates status and body
//! ```

pub mod client;

use axum::http::{header::CACHE_CONTROL, HeaderValue};
use std::time::Duration;

pub use client::{build_url, UpstreamClient, UpstreamError, UpstreamResponse};

/// Requested max staleness for one upstream call.
///
/// The relay holds no cache of its own; the hint is logged with the call
/// and exposed to shared caches in front of the relay as `s-maxage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheHint(Duration);

impl CacheHint {
    pub const NONE: CacheHint = CacheHint(Duration::ZERO);
    pub const CLAN: CacheHint = CacheHint(Duration::from_secs(60));
    pub const PROFILE: CacheHint = CacheHint(Duration::from_secs(60));
    pub const BATTLE_LOG: CacheHint = CacheHint(Duration::from_secs(60));
    pub const UPCOMING_CHESTS: CacheHint = CacheHint(Duration::from_secs(600));

    pub const fn from_secs(secs: u64) -> Self {
        CacheHint(Duration::from_secs(secs))
    }

    pub fn max_age(&self) -> Duration {
        self.0
    }

    /// `Cache-Control` header value, or `None` for [`CacheHint::NONE`].
    pub fn header_value(&self) -> Option<(axum::http::HeaderName, HeaderValue)> {
        if self.0.is_zero() {
            return None;
        }
        let value = format!("public, s-maxage={}", self.0.as_secs());
        HeaderValue::from_str(&value)
            .ok()
            .map(|value| (CACHE_CONTROL, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_control_value() {
        let (name, value) = CacheHint::UPCOMING_CHESTS.header_value().unwrap();
        assert_eq!(name, CACHE_CONTROL);
        assert_eq!(value, "public, s-maxage=600");
        assert!(CacheHint::NONE.header_value().is_none());
        assert_eq!(CacheHint::from_secs(60), CacheHint::CLAN);
    }
}
