//! Upstream bearer credentials.
//!
//! Tokens are resolved once at startup and are read-only afterwards.
//! A missing token is not a startup failure: handlers that need it answer
//! with a configuration error instead.

use std::fmt;

use crate::config::schema::{UpstreamKind, UpstreamsConfig};

/// An opaque bearer token. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Value of the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(****)")
    }
}

/// Credentials for both upstreams.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub official: Option<Credential>,
    pub mirror: Option<Credential>,
}

impl Credentials {
    /// Read tokens from the environment variables named in the config.
    pub fn from_env(upstreams: &UpstreamsConfig) -> Self {
        Self::from_lookup(upstreams, |name| std::env::var(name).ok())
    }

    /// Resolve tokens through an arbitrary lookup. Empty values count as unset.
    pub fn from_lookup<F>(upstreams: &UpstreamsConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let resolve = |name: &str| {
            lookup(name)
                .filter(|token| !token.trim().is_empty())
                .map(Credential::new)
        };

        Self {
            official: resolve(&upstreams.official.token_env),
            mirror: resolve(&upstreams.mirror.token_env),
        }
    }

    pub fn get(&self, kind: UpstreamKind) -> Option<&Credential> {
        match kind {
            UpstreamKind::Official => self.official.as_ref(),
            UpstreamKind::Mirror => self.mirror.as_ref(),
        }
    }
}
