//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → credentials.rs (bearer tokens resolved once from the environment)
//!     → shared via AppState to all handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Secrets never live in the config file, only in the environment

pub mod credentials;
pub mod loader;
pub mod schema;
pub mod validation;

pub use credentials::{Credential, Credentials};
pub use loader::{load_config, ConfigError};
pub use schema::{
    CorsConfig, ListenerConfig, ObservabilityConfig, RelayConfig, RoutesConfig, TimeoutConfig,
    UpstreamConfig, UpstreamKind, UpstreamsConfig,
};
