//! Royale relay library.
//!
//! Server-side handlers that proxy and reshape calls to the game-statistics
//! API for the browser dashboard.

pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod lifecycle;
pub mod meta;
pub mod observability;
pub mod tag;
pub mod upstream;

pub use config::schema::RelayConfig;
pub use error::{RelayError, RelayResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use tag::Tag;
