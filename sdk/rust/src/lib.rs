//! Client SDK for the royale relay.

mod client;
mod paging;

pub use client::{HealthStatus, RelayClient, RelayResponse};
pub use paging::{ConflictingCursors, Paging};
