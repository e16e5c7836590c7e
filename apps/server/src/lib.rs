//! Folio server - HTTP surface over the snapshot service.
//!
//! Exposed as a library so integration tests can build the router with a
//! substituted market data provider.

pub mod api;
pub mod config;
pub mod error;
pub mod main_lib;

pub use main_lib::{build_state, build_state_with_provider, init_tracing, AppState};
