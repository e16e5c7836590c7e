//! Folio Core - Domain models, services, and traits.
//!
//! This crate contains the business logic for the Folio dashboard:
//! portfolio configuration, FX conversion, quote fetching, and the
//! valuation/snapshot services. It is storage-free; the only state is
//! the loaded configuration plus the market-data quote cache.

pub mod config;
pub mod constants;
pub mod errors;
pub mod fx;
pub mod portfolio;
pub mod quotes;

pub use portfolio::*;

pub use errors::Error;
pub use errors::Result;
