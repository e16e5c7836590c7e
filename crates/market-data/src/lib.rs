//! Folio Market Data Crate
//!
//! Provider-agnostic market data fetching for the Folio dashboard.
//!
//! # Overview
//!
//! This crate supports:
//! - Latest adjusted-close quotes for equities/ETFs (e.g. AAPL, 0700.HK)
//! - FX rate quotes via Yahoo pair symbols (e.g. HKD=X)
//! - A time-boxed quote cache so a page render re-fetches at most once
//!   per configured interval
//!
//! # Core Types
//!
//! - [`Quote`] - latest market data quote for a symbol
//! - [`MarketDataProvider`] - trait implemented by data sources
//! - [`YahooProvider`] - Yahoo Finance implementation
//! - [`QuoteCache`] - TTL cache keyed by the requested symbol set

pub mod cache;
pub mod errors;
pub mod models;
pub mod provider;

pub use cache::QuoteCache;
pub use errors::MarketDataError;
pub use models::{Currency, Quote, Symbol};
pub use provider::yahoo::YahooProvider;
pub use provider::MarketDataProvider;
