//! Data models shared by providers and consumers.

mod quote;

pub use quote::Quote;

/// Ticker symbol string as understood by the provider (e.g. "VOO", "0700.HK").
pub type Symbol = String;

/// Currency code (ISO 4217).
pub type Currency = String;
