//! Market data providers.

mod traits;
pub mod yahoo;

pub use traits::MarketDataProvider;
