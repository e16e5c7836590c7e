//! Market data provider trait definition.

use std::collections::HashMap;

use async_trait::async_trait;
use log::warn;

use crate::errors::MarketDataError;
use crate::models::{Quote, Symbol};

/// Trait for market data providers.
///
/// Implement this trait to add support for a new market data source.
/// Batch fetching treats per-symbol failures (unknown symbol, no data)
/// as gaps in the returned map rather than batch failures; only
/// provider-level errors abort the whole call.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider, e.g. "YAHOO".
    fn id(&self) -> &'static str;

    /// Fetch the latest quote for a single symbol.
    ///
    /// * `currency_hint` - expected quote currency when the provider
    ///   response doesn't carry one (defaults to USD).
    async fn get_latest_quote(
        &self,
        symbol: &str,
        currency_hint: Option<&str>,
    ) -> Result<Quote, MarketDataError>;

    /// Fetch the latest quotes for a set of symbols.
    ///
    /// Symbols the provider cannot price are absent from the returned
    /// map. The caller decides how to degrade.
    async fn get_latest_quotes(
        &self,
        symbols: &[Symbol],
        currency_hint: Option<&str>,
    ) -> Result<HashMap<Symbol, Quote>, MarketDataError> {
        let mut quotes = HashMap::with_capacity(symbols.len());
        for symbol in symbols {
            match self.get_latest_quote(symbol, currency_hint).await {
                Ok(quote) => {
                    quotes.insert(symbol.clone(), quote);
                }
                Err(e) if e.is_per_symbol() => {
                    warn!("{}: no quote for {}: {}", self.id(), symbol, e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(quotes)
    }
}
