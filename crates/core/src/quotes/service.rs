use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::errors::Result;
use folio_market_data::{MarketDataProvider, Quote, QuoteCache, Symbol};

#[async_trait]
pub trait QuoteServiceTrait: Send + Sync {
    /// Latest quotes for a symbol set. Symbols the provider cannot price
    /// are absent from the map; callers degrade per position.
    async fn get_latest_quotes(
        &self,
        symbols: &[Symbol],
        currency_hint: Option<&str>,
    ) -> Result<HashMap<Symbol, Quote>>;
}

/// Provider-backed quote service with time-boxed memoization.
pub struct QuoteService {
    provider: Arc<dyn MarketDataProvider>,
    cache: Arc<QuoteCache>,
}

impl QuoteService {
    pub fn new(provider: Arc<dyn MarketDataProvider>, cache: Arc<QuoteCache>) -> Self {
        Self { provider, cache }
    }
}

#[async_trait]
impl QuoteServiceTrait for QuoteService {
    async fn get_latest_quotes(
        &self,
        symbols: &[Symbol],
        currency_hint: Option<&str>,
    ) -> Result<HashMap<Symbol, Quote>> {
        if symbols.is_empty() {
            return Ok(HashMap::new());
        }

        if let Some(cached) = self.cache.get(symbols) {
            debug!("Quote cache hit for {} symbols", symbols.len());
            return Ok(cached);
        }

        let quotes = self
            .provider
            .get_latest_quotes(symbols, currency_hint)
            .await?;
        self.cache.insert(symbols, quotes.clone());
        Ok(quotes)
    }
}
