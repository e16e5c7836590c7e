use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::warn;
use rust_decimal::Decimal;

use super::fx_traits::FxServiceTrait;
use crate::constants::{BASE_CURRENCY, FALLBACK_HKD_USD_RATE};
use folio_market_data::{MarketDataProvider, QuoteCache};

/// FX service backed by the market data provider.
///
/// Rates come from Yahoo pair symbols: `HKD=X` quotes USD->HKD, so the
/// USD rate for HKD is the inverse of the close. Fetches go through the
/// shared TTL cache. Any failure degrades to the fallback rate for that
/// currency (configured map first, then the built-in HKD rate, then
/// 1.0), logged at warn level.
pub struct FxService {
    provider: Arc<dyn MarketDataProvider>,
    cache: Arc<QuoteCache>,
    fallback_rates: HashMap<String, Decimal>,
}

impl FxService {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        cache: Arc<QuoteCache>,
        fallback_rates: HashMap<String, Decimal>,
    ) -> Self {
        Self {
            provider,
            cache,
            fallback_rates,
        }
    }

    /// Fallback USD rate for a currency. The configured map wins; HKD has
    /// a built-in rate so an unconfigured document still values Hong Kong
    /// holdings sensibly. Everything else degrades to 1.0.
    fn fallback_rate(&self, currency: &str) -> Decimal {
        if let Some(rate) = self.fallback_rates.get(currency) {
            return *rate;
        }
        if currency == "HKD" {
            return FALLBACK_HKD_USD_RATE;
        }
        warn!("No fallback FX rate configured for {}. Using 1.0.", currency);
        Decimal::ONE
    }

    /// Yahoo pair symbol quoting USD -> `currency`.
    fn pair_symbol(currency: &str) -> String {
        format!("{}=X", currency)
    }

    async fn fetch_usd_rate(&self, currency: &str) -> Option<Decimal> {
        let symbols = vec![Self::pair_symbol(currency)];

        let quotes = match self.cache.get(&symbols) {
            Some(cached) => cached,
            None => {
                let fetched = self
                    .provider
                    .get_latest_quotes(&symbols, Some(currency))
                    .await
                    .ok()?;
                // Only successful fetches are worth caching; a miss should
                // retry on the next evaluation.
                if !fetched.is_empty() {
                    self.cache.insert(&symbols, fetched.clone());
                }
                fetched
            }
        };

        let quote = quotes.get(&symbols[0])?;
        if quote.close.is_zero() {
            return None;
        }
        // The pair quotes USD->currency; invert for currency->USD.
        Some(Decimal::ONE / quote.close)
    }
}

#[async_trait]
impl FxServiceTrait for FxService {
    async fn usd_rate(&self, currency: &str) -> Decimal {
        if currency == BASE_CURRENCY {
            return Decimal::ONE;
        }
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            warn!("Invalid currency code '{}'. Using fallback rate.", currency);
            return self.fallback_rate(currency);
        }

        match self.fetch_usd_rate(currency).await {
            Some(rate) => rate,
            None => {
                let fallback = self.fallback_rate(currency);
                warn!(
                    "FX rate {}->USD unavailable. Using fallback rate {}.",
                    currency, fallback
                );
                fallback
            }
        }
    }
}
