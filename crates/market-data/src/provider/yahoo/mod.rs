//! Yahoo Finance market data provider.
//!
//! Fetches latest quotes for:
//! - Equities/ETFs (e.g. VOO, 0700.HK)
//! - Foreign exchange rates via pair symbols (e.g. HKD=X)
//!
//! The primary path uses the chart API through `yahoo_finance_api`. When
//! that returns nothing for a symbol, a backup request against the
//! quoteSummary endpoint is made, which requires Yahoo's crumb/cookie
//! authentication.

mod models;

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use lazy_static::lazy_static;
use num_traits::FromPrimitive;
use reqwest::header;
use rust_decimal::Decimal;
use urlencoding::encode;
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::Quote;
use crate::provider::MarketDataProvider;

use models::QuoteSummaryResponse;

const PROVIDER_ID: &str = "YAHOO";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Cached Yahoo authentication data
#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

lazy_static! {
    /// Global cache for the Yahoo authentication crumb
    static ref YAHOO_CRUMB: RwLock<Option<CrumbData>> = RwLock::default();
}

/// Yahoo Finance market data provider.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
}

impl YahooProvider {
    pub fn new() -> Result<Self, MarketDataError> {
        let connector = yahoo::YahooConnector::new().map_err(|e| {
            MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to initialize Yahoo connector: {}", e),
            }
        })?;
        Ok(Self { connector })
    }

    fn provider_error(message: String) -> MarketDataError {
        MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message,
        }
    }

    /// Ensure we have a valid Yahoo authentication crumb.
    async fn ensure_crumb(&self) -> Result<CrumbData, MarketDataError> {
        {
            let guard = YAHOO_CRUMB.read().unwrap();
            if let Some(crumb) = guard.as_ref() {
                return Ok(crumb.clone());
            }
        }
        self.fetch_crumb().await
    }

    /// Fetch a new Yahoo authentication crumb.
    async fn fetch_crumb(&self) -> Result<CrumbData, MarketDataError> {
        let client = reqwest::Client::new();

        let response = client
            .get("https://fc.yahoo.com")
            .send()
            .await
            .map_err(|e| Self::provider_error(format!("Failed to get cookie: {}", e)))?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| Self::provider_error("Failed to parse Yahoo cookie".to_string()))?;

        let crumb = client
            .get("https://query1.finance.yahoo.com/v1/test/getcrumb")
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .map_err(|e| Self::provider_error(format!("Failed to get crumb: {}", e)))?
            .text()
            .await
            .map_err(|e| Self::provider_error(format!("Failed to read crumb: {}", e)))?;

        let crumb_data = CrumbData { cookie, crumb };

        let mut guard = YAHOO_CRUMB.write().unwrap();
        *guard = Some(crumb_data.clone());

        Ok(crumb_data)
    }

    /// Clear the cached crumb (used when authentication fails)
    fn clear_crumb(&self) {
        let mut guard = YAHOO_CRUMB.write().unwrap();
        *guard = None;
    }

    /// Convert a Yahoo chart-API quote to our Quote model.
    fn yahoo_quote_to_quote(
        &self,
        symbol: &str,
        yahoo_quote: yahoo::Quote,
        currency: String,
    ) -> Result<Quote, MarketDataError> {
        let timestamp: DateTime<Utc> = Utc
            .timestamp_opt(yahoo_quote.timestamp as i64, 0)
            .single()
            .ok_or_else(|| MarketDataError::ValidationFailed {
                message: format!("Invalid timestamp: {}", yahoo_quote.timestamp),
            })?;

        let close = Decimal::from_f64(yahoo_quote.adjclose)
            .filter(|c| !c.is_zero())
            .or_else(|| Decimal::from_f64(yahoo_quote.close))
            .ok_or_else(|| MarketDataError::ValidationFailed {
                message: format!("No usable close price for {}", symbol),
            })?;

        Ok(Quote::new(timestamp, close, currency, PROVIDER_ID.to_string()))
    }

    /// Fetch latest quote using the chart API.
    async fn fetch_latest_quote_primary(
        &self,
        symbol: &str,
        currency: &str,
    ) -> Result<Quote, MarketDataError> {
        let response = self
            .connector
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| {
                if matches!(e, yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult) {
                    MarketDataError::SymbolNotFound(symbol.to_string())
                } else {
                    Self::provider_error(e.to_string())
                }
            })?;

        let yahoo_quote = response
            .last_quote()
            .map_err(|_| MarketDataError::NoData(symbol.to_string()))?;

        self.yahoo_quote_to_quote(symbol, yahoo_quote, currency.to_string())
    }

    /// Fetch latest quote using the quoteSummary API (backup path).
    async fn fetch_latest_quote_backup(
        &self,
        symbol: &str,
        currency: &str,
    ) -> Result<Quote, MarketDataError> {
        let crumb = self.ensure_crumb().await?;

        let url = format!(
            "https://query1.finance.yahoo.com/v10/finance/quoteSummary/{}?modules=price&crumb={}",
            encode(symbol),
            encode(&crumb.crumb)
        );

        let client = reqwest::Client::new();
        let response = client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await
            .map_err(|e| Self::provider_error(format!("Backup quote request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            self.clear_crumb();
            return Err(Self::provider_error(
                "Yahoo authentication expired".to_string(),
            ));
        }

        let data: QuoteSummaryResponse = response
            .json()
            .await
            .map_err(|e| Self::provider_error(format!("Failed to parse backup response: {}", e)))?;

        let price = data
            .quote_summary
            .result
            .first()
            .and_then(|r| r.price.as_ref())
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;

        let close = price
            .regular_market_price
            .as_ref()
            .and_then(|p| p.raw)
            .and_then(Decimal::from_f64)
            .ok_or_else(|| MarketDataError::NoData(symbol.to_string()))?;

        let timestamp = price
            .regular_market_time
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
            .unwrap_or_else(Utc::now);

        // Response currency wins over the caller's hint.
        let currency = price.currency.clone().unwrap_or_else(|| currency.to_string());

        Ok(Quote::new(timestamp, close, currency, PROVIDER_ID.to_string()))
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_latest_quote(
        &self,
        symbol: &str,
        currency_hint: Option<&str>,
    ) -> Result<Quote, MarketDataError> {
        let currency = currency_hint.unwrap_or("USD");

        match self.fetch_latest_quote_primary(symbol, currency).await {
            Ok(quote) => Ok(quote),
            Err(primary_err) => {
                log::debug!(
                    "Chart API failed for {} ({}), trying quoteSummary",
                    symbol,
                    primary_err
                );
                self.fetch_latest_quote_backup(symbol, currency)
                    .await
                    // Keep the primary classification if the backup also
                    // can't identify the symbol.
                    .map_err(|backup_err| {
                        if backup_err.is_per_symbol() {
                            backup_err
                        } else {
                            primary_err
                        }
                    })
            }
        }
    }
}
