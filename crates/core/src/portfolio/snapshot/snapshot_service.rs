use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{error, warn};
use rust_decimal::Decimal;

use super::snapshot_model::{
    HoldingDetail, HoldingRef, MarketDetail, MarketSummary, PortfolioSnapshot, SaleReport,
};
use super::snapshot_traits::SnapshotServiceTrait;
use crate::config::{MarketConfig, PortfolioConfig, SaleConfig};
use crate::constants::BASE_CURRENCY;
use crate::errors::{Error, Result};
use crate::fx::FxServiceTrait;
use crate::portfolio::valuation::{performance_pct, value_lots, value_market, MarketValuation};
use crate::quotes::QuoteServiceTrait;
use folio_market_data::{Quote, Symbol};

/// Evaluates the configured portfolio against live market data.
pub struct SnapshotService {
    config: Arc<PortfolioConfig>,
    quote_service: Arc<dyn QuoteServiceTrait>,
    fx_service: Arc<dyn FxServiceTrait>,
}

impl SnapshotService {
    pub fn new(
        config: Arc<PortfolioConfig>,
        quote_service: Arc<dyn QuoteServiceTrait>,
        fx_service: Arc<dyn FxServiceTrait>,
    ) -> Self {
        Self {
            config,
            quote_service,
            fx_service,
        }
    }

    /// Fetch quotes for one market's symbols. A provider failure for the
    /// whole batch degrades to an empty map so every position falls back
    /// to its purchase price instead of killing the page.
    async fn market_quotes(&self, market: &MarketConfig) -> HashMap<Symbol, Quote> {
        let symbols = self.config.symbols_for_market(&market.id);
        match self
            .quote_service
            .get_latest_quotes(&symbols, Some(&market.currency))
            .await
        {
            Ok(quotes) => quotes,
            Err(e) => {
                warn!("No data available for market {}: {}", market.id, e);
                HashMap::new()
            }
        }
    }

    async fn value_one_market(&self, market: &MarketConfig) -> (MarketValuation, Decimal) {
        let fx_rate = self.fx_service.usd_rate(&market.currency).await;
        let quotes = self.market_quotes(market).await;
        let holdings = self.config.holdings_for_market(&market.id);
        (value_market(&holdings, &quotes, fx_rate), fx_rate)
    }

    /// Realized-sale row. Sale amounts multiply unbounded configuration
    /// values; overflow surfaces as a calculation error.
    async fn sale_report(&self, sale: &SaleConfig) -> Result<SaleReport> {
        let overflow = || Error::Calculation(format!("Sale value overflow for {}", sale.symbol));
        let proceeds = sale.shares.checked_mul(sale.sale_price).ok_or_else(overflow)?;
        let purchase_value = sale
            .shares
            .checked_mul(sale.purchase_price)
            .ok_or_else(overflow)?;
        let fx_rate = self.fx_service.usd_rate(&sale.currency).await;
        let proceeds_usd = proceeds.checked_mul(fx_rate).ok_or_else(overflow)?;
        Ok(SaleReport {
            symbol: sale.symbol.clone(),
            shares_sold: sale.shares,
            purchase_price: sale.purchase_price,
            sale_price: sale.sale_price,
            currency: sale.currency.clone(),
            proceeds,
            proceeds_usd,
            return_pct: performance_pct(purchase_value, proceeds),
        })
    }

    async fn compute_overview(&self) -> Result<PortfolioSnapshot> {
        let mut markets = Vec::with_capacity(self.config.markets.len());
        let mut warnings = Vec::new();
        let mut total_invested = Decimal::ZERO;
        let mut total_current = Decimal::ZERO;

        for market in &self.config.markets {
            let (valuation, fx_rate) = self.value_one_market(market).await;
            total_invested += valuation.invested_value;
            total_current += valuation.current_value;
            warnings.extend(valuation.warnings);
            markets.push(MarketSummary {
                id: market.id.clone(),
                name: market.name.clone(),
                currency: market.currency.clone(),
                fx_rate_to_usd: fx_rate,
                invested_value: valuation.invested_value,
                current_value: valuation.current_value,
                performance_pct: valuation.performance_pct,
            });
        }

        let mut sales = Vec::with_capacity(self.config.sales.len());
        for sale in &self.config.sales {
            sales.push(self.sale_report(sale).await?);
        }

        Ok(PortfolioSnapshot {
            base_currency: BASE_CURRENCY.to_string(),
            total_invested,
            total_current,
            cash_available: self.config.cash_available,
            total_value: total_current + self.config.cash_available,
            total_performance_pct: performance_pct(total_invested, total_current),
            markets,
            sales,
            warnings,
            error: None,
            generated_at: Utc::now(),
        })
    }
}

#[async_trait]
impl SnapshotServiceTrait for SnapshotService {
    async fn overview(&self) -> PortfolioSnapshot {
        match self.compute_overview().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Error calculating portfolio metrics: {}", e);
                PortfolioSnapshot::zeroed(self.config.cash_available, e.to_string())
            }
        }
    }

    async fn market_detail(&self, market_id: &str) -> Result<MarketDetail> {
        let market = self
            .config
            .market(market_id)
            .ok_or_else(|| Error::NotFound(format!("Market '{}'", market_id)))?
            .clone();

        let (valuation, fx_rate) = self.value_one_market(&market).await;

        Ok(MarketDetail {
            market: MarketSummary {
                id: market.id,
                name: market.name,
                currency: market.currency,
                fx_rate_to_usd: fx_rate,
                invested_value: valuation.invested_value,
                current_value: valuation.current_value,
                performance_pct: valuation.performance_pct,
            },
            positions: valuation.positions,
            warnings: valuation.warnings,
            generated_at: Utc::now(),
        })
    }

    async fn holding_detail(&self, symbol: &str) -> Result<HoldingDetail> {
        let holding = self
            .config
            .holding(symbol)
            .ok_or_else(|| Error::NotFound(format!("Holding '{}'", symbol)))?;
        let market = self
            .config
            .market(&holding.market)
            .ok_or_else(|| Error::NotFound(format!("Market '{}'", holding.market)))?;

        let fx_rate = self.fx_service.usd_rate(&market.currency).await;
        let symbols = vec![holding.symbol.clone()];
        let quotes = match self
            .quote_service
            .get_latest_quotes(&symbols, Some(&market.currency))
            .await
        {
            Ok(quotes) => quotes,
            Err(e) => {
                warn!("No data available for {}: {}", symbol, e);
                HashMap::new()
            }
        };

        let quote = quotes.get(symbol);
        let mut warnings = Vec::new();
        if quote.is_none() {
            warnings.push(format!(
                "Failed to get current price for {}. Using purchase price instead.",
                symbol
            ));
        }

        let position =
            crate::portfolio::valuation::value_position(holding, quote, fx_rate);
        let lots = value_lots(holding, quote.map(|q| q.close), fx_rate);

        Ok(HoldingDetail {
            symbol: holding.symbol.clone(),
            market_id: holding.market.clone(),
            currency: market.currency.clone(),
            shares: position.shares,
            invested_value: position.invested_value,
            current_value: position.current_value,
            performance_pct: position.performance_pct,
            price_missing: position.price_missing,
            lots,
            warnings,
            generated_at: Utc::now(),
        })
    }

    fn markets(&self) -> Vec<MarketConfig> {
        self.config.markets.clone()
    }

    fn holdings(&self) -> Vec<HoldingRef> {
        self.config
            .holdings
            .iter()
            .map(|h| HoldingRef {
                symbol: h.symbol.clone(),
                market: h.market.clone(),
            })
            .collect()
    }
}
