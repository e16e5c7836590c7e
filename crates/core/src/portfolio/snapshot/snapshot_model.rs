use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::constants::BASE_CURRENCY;
use crate::portfolio::valuation::{LotValuation, PositionValuation};

/// Aggregate figures for one market, in USD.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSummary {
    pub id: String,
    pub name: String,
    pub currency: String,
    /// Rate applied to convert this market's native values into USD
    pub fx_rate_to_usd: Decimal,
    pub invested_value: Decimal,
    pub current_value: Decimal,
    pub performance_pct: Decimal,
}

/// A realized sale with proceeds converted into USD.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleReport {
    pub symbol: String,
    pub shares_sold: Decimal,
    pub purchase_price: Decimal,
    pub sale_price: Decimal,
    pub currency: String,
    /// Proceeds in the sale's native currency
    pub proceeds: Decimal,
    pub proceeds_usd: Decimal,
    pub return_pct: Decimal,
}

/// One full evaluation of the portfolio (the overview page).
///
/// Derived on every request; never persisted.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub base_currency: String,
    pub total_invested: Decimal,
    pub total_current: Decimal,
    pub cash_available: Decimal,
    /// Current value of holdings plus available cash
    pub total_value: Decimal,
    pub total_performance_pct: Decimal,
    pub markets: Vec<MarketSummary>,
    pub sales: Vec<SaleReport>,
    /// Degradations encountered during evaluation (missing quotes)
    pub warnings: Vec<String>,
    /// Set when the whole evaluation failed and figures were zeroed
    pub error: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl PortfolioSnapshot {
    /// All-zero snapshot used when an evaluation fails unexpectedly.
    /// Cash is kept: it comes from configuration, not market data.
    pub fn zeroed(cash_available: Decimal, error: String) -> Self {
        Self {
            base_currency: BASE_CURRENCY.to_string(),
            total_invested: Decimal::ZERO,
            total_current: Decimal::ZERO,
            cash_available,
            total_value: cash_available,
            total_performance_pct: Decimal::ZERO,
            markets: Vec::new(),
            sales: Vec::new(),
            warnings: Vec::new(),
            error: Some(error),
            generated_at: Utc::now(),
        }
    }
}

/// Per-position breakdown of one market (the market pages).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketDetail {
    pub market: MarketSummary,
    pub positions: Vec<PositionValuation>,
    pub warnings: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// Per-lot breakdown of one holding (the detail page).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingDetail {
    pub symbol: String,
    pub market_id: String,
    pub currency: String,
    pub shares: Decimal,
    pub invested_value: Decimal,
    pub current_value: Decimal,
    pub performance_pct: Decimal,
    pub price_missing: bool,
    pub lots: Vec<LotValuation>,
    pub warnings: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// Listing entry for navigation.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingRef {
    pub symbol: String,
    pub market: String,
}
