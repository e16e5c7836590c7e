use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Valuation of one holding, in the reporting currency (USD).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionValuation {
    pub symbol: String,
    pub shares: Decimal,
    /// Lot-weighted average purchase price
    pub purchase_price: Decimal,
    /// Latest price, or the purchase price when the quote was missing
    pub current_price: Decimal,
    pub invested_value: Decimal,
    pub current_value: Decimal,
    pub performance_pct: Decimal,
    /// True when no quote was available and the purchase price was used
    pub price_missing: bool,
}

/// Valuation of one purchase lot, in the reporting currency (USD).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LotValuation {
    pub date: NaiveDate,
    pub shares: Decimal,
    pub purchase_price: Decimal,
    pub invested_value: Decimal,
    pub current_value: Decimal,
    pub performance_pct: Decimal,
}

/// Aggregated valuation of one market's positions.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketValuation {
    pub positions: Vec<PositionValuation>,
    pub invested_value: Decimal,
    pub current_value: Decimal,
    pub performance_pct: Decimal,
    /// Degradations encountered while valuing, e.g. missing quotes
    pub warnings: Vec<String>,
}
