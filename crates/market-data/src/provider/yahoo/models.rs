//! Deserialization models for the Yahoo quoteSummary endpoint, used by
//! the backup quote path when the chart API returns nothing.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    pub quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
pub struct QuoteSummary {
    #[serde(default)]
    pub result: Vec<QuoteSummaryResult>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteSummaryResult {
    pub price: Option<PriceBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBlock {
    pub currency: Option<String>,
    pub regular_market_price: Option<RawValue>,
    pub regular_market_time: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RawValue {
    pub raw: Option<f64>,
}
