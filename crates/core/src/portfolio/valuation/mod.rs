//! Valuation of holdings against latest quotes.

mod valuation_calculator;
mod valuation_model;


pub use valuation_calculator::{
    aggregate_totals, performance_pct, value_lots, value_market, value_position,
};
pub use valuation_model::{LotValuation, MarketValuation, PositionValuation};
