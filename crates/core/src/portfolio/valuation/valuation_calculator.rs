//! Pure valuation functions.
//!
//! Everything here is arithmetic over the loaded configuration and a
//! quote map; fetching and degradation policy live in the snapshot
//! service. All outputs are in the reporting currency (USD), produced by
//! multiplying native-currency amounts with the supplied FX rate.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::valuation_model::{LotValuation, MarketValuation, PositionValuation};
use crate::config::HoldingConfig;
use folio_market_data::{Quote, Symbol};

/// Percentage change of `current` relative to `invested`.
///
/// Zero invested value reports 0% by convention rather than dividing.
pub fn performance_pct(invested: Decimal, current: Decimal) -> Decimal {
    if invested.is_zero() {
        Decimal::ZERO
    } else {
        (current / invested - Decimal::ONE) * dec!(100)
    }
}

/// Value a single holding against its latest quote.
///
/// A missing quote falls back to the lot-weighted average purchase
/// price, which by construction yields 0% performance for the position.
pub fn value_position(
    holding: &HoldingConfig,
    quote: Option<&Quote>,
    fx_rate: Decimal,
) -> PositionValuation {
    let shares = holding.total_shares();
    let average_price = holding.average_price();
    let current_price_native = match quote {
        Some(quote) => quote.close,
        None => average_price,
    };

    let invested_value = holding.invested_native() * fx_rate;
    let current_value = shares * current_price_native * fx_rate;

    PositionValuation {
        symbol: holding.symbol.clone(),
        shares,
        purchase_price: average_price * fx_rate,
        current_price: current_price_native * fx_rate,
        invested_value,
        current_value,
        performance_pct: performance_pct(invested_value, current_value),
        price_missing: quote.is_none(),
    }
}

/// Value every lot of a holding at the given native-currency price.
///
/// `current_price_native` of `None` means the quote was missing; each lot
/// then falls back to its own purchase price.
pub fn value_lots(
    holding: &HoldingConfig,
    current_price_native: Option<Decimal>,
    fx_rate: Decimal,
) -> Vec<LotValuation> {
    holding
        .lots
        .iter()
        .map(|lot| {
            let price_native = current_price_native.unwrap_or(lot.price);
            let invested_value = lot.shares * lot.price * fx_rate;
            let current_value = lot.shares * price_native * fx_rate;
            LotValuation {
                date: lot.date,
                shares: lot.shares,
                purchase_price: lot.price * fx_rate,
                invested_value,
                current_value,
                performance_pct: performance_pct(invested_value, current_value),
            }
        })
        .collect()
}

/// Value a market's holdings and aggregate the totals.
///
/// Totals are sums of per-position values; the market's performance is
/// computed from the aggregate ratio, not averaged over positions.
/// Missing quotes degrade per position and are surfaced as warnings.
pub fn value_market(
    holdings: &[&HoldingConfig],
    quotes: &HashMap<Symbol, Quote>,
    fx_rate: Decimal,
) -> MarketValuation {
    let mut positions = Vec::with_capacity(holdings.len());
    let mut warnings = Vec::new();
    let mut invested_value = Decimal::ZERO;
    let mut current_value = Decimal::ZERO;

    for holding in holdings {
        let quote = quotes.get(&holding.symbol);
        if quote.is_none() {
            warnings.push(format!(
                "Failed to get current price for {}. Using purchase price instead.",
                holding.symbol
            ));
        }
        let position = value_position(holding, quote, fx_rate);
        invested_value += position.invested_value;
        current_value += position.current_value;
        positions.push(position);
    }

    MarketValuation {
        positions,
        invested_value,
        current_value,
        performance_pct: performance_pct(invested_value, current_value),
        warnings,
    }
}

/// Combine market valuations into portfolio totals.
///
/// Returns (invested, current, performance_pct), with the performance
/// again taken from the aggregate ratio.
pub fn aggregate_totals<'a, I>(markets: I) -> (Decimal, Decimal, Decimal)
where
    I: IntoIterator<Item = &'a MarketValuation>,
{
    let mut invested = Decimal::ZERO;
    let mut current = Decimal::ZERO;
    for market in markets {
        invested += market.invested_value;
        current += market.current_value;
    }
    (invested, current, performance_pct(invested, current))
}
