use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_QUOTE_TTL_SECS;
use crate::errors::{Error, Result};

/// A single purchase of a holding, in the holding's native currency.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Lot {
    pub shares: Decimal,
    pub price: Decimal,
    pub date: NaiveDate,
}

/// A market groups holdings quoted in the same currency.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MarketConfig {
    pub id: String,
    pub name: String,
    pub currency: String,
}

/// A position: a ticker symbol with one or more purchase lots.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HoldingConfig {
    pub symbol: String,
    pub market: String,
    pub lots: Vec<Lot>,
}

impl HoldingConfig {
    /// Total shares across all lots.
    pub fn total_shares(&self) -> Decimal {
        self.lots.iter().map(|lot| lot.shares).sum()
    }

    /// Invested value in the native currency (sum over lots).
    pub fn invested_native(&self) -> Decimal {
        self.lots.iter().map(|lot| lot.shares * lot.price).sum()
    }

    /// Lot-weighted average purchase price in the native currency.
    pub fn average_price(&self) -> Decimal {
        let shares = self.total_shares();
        if shares.is_zero() {
            Decimal::ZERO
        } else {
            self.invested_native() / shares
        }
    }
}

/// A realized position, recorded for the sales table.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SaleConfig {
    pub symbol: String,
    pub shares: Decimal,
    pub purchase_price: Decimal,
    pub sale_price: Decimal,
    pub currency: String,
}

/// The portfolio document loaded at startup.
///
/// Replaces hardcoded ticker/share/price mappings with an explicit,
/// externally supplied configuration so tests and deployments can
/// substitute their own.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PortfolioConfig {
    pub markets: Vec<MarketConfig>,
    pub holdings: Vec<HoldingConfig>,
    #[serde(default)]
    pub sales: Vec<SaleConfig>,
    #[serde(default)]
    pub cash_available: Decimal,
    /// Per-currency USD rates applied when the FX provider is unavailable.
    #[serde(default)]
    pub fx_fallback_rates: HashMap<String, Decimal>,
    #[serde(default = "default_quote_ttl_secs")]
    pub quote_ttl_secs: u64,
}

fn default_quote_ttl_secs() -> u64 {
    DEFAULT_QUOTE_TTL_SECS
}

impl PortfolioConfig {
    /// Load and validate a configuration document from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::ConfigIO(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_json(&raw)
    }

    /// Parse and validate a configuration document from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: PortfolioConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.markets.is_empty() {
            return Err(Error::InvalidConfigValue(
                "at least one market is required".to_string(),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for market in &self.markets {
            if !seen.insert(market.id.as_str()) {
                return Err(Error::InvalidConfigValue(format!(
                    "duplicate market id '{}'",
                    market.id
                )));
            }
            if market.currency.len() != 3
                || !market.currency.chars().all(|c| c.is_ascii_alphabetic())
            {
                return Err(Error::InvalidConfigValue(format!(
                    "market '{}' has invalid currency code '{}'",
                    market.id, market.currency
                )));
            }
        }

        for holding in &self.holdings {
            if self.market(&holding.market).is_none() {
                return Err(Error::InvalidConfigValue(format!(
                    "holding '{}' references unknown market '{}'",
                    holding.symbol, holding.market
                )));
            }
            if holding.lots.is_empty() {
                return Err(Error::InvalidConfigValue(format!(
                    "holding '{}' has no lots",
                    holding.symbol
                )));
            }
            for lot in &holding.lots {
                if lot.shares <= Decimal::ZERO || lot.price <= Decimal::ZERO {
                    return Err(Error::InvalidConfigValue(format!(
                        "holding '{}' has a lot with non-positive shares or price",
                        holding.symbol
                    )));
                }
            }
        }

        for sale in &self.sales {
            if sale.shares <= Decimal::ZERO || sale.purchase_price <= Decimal::ZERO {
                return Err(Error::InvalidConfigValue(format!(
                    "sale '{}' has non-positive shares or purchase price",
                    sale.symbol
                )));
            }
        }

        Ok(())
    }

    pub fn market(&self, id: &str) -> Option<&MarketConfig> {
        self.markets.iter().find(|m| m.id == id)
    }

    pub fn holding(&self, symbol: &str) -> Option<&HoldingConfig> {
        self.holdings.iter().find(|h| h.symbol == symbol)
    }

    /// Holdings belonging to one market, in configuration order.
    pub fn holdings_for_market(&self, market_id: &str) -> Vec<&HoldingConfig> {
        self.holdings
            .iter()
            .filter(|h| h.market == market_id)
            .collect()
    }

    /// Symbols of one market's holdings.
    pub fn symbols_for_market(&self, market_id: &str) -> Vec<String> {
        self.holdings_for_market(market_id)
            .iter()
            .map(|h| h.symbol.clone())
            .collect()
    }
}
