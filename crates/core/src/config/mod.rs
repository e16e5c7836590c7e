//! Portfolio configuration - the document describing markets, holdings,
//! cash, and realized sales.

mod portfolio_config;

pub use portfolio_config::{
    HoldingConfig, Lot, MarketConfig, PortfolioConfig, SaleConfig,
};
