use async_trait::async_trait;

use super::snapshot_model::{HoldingDetail, HoldingRef, MarketDetail, PortfolioSnapshot};
use crate::config::MarketConfig;
use crate::errors::Result;

/// Produces dashboard views from the configured portfolio.
#[async_trait]
pub trait SnapshotServiceTrait: Send + Sync {
    /// Full portfolio evaluation. Never fails: an unexpected error
    /// degrades to an all-zero snapshot carrying the error message.
    async fn overview(&self) -> PortfolioSnapshot;

    /// Per-position breakdown of one market.
    async fn market_detail(&self, market_id: &str) -> Result<MarketDetail>;

    /// Per-lot breakdown of one holding.
    async fn holding_detail(&self, symbol: &str) -> Result<HoldingDetail>;

    /// Configured markets, for navigation.
    fn markets(&self) -> Vec<MarketConfig>;

    /// Configured holdings, for navigation.
    fn holdings(&self) -> Vec<HoldingRef>;
}
