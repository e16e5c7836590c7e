use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use folio_core::config::PortfolioConfig;
use folio_core::fx::{FxService, FxServiceTrait};
use folio_core::quotes::{QuoteService, QuoteServiceTrait};
use folio_core::snapshot::{SnapshotService, SnapshotServiceTrait};
use folio_market_data::{MarketDataProvider, QuoteCache, YahooProvider};

pub struct AppState {
    pub portfolio: Arc<PortfolioConfig>,
    pub snapshot_service: Arc<dyn SnapshotServiceTrait>,
}

pub fn init_tracing() {
    let log_format = std::env::var("FOLIO_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true))
            .init();
    }
}

/// Build application state with the Yahoo provider.
pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let portfolio = Arc::new(PortfolioConfig::from_file(&config.portfolio_path)?);
    let provider: Arc<dyn MarketDataProvider> = Arc::new(YahooProvider::new()?);
    Ok(build_state_with_provider(portfolio, provider))
}

/// Build application state around any provider. Tests substitute mocks here.
pub fn build_state_with_provider(
    portfolio: Arc<PortfolioConfig>,
    provider: Arc<dyn MarketDataProvider>,
) -> Arc<AppState> {
    let cache = Arc::new(QuoteCache::new(Duration::from_secs(portfolio.quote_ttl_secs)));
    let quote_service: Arc<dyn QuoteServiceTrait> =
        Arc::new(QuoteService::new(provider.clone(), cache.clone()));
    let fx_service: Arc<dyn FxServiceTrait> = Arc::new(FxService::new(
        provider,
        cache,
        portfolio.fx_fallback_rates.clone(),
    ));
    let snapshot_service = Arc::new(SnapshotService::new(
        portfolio.clone(),
        quote_service,
        fx_service,
    ));

    Arc::new(AppState {
        portfolio,
        snapshot_service,
    })
}
