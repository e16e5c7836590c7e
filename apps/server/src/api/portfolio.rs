use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::error::ApiResult;
use crate::main_lib::AppState;
use folio_core::config::MarketConfig;
use folio_core::snapshot::{HoldingDetail, HoldingRef, MarketDetail, PortfolioSnapshot};

/// Portfolio totals, per-market summaries, cash, and the sales record.
async fn get_overview(State(state): State<Arc<AppState>>) -> Json<PortfolioSnapshot> {
    Json(state.snapshot_service.overview().await)
}

async fn list_markets(State(state): State<Arc<AppState>>) -> Json<Vec<MarketConfig>> {
    Json(state.snapshot_service.markets())
}

/// Per-position breakdown of one market.
async fn get_market_detail(
    State(state): State<Arc<AppState>>,
    Path(market_id): Path<String>,
) -> ApiResult<Json<MarketDetail>> {
    let detail = state.snapshot_service.market_detail(&market_id).await?;
    Ok(Json(detail))
}

async fn list_holdings(State(state): State<Arc<AppState>>) -> Json<Vec<HoldingRef>> {
    Json(state.snapshot_service.holdings())
}

/// Per-lot breakdown of one holding.
async fn get_holding_detail(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<HoldingDetail>> {
    let detail = state.snapshot_service.holding_detail(&symbol).await?;
    Ok(Json(detail))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/overview", get(get_overview))
        .route("/markets", get(list_markets))
        .route("/markets/{market_id}", get(get_market_detail))
        .route("/holdings", get(list_holdings))
        .route("/holdings/{symbol}", get(get_holding_detail))
}
