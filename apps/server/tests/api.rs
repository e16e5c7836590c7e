use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tower::ServiceExt;

use folio_core::config::PortfolioConfig;
use folio_market_data::{MarketDataError, MarketDataProvider, Quote};
use folio_server::{api::app_router, build_state_with_provider};

/// Prices 0700.HK and VOO; HKD=X at 7.8125 (so 0.128 HKD->USD); knows
/// nothing else.
struct StubProvider;

#[async_trait]
impl MarketDataProvider for StubProvider {
    fn id(&self) -> &'static str {
        "STUB"
    }

    async fn get_latest_quote(
        &self,
        symbol: &str,
        currency_hint: Option<&str>,
    ) -> Result<Quote, MarketDataError> {
        let close = match symbol {
            "0700.HK" => dec!(400),
            "VOO" => dec!(480),
            "HKD=X" => dec!(7.8125),
            _ => return Err(MarketDataError::SymbolNotFound(symbol.to_string())),
        };
        Ok(Quote::new(
            Utc::now(),
            close,
            currency_hint.unwrap_or("USD").to_string(),
            "STUB".to_string(),
        ))
    }
}

fn sample_config() -> &'static str {
    r#"{
        "markets": [
            {"id": "HK", "name": "Hong Kong", "currency": "HKD"},
            {"id": "US", "name": "USA", "currency": "USD"}
        ],
        "holdings": [
            {
                "symbol": "0700.HK",
                "market": "HK",
                "lots": [{"shares": 0.98, "price": 399.60, "date": "2022-04-01"}]
            },
            {
                "symbol": "VOO",
                "market": "US",
                "lots": [
                    {"shares": 0.48222, "price": 455.80, "date": "2024-02-20"},
                    {"shares": 1.51778, "price": 475.97, "date": "2024-03-08"}
                ]
            },
            {
                "symbol": "DAVA",
                "market": "US",
                "lots": [{"shares": 3.20205, "price": 31.23, "date": "2024-05-17"}]
            }
        ],
        "cash_available": 77.77,
        "fx_fallback_rates": {"HKD": 0.128}
    }"#
}

fn build_test_router() -> axum::Router {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("portfolio.json");
    std::fs::write(&path, sample_config()).unwrap();
    let portfolio = Arc::new(PortfolioConfig::from_file(&path).unwrap());
    let state = build_state_with_provider(portfolio, Arc::new(StubProvider));
    app_router(state)
}

async fn get_json(app: &axum::Router, uri: &str) -> (u16, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status().as_u16();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_reports_portfolio_size() {
    let app = build_test_router();
    let (status, body) = get_json(&app, "/api/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["markets"], 2);
    assert_eq!(body["holdings"], 3);
}

#[tokio::test]
async fn overview_has_totals_and_warning_for_unpriced_symbol() {
    let app = build_test_router();
    let (status, body) = get_json(&app, "/api/overview").await;
    assert_eq!(status, 200);

    assert_eq!(body["baseCurrency"], "USD");
    assert!(body["error"].is_null());
    assert_eq!(body["markets"].as_array().unwrap().len(), 2);
    // DAVA has no quote in the stub
    let warnings = body["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].as_str().unwrap().contains("DAVA"));

    let invested: Decimal = body["totalInvested"].to_string().parse().unwrap();
    let current: Decimal = body["totalCurrent"].to_string().parse().unwrap();
    let total: Decimal = body["totalValue"].to_string().parse().unwrap();
    assert!(invested > Decimal::ZERO);
    // Values round-trip through JSON floats; compare with a tolerance
    assert!((total - (current + dec!(77.77))).abs() < dec!(0.0001));
}

#[tokio::test]
async fn market_detail_lists_positions() {
    let app = build_test_router();
    let (status, body) = get_json(&app, "/api/markets/HK").await;
    assert_eq!(status, 200);

    assert_eq!(body["market"]["currency"], "HKD");
    let positions = body["positions"].as_array().unwrap();
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0]["symbol"], "0700.HK");
    assert_eq!(positions[0]["priceMissing"], false);
    // 0.128 from the stubbed HKD=X quote, not the fallback path
    let fx: Decimal = body["market"]["fxRateToUsd"].to_string().parse().unwrap();
    assert_eq!(fx, dec!(0.128));
}

#[tokio::test]
async fn unknown_market_is_404() {
    let app = build_test_router();
    let (status, body) = get_json(&app, "/api/markets/EU").await;
    assert_eq!(status, 404);
    assert!(body["error"].as_str().unwrap().contains("EU"));
}

#[tokio::test]
async fn holding_detail_breaks_out_lots() {
    let app = build_test_router();
    let (status, body) = get_json(&app, "/api/holdings/VOO").await;
    assert_eq!(status, 200);
    assert_eq!(body["lots"].as_array().unwrap().len(), 2);
    assert_eq!(body["marketId"], "US");
}

#[tokio::test]
async fn unknown_holding_is_404() {
    let app = build_test_router();
    let (status, _) = get_json(&app, "/api/holdings/AAPL").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn listings_enumerate_configuration() {
    let app = build_test_router();

    let (status, markets) = get_json(&app, "/api/markets").await;
    assert_eq!(status, 200);
    assert_eq!(markets.as_array().unwrap().len(), 2);

    let (status, holdings) = get_json(&app, "/api/holdings").await;
    assert_eq!(status, 200);
    assert_eq!(holdings.as_array().unwrap().len(), 3);
}
