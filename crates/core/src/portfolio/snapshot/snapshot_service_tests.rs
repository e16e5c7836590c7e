use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::PortfolioConfig;
use crate::errors::Result;
use crate::fx::FxServiceTrait;
use crate::portfolio::snapshot::{SnapshotService, SnapshotServiceTrait};
use crate::quotes::QuoteServiceTrait;
use folio_market_data::{MarketDataError, Quote, Symbol};

// --- Mock QuoteService ---

#[derive(Default)]
struct MockQuoteService {
    prices: Mutex<HashMap<String, Decimal>>,
    fail_all: Mutex<bool>,
}

impl MockQuoteService {
    fn set_price(&self, symbol: &str, close: Decimal) {
        self.prices
            .lock()
            .unwrap()
            .insert(symbol.to_string(), close);
    }

    fn set_fail(&self) {
        *self.fail_all.lock().unwrap() = true;
    }
}

#[async_trait]
impl QuoteServiceTrait for MockQuoteService {
    async fn get_latest_quotes(
        &self,
        symbols: &[Symbol],
        currency_hint: Option<&str>,
    ) -> Result<HashMap<Symbol, Quote>> {
        if *self.fail_all.lock().unwrap() {
            return Err(MarketDataError::ProviderError {
                provider: "MOCK".to_string(),
                message: "connection refused".to_string(),
            }
            .into());
        }
        let prices = self.prices.lock().unwrap();
        Ok(symbols
            .iter()
            .filter_map(|symbol| {
                prices.get(symbol).map(|close| {
                    (
                        symbol.clone(),
                        Quote::new(
                            chrono::Utc::now(),
                            *close,
                            currency_hint.unwrap_or("USD").to_string(),
                            "MOCK".to_string(),
                        ),
                    )
                })
            })
            .collect())
    }
}

// --- Mock FxService ---

struct MockFxService {
    rates: HashMap<String, Decimal>,
}

impl MockFxService {
    fn with_hkd(rate: Decimal) -> Self {
        let mut rates = HashMap::new();
        rates.insert("HKD".to_string(), rate);
        Self { rates }
    }
}

#[async_trait]
impl FxServiceTrait for MockFxService {
    async fn usd_rate(&self, currency: &str) -> Decimal {
        if currency == "USD" {
            Decimal::ONE
        } else {
            // Mirrors the real service: unknown currency degrades to 1.0
            self.rates.get(currency).copied().unwrap_or(Decimal::ONE)
        }
    }
}

// --- Fixtures ---

fn sample_config() -> PortfolioConfig {
    PortfolioConfig::from_json(
        r#"{
            "markets": [
                {"id": "HK", "name": "Hong Kong", "currency": "HKD"},
                {"id": "US", "name": "USA", "currency": "USD"}
            ],
            "holdings": [
                {
                    "symbol": "1211.HK",
                    "market": "HK",
                    "lots": [{"shares": 6.91, "price": 226, "date": "2024-05-05"}]
                },
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
            "sales": [
                {
                    "symbol": "9618.HK",
                    "shares": 2.84,
                    "purchase_price": 137.3,
                    "sale_price": 184.32,
                    "currency": "HKD"
                }
            ],
            "cash_available": 77.77,
            "fx_fallback_rates": {"HKD": 0.128}
        }"#,
    )
    .unwrap()
}

fn service_with(
    quotes: Arc<MockQuoteService>,
    fx: Arc<MockFxService>,
) -> SnapshotService {
    SnapshotService::new(Arc::new(sample_config()), quotes, fx)
}

fn priced_quotes() -> Arc<MockQuoteService> {
    let quotes = Arc::new(MockQuoteService::default());
    quotes.set_price("1211.HK", dec!(250));
    quotes.set_price("0700.HK", dec!(380));
    quotes.set_price("VOO", dec!(480));
    quotes.set_price("DAVA", dec!(28.50));
    quotes
}

// --- Tests ---

#[tokio::test]
async fn overview_totals_are_sums_of_markets() {
    let service = service_with(priced_quotes(), Arc::new(MockFxService::with_hkd(dec!(0.128))));

    let snapshot = service.overview().await;

    assert!(snapshot.error.is_none());
    assert!(snapshot.warnings.is_empty());
    assert_eq!(snapshot.markets.len(), 2);
    let invested_sum: Decimal = snapshot.markets.iter().map(|m| m.invested_value).sum();
    let current_sum: Decimal = snapshot.markets.iter().map(|m| m.current_value).sum();
    assert_eq!(snapshot.total_invested, invested_sum);
    assert_eq!(snapshot.total_current, current_sum);
    assert_eq!(snapshot.total_value, current_sum + dec!(77.77));
}

#[tokio::test]
async fn overview_performance_comes_from_aggregate_ratio() {
    let service = service_with(priced_quotes(), Arc::new(MockFxService::with_hkd(dec!(0.128))));

    let snapshot = service.overview().await;

    let expected = (snapshot.total_current / snapshot.total_invested - Decimal::ONE) * dec!(100);
    assert_eq!(snapshot.total_performance_pct, expected);
}

#[tokio::test]
async fn hk_values_are_converted_with_the_fx_rate() {
    let service = service_with(priced_quotes(), Arc::new(MockFxService::with_hkd(dec!(0.128))));

    let snapshot = service.overview().await;

    let hk = snapshot.markets.iter().find(|m| m.id == "HK").unwrap();
    let expected_invested =
        (dec!(6.91) * dec!(226) + dec!(0.98) * dec!(399.60)) * dec!(0.128);
    assert_eq!(hk.invested_value, expected_invested);
    assert_eq!(hk.fx_rate_to_usd, dec!(0.128));
}

#[tokio::test]
async fn missing_quote_degrades_one_position_and_warns() {
    let quotes = priced_quotes();
    quotes.prices.lock().unwrap().remove("DAVA");
    let service = service_with(quotes, Arc::new(MockFxService::with_hkd(dec!(0.128))));

    let snapshot = service.overview().await;

    assert_eq!(snapshot.warnings.len(), 1);
    assert!(snapshot.warnings[0].contains("DAVA"));

    let detail = service.market_detail("US").await.unwrap();
    let dava = detail.positions.iter().find(|p| p.symbol == "DAVA").unwrap();
    assert!(dava.price_missing);
    assert_eq!(dava.performance_pct, Decimal::ZERO);
    let voo = detail.positions.iter().find(|p| p.symbol == "VOO").unwrap();
    assert!(!voo.price_missing);
}

#[tokio::test]
async fn provider_failure_degrades_every_position_instead_of_failing() {
    let quotes = Arc::new(MockQuoteService::default());
    quotes.set_fail();
    let service = service_with(quotes, Arc::new(MockFxService::with_hkd(dec!(0.128))));

    let snapshot = service.overview().await;

    assert!(snapshot.error.is_none());
    // One warning per configured holding
    assert_eq!(snapshot.warnings.len(), 4);
    assert_eq!(snapshot.total_current, snapshot.total_invested);
    assert_eq!(snapshot.total_performance_pct, Decimal::ZERO);
}

#[tokio::test]
async fn sales_are_reported_in_native_and_usd() {
    let service = service_with(priced_quotes(), Arc::new(MockFxService::with_hkd(dec!(0.128))));

    let snapshot = service.overview().await;

    assert_eq!(snapshot.sales.len(), 1);
    let sale = &snapshot.sales[0];
    let proceeds = dec!(2.84) * dec!(184.32);
    assert_eq!(sale.proceeds, proceeds);
    assert_eq!(sale.proceeds_usd, proceeds * dec!(0.128));
    let expected_return =
        (proceeds / (dec!(2.84) * dec!(137.3)) - Decimal::ONE) * dec!(100);
    assert_eq!(sale.return_pct, expected_return);
}

#[tokio::test]
async fn computation_error_zeroes_the_snapshot_but_keeps_cash() {
    let mut config = sample_config();
    // Large enough to overflow the sale proceeds multiplication
    config.sales[0].shares = Decimal::MAX;
    let service = SnapshotService::new(
        Arc::new(config),
        priced_quotes(),
        Arc::new(MockFxService::with_hkd(dec!(0.128))),
    );

    let snapshot = service.overview().await;

    let error = snapshot.error.unwrap();
    assert!(error.contains("9618.HK"));
    assert_eq!(snapshot.total_invested, Decimal::ZERO);
    assert_eq!(snapshot.total_current, Decimal::ZERO);
    assert!(snapshot.markets.is_empty());
    assert_eq!(snapshot.cash_available, dec!(77.77));
    assert_eq!(snapshot.total_value, dec!(77.77));
}

#[tokio::test]
async fn market_detail_unknown_market_is_not_found() {
    let service = service_with(priced_quotes(), Arc::new(MockFxService::with_hkd(dec!(0.128))));

    let err = service.market_detail("EU").await.unwrap_err();
    assert!(matches!(err, crate::errors::Error::NotFound(_)));
}

#[tokio::test]
async fn holding_detail_values_each_lot() {
    let service = service_with(priced_quotes(), Arc::new(MockFxService::with_hkd(dec!(0.128))));

    let detail = service.holding_detail("VOO").await.unwrap();

    assert_eq!(detail.lots.len(), 2);
    assert_eq!(detail.shares, dec!(2));
    let invested_sum: Decimal = detail.lots.iter().map(|l| l.invested_value).sum();
    assert_eq!(detail.invested_value, invested_sum);
    // Holding performance from the aggregate ratio over lots
    let expected =
        (detail.current_value / detail.invested_value - Decimal::ONE) * dec!(100);
    assert_eq!(detail.performance_pct, expected);
}

#[tokio::test]
async fn holding_detail_unknown_symbol_is_not_found() {
    let service = service_with(priced_quotes(), Arc::new(MockFxService::with_hkd(dec!(0.128))));

    assert!(service.holding_detail("AAPL").await.is_err());
}

#[tokio::test]
async fn listings_reflect_configuration_order() {
    let service = service_with(priced_quotes(), Arc::new(MockFxService::with_hkd(dec!(0.128))));

    let markets = service.markets();
    assert_eq!(markets[0].id, "HK");
    assert_eq!(markets[1].id, "US");

    let holdings = service.holdings();
    assert_eq!(holdings.len(), 4);
    assert_eq!(holdings[0].symbol, "1211.HK");
}
