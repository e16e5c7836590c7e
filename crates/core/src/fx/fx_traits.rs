use async_trait::async_trait;
use rust_decimal::Decimal;

/// Resolves multipliers converting a currency into USD.
///
/// Infallible by design: a provider failure degrades to the configured
/// fallback rate so a page render never dies on FX.
#[async_trait]
pub trait FxServiceTrait: Send + Sync {
    /// Latest multiplier converting one unit of `currency` into USD.
    async fn usd_rate(&self, currency: &str) -> Decimal;

    /// Convert an amount in `currency` into USD.
    async fn convert_to_usd(&self, amount: Decimal, currency: &str) -> Decimal {
        amount * self.usd_rate(currency).await
    }
}
