use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Reporting currency for every snapshot
pub const BASE_CURRENCY: &str = "USD";

/// Fallback HKD->USD rate applied when the FX provider is unavailable
pub const FALLBACK_HKD_USD_RATE: Decimal = dec!(0.128);

/// Default time-to-live for cached quotes, in seconds
pub const DEFAULT_QUOTE_TTL_SECS: u64 = 3600;
