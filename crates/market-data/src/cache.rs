//! Time-boxed quote cache.
//!
//! Each entry is keyed by the normalized symbol set of a fetch, holds the
//! quote map that fetch produced, and expires after the configured TTL.
//! A cache hit means the provider is not contacted again until the entry
//! expires.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::models::{Quote, Symbol};

/// Default time-to-live for cached quote sets (one hour).
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

struct CacheEntry {
    quotes: HashMap<Symbol, Quote>,
    expires_at: Instant,
}

/// TTL cache for batch quote fetches.
pub struct QuoteCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl QuoteCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Cache key for a symbol set: sorted, deduplicated, comma-joined,
    /// so request order doesn't fragment the cache.
    pub fn key(symbols: &[Symbol]) -> String {
        let mut sorted: Vec<&str> = symbols.iter().map(String::as_str).collect();
        sorted.sort_unstable();
        sorted.dedup();
        sorted.join(",")
    }

    /// Returns the cached quote map for this symbol set, if present and
    /// not expired.
    pub fn get(&self, symbols: &[Symbol]) -> Option<HashMap<Symbol, Quote>> {
        let key = Self::key(symbols);
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(&key)
            .filter(|entry| Instant::now() < entry.expires_at)
            .map(|entry| entry.quotes.clone())
    }

    /// Stores the quote map for this symbol set, replacing any previous
    /// entry and dropping entries that have expired.
    pub fn insert(&self, symbols: &[Symbol], quotes: HashMap<Symbol, Quote>) {
        let key = Self::key(symbols);
        let now = Instant::now();
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.retain(|_, entry| now < entry.expires_at);
        entries.insert(
            key,
            CacheEntry {
                quotes,
                expires_at: now + self.ttl,
            },
        );
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }
}

impl Default for QuoteCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn quote(close: rust_decimal::Decimal) -> Quote {
        Quote::new(Utc::now(), close, "USD".to_string(), "TEST".to_string())
    }

    fn symbols(names: &[&str]) -> Vec<Symbol> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn key_is_order_insensitive_and_deduped() {
        assert_eq!(
            QuoteCache::key(&symbols(&["VOO", "BABA", "VOO"])),
            QuoteCache::key(&symbols(&["BABA", "VOO"]))
        );
        assert_eq!(QuoteCache::key(&symbols(&["BABA", "VOO"])), "BABA,VOO");
    }

    #[test]
    fn live_entry_is_returned() {
        let cache = QuoteCache::new(Duration::from_secs(60));
        let syms = symbols(&["VOO"]);
        let mut quotes = HashMap::new();
        quotes.insert("VOO".to_string(), quote(dec!(470)));
        cache.insert(&syms, quotes);

        let cached = cache.get(&syms).expect("entry should be live");
        assert_eq!(cached["VOO"].close, dec!(470));
    }

    #[test]
    fn expired_entry_is_a_miss() {
        let cache = QuoteCache::new(Duration::ZERO);
        let syms = symbols(&["VOO"]);
        cache.insert(&syms, HashMap::new());
        assert!(cache.get(&syms).is_none());
    }

    #[test]
    fn insert_drops_expired_entries() {
        let cache = QuoteCache::new(Duration::ZERO);
        cache.insert(&symbols(&["VOO"]), HashMap::new());
        cache.insert(&symbols(&["BABA"]), HashMap::new());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_symbol_sets_are_distinct_entries() {
        let cache = QuoteCache::new(Duration::from_secs(60));
        let hk = symbols(&["0700.HK", "1211.HK"]);
        let us = symbols(&["VOO"]);
        let mut quotes = HashMap::new();
        quotes.insert("VOO".to_string(), quote(dec!(470)));
        cache.insert(&us, quotes);

        assert!(cache.get(&hk).is_none());
        assert!(cache.get(&us).is_some());
    }
}
