//! Quote fetching through the TTL cache.

mod service;

pub use service::{QuoteService, QuoteServiceTrait};

pub use folio_market_data::Quote;
