pub mod snapshot;
pub mod valuation;
