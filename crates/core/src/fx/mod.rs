//! FX (Foreign Exchange) module - rates into the reporting currency.

mod fx_service;
mod fx_traits;

pub use fx_service::FxService;
pub use fx_traits::FxServiceTrait;
