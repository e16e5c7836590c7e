//! Portfolio snapshot module - one evaluation of the whole dashboard.

mod snapshot_model;
mod snapshot_service;
mod snapshot_traits;

pub use snapshot_model::*;
pub use snapshot_service::*;
pub use snapshot_traits::*;

#[cfg(test)]
mod snapshot_service_tests;
