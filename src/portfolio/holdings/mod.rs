//! Holdings - position/cash rows and the trade-execution path.

mod holdings_errors;
mod holdings_model;
mod holdings_service;
mod holdings_traits;

pub use holdings_errors::*;
pub use holdings_model::*;
pub use holdings_service::*;
pub use holdings_traits::*;
