//! Folioguard - Portfolio valuation and fallback-decision engine.
//!
//! This crate contains the core business logic: live portfolio valuation
//! against a pluggable price source, daily value snapshots, per-symbol
//! price-floor monitoring, and the strategy engine that decides what to do
//! when a floor breaks. It is storage-agnostic: repository traits are
//! defined here and an in-memory implementation ships in [`storage`].

pub mod constants;
pub mod errors;
pub mod fallback;
pub mod market_data;
pub mod portfolio;
pub mod storage;
pub mod thresholds;
pub mod trend;

// Re-export common types from the portfolio modules
pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
