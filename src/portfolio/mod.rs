//! Portfolio domain - holdings and trades, live valuation, value history.

pub mod holdings;
pub mod snapshot;
pub mod valuation;

pub use holdings::*;
pub use snapshot::*;
pub use valuation::*;
