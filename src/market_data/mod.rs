//! Price source seam - provider trait, quote models, and feed errors.

mod market_data_errors;
mod market_data_model;
mod market_data_traits;

pub use market_data_errors::*;
pub use market_data_model::*;
pub use market_data_traits::*;
