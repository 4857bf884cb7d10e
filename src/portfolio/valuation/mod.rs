//! Live portfolio valuation - cash plus mark-to-market holdings.

mod valuation_model;
mod valuation_service;

pub use valuation_model::*;
pub use valuation_service::*;
