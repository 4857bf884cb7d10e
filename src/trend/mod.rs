//! Trend model - threshold suggestion and strength scoring over price series.

mod trend_model;
mod trend_service;

pub use trend_model::*;
pub use trend_service::*;
