//! Per-symbol price floors and breach detection.

mod thresholds_model;
mod thresholds_service;
mod thresholds_traits;

pub use thresholds_model::*;
pub use thresholds_service::*;
pub use thresholds_traits::*;
