//! Fallback policy and the breach -> action decision engine.

mod fallback_model;
mod fallback_service;
mod fallback_traits;

pub use fallback_model::*;
pub use fallback_service::*;
pub use fallback_traits::*;
