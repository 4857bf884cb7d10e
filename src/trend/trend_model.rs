use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of a trend computation. Too little history is a first-class
/// variant, not a null or a zero, so callers cannot mistake "no data" for
/// "worst score".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum TrendEstimate {
    Value { value: Decimal },
    InsufficientData { samples: usize, required: usize },
}

impl TrendEstimate {
    pub fn value(value: Decimal) -> Self {
        TrendEstimate::Value { value }
    }

    pub fn insufficient(samples: usize, required: usize) -> Self {
        TrendEstimate::InsufficientData { samples, required }
    }

    /// The computed value, if there was enough history.
    pub fn as_value(&self) -> Option<Decimal> {
        match self {
            TrendEstimate::Value { value } => Some(*value),
            TrendEstimate::InsufficientData { .. } => None,
        }
    }
}
