use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A user-defined price floor for one symbol. At most one row exists per
/// (user, symbol); saving again overwrites. Absence of a row means no floor
/// is configured for that symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Threshold {
    pub user_id: String,
    pub symbol: String,
    pub min_price: Decimal,
    /// Disabled floors are kept in storage but skipped by the breach scan.
    pub alert_enabled: bool,
}

/// An enabled floor whose symbol last traded below it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breach {
    pub symbol: String,
    pub min_price: Decimal,
    pub last_price: Decimal,
}
