use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One holding marked to market. `price`/`market_value` are `None` when the
/// price source could not price the symbol; such positions are reported but
/// excluded from totals and sector sums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionValuation {
    pub symbol: String,
    pub quantity: Decimal,
    pub sector: String,
    pub price: Option<Decimal>,
    pub market_value: Option<Decimal>,
}

impl PositionValuation {
    pub fn is_priced(&self) -> bool {
        self.market_value.is_some()
    }
}

/// Full valuation of one user's portfolio at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValuation {
    pub user_id: String,
    pub as_of: NaiveDate,
    pub cash_balance: Decimal,
    /// Cash plus the market value of every priced position, 2dp.
    pub total_value: Decimal,
    pub positions: Vec<PositionValuation>,
    /// Priced market value aggregated by sector label.
    pub sector_allocation: HashMap<String, Decimal>,
}
