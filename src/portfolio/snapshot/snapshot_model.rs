use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One persisted (user, date, total value) sample of the portfolio's value
/// history. Uniqueness on (user, date) is enforced by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub user_id: String,
    pub date: NaiveDate,
    pub total_value: Decimal,
}
