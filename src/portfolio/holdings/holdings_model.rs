use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::DISPLAY_DECIMAL_PRECISION;

/// One equity position owned by a user. Mutated only through the trade path;
/// deleted when quantity reaches zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: String,
    pub user_id: String,
    pub symbol: String,
    /// Whole number of shares, kept as Decimal for money math.
    pub quantity: Decimal,
    /// Volume-weighted average cost of the current quantity.
    pub average_cost: Decimal,
    pub sector: Option<String>,
    pub purchase_date: DateTime<Utc>,
}

impl Holding {
    pub fn open(user_id: &str, symbol: &str, quantity: Decimal, price: Decimal) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            symbol: symbol.to_string(),
            quantity,
            average_cost: price.round_dp(DISPLAY_DECIMAL_PRECISION),
            sector: None,
            purchase_date: Utc::now(),
        }
    }

    /// Folds a buy lot into the position: quantity grows, average cost becomes
    /// the volume-weighted average of the old position and the new lot.
    pub fn apply_buy(&mut self, quantity: Decimal, price: Decimal) {
        let old_cost = self.quantity * self.average_cost;
        let lot_cost = quantity * price;
        let new_quantity = self.quantity + quantity;
        self.average_cost = ((old_cost + lot_cost) / new_quantity).round_dp(DISPLAY_DECIMAL_PRECISION);
        self.quantity = new_quantity;
    }

    /// Removes shares from the position; average cost is unchanged.
    /// Callers must have validated `quantity <= self.quantity`.
    pub fn apply_sell(&mut self, quantity: Decimal) {
        self.quantity -= quantity;
    }
}

/// Per-user cash and cost-basis summary, created lazily on the first deposit
/// or trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub user_id: String,
    pub cash_balance: Decimal,
    pub total_invested: Decimal,
}

impl PortfolioSummary {
    pub fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            cash_balance: Decimal::ZERO,
            total_invested: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// A priced, validated trade handed to the repository for atomic commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeFill {
    pub symbol: String,
    pub side: TradeSide,
    pub quantity: Decimal,
    pub price: Decimal,
}

impl TradeFill {
    /// Total cash moved by the fill, rounded to display precision.
    pub fn gross_amount(&self) -> Decimal {
        (self.quantity * self.price).round_dp(DISPLAY_DECIMAL_PRECISION)
    }
}
