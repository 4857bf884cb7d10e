use rust_decimal::Decimal;
use thiserror::Error;

/// Trade validation failures. A trade that raises any of these is rejected
/// before any quantity, cost, or cash mutation is applied.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TradeError {
    #[error("Insufficient shares of {symbol}: held {held}, requested {requested}")]
    InsufficientShares {
        symbol: String,
        held: Decimal,
        requested: Decimal,
    },

    #[error("Insufficient cash: trade costs {required}, balance is {available}")]
    InsufficientCash {
        required: Decimal,
        available: Decimal,
    },

    #[error("Trade quantity must be a positive whole number of shares, got {0}")]
    InvalidQuantity(Decimal),

    #[error("Cash amount must be positive, got {0}")]
    InvalidAmount(Decimal),
}
