use async_trait::async_trait;
use rust_decimal::Decimal;

use super::holdings_model::{Holding, PortfolioSummary, TradeFill, TradeSide};
use crate::errors::Result;

/// Repository for holdings and the per-user portfolio summary.
///
/// `apply_trade` owns the commit: it re-validates the fill against current
/// state and applies quantity, average cost, and cash mutations atomically,
/// so a rejected trade leaves no partial writes behind.
#[async_trait]
pub trait HoldingsRepositoryTrait: Send + Sync {
    fn get_holdings(&self, user_id: &str) -> Result<Vec<Holding>>;

    fn get_holding(&self, user_id: &str, symbol: &str) -> Result<Option<Holding>>;

    fn get_portfolio(&self, user_id: &str) -> Result<Option<PortfolioSummary>>;

    /// Adds cash to the user's balance, creating the portfolio row lazily.
    async fn deposit_cash(&self, user_id: &str, amount: Decimal) -> Result<PortfolioSummary>;

    /// Validates and commits a priced fill in one atomic step.
    async fn apply_trade(&self, user_id: &str, fill: &TradeFill) -> Result<PortfolioSummary>;
}

#[async_trait]
pub trait HoldingsServiceTrait: Send + Sync {
    fn get_holdings(&self, user_id: &str) -> Result<Vec<Holding>>;

    /// The user's cash/cost summary; an all-zero summary if none exists yet.
    fn get_portfolio(&self, user_id: &str) -> Result<PortfolioSummary>;

    async fn deposit_cash(&self, user_id: &str, amount: Decimal) -> Result<PortfolioSummary>;

    /// Prices a trade against the price source and commits it atomically.
    /// Returns the fill that was applied.
    async fn execute_trade(
        &self,
        user_id: &str,
        symbol: &str,
        side: TradeSide,
        quantity: Decimal,
    ) -> Result<TradeFill>;
}
