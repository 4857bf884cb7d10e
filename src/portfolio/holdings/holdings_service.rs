use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use rust_decimal::Decimal;

use super::holdings_errors::TradeError;
use super::holdings_model::{Holding, PortfolioSummary, TradeFill, TradeSide};
use super::holdings_traits::{HoldingsRepositoryTrait, HoldingsServiceTrait};
use crate::errors::Result;
use crate::market_data::MarketDataProviderTrait;

pub struct HoldingsService {
    provider: Arc<dyn MarketDataProviderTrait>,
    repository: Arc<dyn HoldingsRepositoryTrait>,
}

impl HoldingsService {
    pub fn new(
        provider: Arc<dyn MarketDataProviderTrait>,
        repository: Arc<dyn HoldingsRepositoryTrait>,
    ) -> Self {
        Self {
            provider,
            repository,
        }
    }
}

#[async_trait]
impl HoldingsServiceTrait for HoldingsService {
    fn get_holdings(&self, user_id: &str) -> Result<Vec<Holding>> {
        self.repository.get_holdings(user_id)
    }

    fn get_portfolio(&self, user_id: &str) -> Result<PortfolioSummary> {
        Ok(self
            .repository
            .get_portfolio(user_id)?
            .unwrap_or_else(|| PortfolioSummary::empty(user_id)))
    }

    async fn deposit_cash(&self, user_id: &str, amount: Decimal) -> Result<PortfolioSummary> {
        if amount <= Decimal::ZERO {
            return Err(TradeError::InvalidAmount(amount).into());
        }
        self.repository.deposit_cash(user_id, amount).await
    }

    async fn execute_trade(
        &self,
        user_id: &str,
        symbol: &str,
        side: TradeSide,
        quantity: Decimal,
    ) -> Result<TradeFill> {
        if quantity <= Decimal::ZERO || quantity.fract() != Decimal::ZERO {
            return Err(TradeError::InvalidQuantity(quantity).into());
        }

        let symbol = symbol.trim().to_uppercase();

        // A trade cannot be applied without a price, so a failed feed aborts
        // here, before any mutation.
        let price = self.provider.latest_price_bounded(&symbol).await?;

        let fill = TradeFill {
            symbol,
            side,
            quantity,
            price,
        };

        let summary = self.repository.apply_trade(user_id, &fill).await?;
        debug!(
            "Committed {:?} {} x {} @ {} for user '{}'; cash balance now {}",
            fill.side, fill.quantity, fill.symbol, fill.price, user_id, summary.cash_balance
        );

        Ok(fill)
    }
}
