use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use log::{debug, warn};
use rust_decimal::Decimal;

use super::valuation_model::{PortfolioValuation, PositionValuation};
use crate::constants::{DISPLAY_DECIMAL_PRECISION, UNKNOWN_SECTOR};
use crate::errors::Result;
use crate::market_data::MarketDataProviderTrait;
use crate::portfolio::holdings::{Holding, HoldingsRepositoryTrait, PortfolioSummary};

#[async_trait]
pub trait ValuationServiceTrait: Send + Sync {
    /// Marks the user's portfolio to market: cash plus every holding priced
    /// via the price source. A holding whose feed fails is reported unpriced
    /// and excluded from the totals; it never aborts the valuation.
    async fn value_portfolio(&self, user_id: &str) -> Result<PortfolioValuation>;
}

pub struct ValuationService {
    provider: Arc<dyn MarketDataProviderTrait>,
    holdings_repository: Arc<dyn HoldingsRepositoryTrait>,
}

impl ValuationService {
    pub fn new(
        provider: Arc<dyn MarketDataProviderTrait>,
        holdings_repository: Arc<dyn HoldingsRepositoryTrait>,
    ) -> Self {
        Self {
            provider,
            holdings_repository,
        }
    }

    fn value_position(holding: &Holding, price: Option<Decimal>) -> PositionValuation {
        let market_value = price
            .map(|p| (p * holding.quantity).round_dp(DISPLAY_DECIMAL_PRECISION));
        PositionValuation {
            symbol: holding.symbol.clone(),
            quantity: holding.quantity,
            sector: holding
                .sector
                .clone()
                .unwrap_or_else(|| UNKNOWN_SECTOR.to_string()),
            price: price.map(|p| p.round_dp(DISPLAY_DECIMAL_PRECISION)),
            market_value,
        }
    }
}

#[async_trait]
impl ValuationServiceTrait for ValuationService {
    async fn value_portfolio(&self, user_id: &str) -> Result<PortfolioValuation> {
        let holdings = self.holdings_repository.get_holdings(user_id)?;
        let summary = self
            .holdings_repository
            .get_portfolio(user_id)?
            .unwrap_or_else(|| PortfolioSummary::empty(user_id));
        debug!(
            "Valuing portfolio for user '{}' ({} holdings)",
            user_id,
            holdings.len()
        );

        // Independent lookups: fan out and join, one bad feed only drops
        // its own position.
        let lookups = holdings
            .iter()
            .map(|h| self.provider.latest_price_bounded(&h.symbol));
        let prices = join_all(lookups).await;

        let mut positions = Vec::with_capacity(holdings.len());
        let mut sector_allocation: HashMap<String, Decimal> = HashMap::new();
        let mut holdings_value = Decimal::ZERO;

        for (holding, price_result) in holdings.iter().zip(prices) {
            let price = match price_result {
                Ok(price) => Some(price),
                Err(e) => {
                    warn!(
                        "Price unavailable for {} (user '{}'): {}. Reporting position unpriced.",
                        holding.symbol, user_id, e
                    );
                    None
                }
            };

            let position = Self::value_position(holding, price);
            if let Some(value) = position.market_value {
                holdings_value += value;
                *sector_allocation
                    .entry(position.sector.clone())
                    .or_insert(Decimal::ZERO) += value;
            }
            positions.push(position);
        }

        let total_value =
            (summary.cash_balance + holdings_value).round_dp(DISPLAY_DECIMAL_PRECISION);

        Ok(PortfolioValuation {
            user_id: user_id.to_string(),
            as_of: Utc::now().date_naive(),
            cash_balance: summary.cash_balance,
            total_value,
            positions,
            sector_allocation,
        })
    }
}
