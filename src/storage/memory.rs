use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use rust_decimal::Decimal;

use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::errors::Result;
use crate::fallback::{FallbackPolicy, FallbackPolicyRepositoryTrait};
use crate::portfolio::holdings::{
    Holding, HoldingsRepositoryTrait, PortfolioSummary, TradeError, TradeFill, TradeSide,
};
use crate::portfolio::snapshot::{PortfolioSnapshot, SnapshotRepositoryTrait};
use crate::thresholds::{Threshold, ThresholdRepositoryTrait};

#[derive(Debug, Clone)]
struct PortfolioState {
    summary: PortfolioSummary,
    /// Holdings keyed by symbol.
    holdings: HashMap<String, Holding>,
}

impl PortfolioState {
    fn new(user_id: &str) -> Self {
        Self {
            summary: PortfolioSummary::empty(user_id),
            holdings: HashMap::new(),
        }
    }
}

/// Thread-safe in-memory store. Each map entry is mutated under its shard
/// lock, which gives the two guarantees the engine needs: the snapshot
/// upsert is atomic per (user, date) key, and a trade's quantity, average
/// cost, and cash mutations commit as one step or not at all.
#[derive(Default)]
pub struct InMemoryStore {
    portfolios: DashMap<String, PortfolioState>,
    snapshots: DashMap<(String, NaiveDate), Decimal>,
    thresholds: DashMap<(String, String), Threshold>,
    policies: DashMap<String, FallbackPolicy>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HoldingsRepositoryTrait for InMemoryStore {
    fn get_holdings(&self, user_id: &str) -> Result<Vec<Holding>> {
        let mut holdings: Vec<Holding> = self
            .portfolios
            .get(user_id)
            .map(|state| state.holdings.values().cloned().collect())
            .unwrap_or_default();
        holdings.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(holdings)
    }

    fn get_holding(&self, user_id: &str, symbol: &str) -> Result<Option<Holding>> {
        Ok(self
            .portfolios
            .get(user_id)
            .and_then(|state| state.holdings.get(symbol).cloned()))
    }

    fn get_portfolio(&self, user_id: &str) -> Result<Option<PortfolioSummary>> {
        Ok(self.portfolios.get(user_id).map(|state| state.summary.clone()))
    }

    async fn deposit_cash(&self, user_id: &str, amount: Decimal) -> Result<PortfolioSummary> {
        let mut entry = self
            .portfolios
            .entry(user_id.to_string())
            .or_insert_with(|| PortfolioState::new(user_id));
        entry.summary.cash_balance += amount;
        Ok(entry.summary.clone())
    }

    async fn apply_trade(&self, user_id: &str, fill: &TradeFill) -> Result<PortfolioSummary> {
        let mut entry = self
            .portfolios
            .entry(user_id.to_string())
            .or_insert_with(|| PortfolioState::new(user_id));
        let state = entry.value_mut();
        let gross = fill.gross_amount();

        // Validate against current state before touching anything; the entry
        // guard serializes trades for this user.
        match fill.side {
            TradeSide::Buy => {
                if gross > state.summary.cash_balance {
                    return Err(TradeError::InsufficientCash {
                        required: gross,
                        available: state.summary.cash_balance,
                    }
                    .into());
                }
                match state.holdings.get_mut(&fill.symbol) {
                    Some(holding) => holding.apply_buy(fill.quantity, fill.price),
                    None => {
                        state.holdings.insert(
                            fill.symbol.clone(),
                            Holding::open(user_id, &fill.symbol, fill.quantity, fill.price),
                        );
                    }
                }
                state.summary.cash_balance -= gross;
                state.summary.total_invested += gross;
            }
            TradeSide::Sell => {
                let held = state
                    .holdings
                    .get(&fill.symbol)
                    .map(|h| h.quantity)
                    .unwrap_or(Decimal::ZERO);
                if fill.quantity > held {
                    return Err(TradeError::InsufficientShares {
                        symbol: fill.symbol.clone(),
                        held,
                        requested: fill.quantity,
                    }
                    .into());
                }
                let holding = state
                    .holdings
                    .get_mut(&fill.symbol)
                    .expect("validated above");
                let basis =
                    (fill.quantity * holding.average_cost).round_dp(DISPLAY_DECIMAL_PRECISION);
                holding.apply_sell(fill.quantity);
                if holding.quantity == Decimal::ZERO {
                    state.holdings.remove(&fill.symbol);
                }
                state.summary.cash_balance += gross;
                state.summary.total_invested =
                    (state.summary.total_invested - basis).max(Decimal::ZERO);
            }
        }

        Ok(state.summary.clone())
    }
}

#[async_trait]
impl SnapshotRepositoryTrait for InMemoryStore {
    async fn upsert_snapshot(&self, snapshot: &PortfolioSnapshot) -> Result<()> {
        // Insert-or-overwrite on the unique key in one step.
        self.snapshots.insert(
            (snapshot.user_id.clone(), snapshot.date),
            snapshot.total_value,
        );
        Ok(())
    }

    fn get_history(&self, user_id: &str) -> Result<Vec<PortfolioSnapshot>> {
        let mut history: Vec<PortfolioSnapshot> = self
            .snapshots
            .iter()
            .filter(|entry| entry.key().0 == user_id)
            .map(|entry| PortfolioSnapshot {
                user_id: user_id.to_string(),
                date: entry.key().1,
                total_value: *entry.value(),
            })
            .collect();
        history.sort_by_key(|s| s.date);
        Ok(history)
    }

    fn get_latest(&self, user_id: &str) -> Result<Option<PortfolioSnapshot>> {
        Ok(self.get_history(user_id)?.into_iter().last())
    }
}

#[async_trait]
impl ThresholdRepositoryTrait for InMemoryStore {
    fn get_thresholds(&self, user_id: &str) -> Result<Vec<Threshold>> {
        let mut thresholds: Vec<Threshold> = self
            .thresholds
            .iter()
            .filter(|entry| entry.key().0 == user_id)
            .map(|entry| entry.value().clone())
            .collect();
        thresholds.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(thresholds)
    }

    fn get_threshold(&self, user_id: &str, symbol: &str) -> Result<Option<Threshold>> {
        Ok(self
            .thresholds
            .get(&(user_id.to_string(), symbol.to_string()))
            .map(|entry| entry.value().clone()))
    }

    async fn upsert_threshold(&self, threshold: Threshold) -> Result<Threshold> {
        self.thresholds.insert(
            (threshold.user_id.clone(), threshold.symbol.clone()),
            threshold.clone(),
        );
        Ok(threshold)
    }
}

#[async_trait]
impl FallbackPolicyRepositoryTrait for InMemoryStore {
    fn get_policy(&self, user_id: &str) -> Result<FallbackPolicy> {
        Ok(self
            .policies
            .get(user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }

    async fn update_policy(&self, user_id: &str, policy: FallbackPolicy) -> Result<FallbackPolicy> {
        self.policies.insert(user_id.to_string(), policy.clone());
        Ok(policy)
    }
}
