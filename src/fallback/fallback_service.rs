use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use log::debug;
use rust_decimal::Decimal;

use super::fallback_model::{FallbackDecision, FallbackPolicy, FallbackStrategy};
use super::fallback_traits::{FallbackPolicyRepositoryTrait, FallbackServiceTrait};
use crate::errors::Result;
use crate::portfolio::holdings::HoldingsRepositoryTrait;
use crate::trend::TrendServiceTrait;

pub struct FallbackService {
    policy_repository: Arc<dyn FallbackPolicyRepositoryTrait>,
    holdings_repository: Arc<dyn HoldingsRepositoryTrait>,
    trend_service: Arc<dyn TrendServiceTrait>,
}

impl FallbackService {
    pub fn new(
        policy_repository: Arc<dyn FallbackPolicyRepositoryTrait>,
        holdings_repository: Arc<dyn HoldingsRepositoryTrait>,
        trend_service: Arc<dyn TrendServiceTrait>,
    ) -> Self {
        Self {
            policy_repository,
            holdings_repository,
            trend_service,
        }
    }

    /// Ranks every other held symbol by trend strength. Symbols without a
    /// score (short history, dead feed) are excluded, not ranked last. A tie
    /// at the top or an empty field yields no winner.
    async fn best_candidate(&self, user_id: &str, breached_symbol: &str) -> Result<Option<String>> {
        let breached = breached_symbol.to_uppercase();
        let mut candidates: Vec<String> = self
            .holdings_repository
            .get_holdings(user_id)?
            .into_iter()
            .map(|h| h.symbol.to_uppercase())
            .filter(|s| *s != breached)
            .collect();
        candidates.sort();
        candidates.dedup();

        let scores = join_all(
            candidates
                .iter()
                .map(|symbol| self.trend_service.trend_strength(symbol)),
        )
        .await;

        let mut scored: Vec<(String, Decimal)> = Vec::new();
        for (symbol, estimate) in candidates.into_iter().zip(scores) {
            match estimate?.as_value() {
                Some(score) => scored.push((symbol, score)),
                None => debug!(
                    "Excluding {} from switch candidates: insufficient history",
                    symbol
                ),
            }
        }

        let top = match scored.iter().map(|(_, score)| *score).max() {
            Some(top) => top,
            None => return Ok(None),
        };
        let mut leaders = scored.into_iter().filter(|(_, score)| *score == top);
        let leader = leaders.next().map(|(symbol, _)| symbol);
        if leaders.next().is_some() {
            // Tied at the top: no single best asset.
            return Ok(None);
        }
        Ok(leader)
    }
}

#[async_trait]
impl FallbackServiceTrait for FallbackService {
    fn get_policy(&self, user_id: &str) -> Result<FallbackPolicy> {
        self.policy_repository.get_policy(user_id)
    }

    async fn update_policy(
        &self,
        user_id: &str,
        policy: FallbackPolicy,
    ) -> Result<FallbackPolicy> {
        self.policy_repository.update_policy(user_id, policy).await
    }

    async fn decide(&self, user_id: &str, breached_symbol: &str) -> Result<FallbackDecision> {
        let policy = self.policy_repository.get_policy(user_id)?;

        let decision = match policy.strategy {
            FallbackStrategy::HoldCash => FallbackDecision::Liquidate,
            FallbackStrategy::SwitchSafe => FallbackDecision::Switch {
                target: policy.safe_target(),
            },
            FallbackStrategy::SwitchBest => {
                match self.best_candidate(user_id, breached_symbol).await? {
                    Some(target) => FallbackDecision::Switch { target },
                    // Nothing rankable: fall back to the safe asset, even if
                    // that asset itself was never priced here.
                    None => FallbackDecision::Switch {
                        target: policy.safe_target(),
                    },
                }
            }
        };

        debug!(
            "Fallback decision for user '{}' after {} breach: {:?}",
            user_id, breached_symbol, decision
        );
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::holdings::{Holding, PortfolioSummary, TradeFill};
    use crate::storage::InMemoryStore;
    use crate::trend::TrendEstimate;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    struct MockTrendService {
        strengths: HashMap<String, TrendEstimate>,
    }

    impl MockTrendService {
        fn new(strengths: &[(&str, TrendEstimate)]) -> Self {
            Self {
                strengths: strengths
                    .iter()
                    .map(|(s, e)| (s.to_string(), e.clone()))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl TrendServiceTrait for MockTrendService {
        async fn suggest_threshold(&self, _: &str) -> Result<TrendEstimate> {
            unimplemented!()
        }

        async fn trend_strength(&self, symbol: &str) -> Result<TrendEstimate> {
            Ok(self
                .strengths
                .get(symbol)
                .cloned()
                .unwrap_or(TrendEstimate::insufficient(0, 6)))
        }
    }

    struct MockHoldingsRepository {
        symbols: Vec<String>,
    }

    #[async_trait]
    impl HoldingsRepositoryTrait for MockHoldingsRepository {
        fn get_holdings(&self, user_id: &str) -> Result<Vec<Holding>> {
            Ok(self
                .symbols
                .iter()
                .map(|s| Holding::open(user_id, s, dec!(1), dec!(100)))
                .collect())
        }
        fn get_holding(&self, _: &str, _: &str) -> Result<Option<Holding>> {
            unimplemented!()
        }
        fn get_portfolio(&self, _: &str) -> Result<Option<PortfolioSummary>> {
            unimplemented!()
        }
        async fn deposit_cash(&self, _: &str, _: Decimal) -> Result<PortfolioSummary> {
            unimplemented!()
        }
        async fn apply_trade(&self, _: &str, _: &TradeFill) -> Result<PortfolioSummary> {
            unimplemented!()
        }
    }

    async fn make_service(
        policy: FallbackPolicy,
        held: &[&str],
        strengths: &[(&str, TrendEstimate)],
    ) -> FallbackService {
        let store = Arc::new(InMemoryStore::new());
        store.update_policy("u1", policy).await.unwrap();
        FallbackService::new(
            store,
            Arc::new(MockHoldingsRepository {
                symbols: held.iter().map(|s| s.to_string()).collect(),
            }),
            Arc::new(MockTrendService::new(strengths)),
        )
    }

    fn policy(strategy: FallbackStrategy, safe_asset: Option<&str>) -> FallbackPolicy {
        FallbackPolicy {
            strategy,
            safe_asset: safe_asset.map(|s| s.to_string()),
        }
    }

    #[tokio::test]
    async fn hold_cash_liquidates() {
        let service = make_service(policy(FallbackStrategy::HoldCash, None), &["AAPL"], &[]).await;
        let decision = service.decide("u1", "AAPL").await.unwrap();
        assert_eq!(decision, FallbackDecision::Liquidate);
    }

    #[tokio::test]
    async fn unconfigured_user_defaults_to_liquidate() {
        let service = FallbackService::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(MockHoldingsRepository { symbols: vec![] }),
            Arc::new(MockTrendService::new(&[])),
        );
        let decision = service.decide("nobody", "AAPL").await.unwrap();
        assert_eq!(decision, FallbackDecision::Liquidate);
    }

    #[tokio::test]
    async fn switch_safe_uses_configured_asset() {
        let service =
            make_service(policy(FallbackStrategy::SwitchSafe, Some("bnd")), &["AAPL"], &[]).await;
        let decision = service.decide("u1", "AAPL").await.unwrap();
        assert_eq!(
            decision,
            FallbackDecision::Switch {
                target: "BND".to_string()
            }
        );
    }

    #[tokio::test]
    async fn switch_safe_defaults_to_spy() {
        let service = make_service(policy(FallbackStrategy::SwitchSafe, None), &["AAPL"], &[]).await;
        let decision = service.decide("u1", "AAPL").await.unwrap();
        assert_eq!(
            decision,
            FallbackDecision::Switch {
                target: "SPY".to_string()
            }
        );
    }

    #[tokio::test]
    async fn switch_best_picks_strongest_other_holding() {
        // AAPL breached; MSFT scores 0.01 vs GOOGL 0.02.
        let service = make_service(
            policy(FallbackStrategy::SwitchBest, None),
            &["AAPL", "MSFT", "GOOGL"],
            &[
                ("MSFT", TrendEstimate::value(dec!(0.01))),
                ("GOOGL", TrendEstimate::value(dec!(0.02))),
            ],
        )
        .await;
        let decision = service.decide("u1", "AAPL").await.unwrap();
        assert_eq!(
            decision,
            FallbackDecision::Switch {
                target: "GOOGL".to_string()
            }
        );
    }

    #[tokio::test]
    async fn switch_best_never_picks_the_breached_symbol() {
        // The breached symbol scores highest but is not a candidate.
        let service = make_service(
            policy(FallbackStrategy::SwitchBest, None),
            &["AAPL", "MSFT"],
            &[
                ("AAPL", TrendEstimate::value(dec!(0.99))),
                ("MSFT", TrendEstimate::value(dec!(0.01))),
            ],
        )
        .await;
        let decision = service.decide("u1", "aapl").await.unwrap();
        assert_eq!(
            decision,
            FallbackDecision::Switch {
                target: "MSFT".to_string()
            }
        );
    }

    #[tokio::test]
    async fn switch_best_excludes_unscoreable_candidates() {
        let service = make_service(
            policy(FallbackStrategy::SwitchBest, None),
            &["AAPL", "SHORTHIST", "MSFT"],
            &[
                ("SHORTHIST", TrendEstimate::insufficient(3, 6)),
                ("MSFT", TrendEstimate::value(dec!(-0.05))),
            ],
        )
        .await;
        // A negative score still beats "no score".
        let decision = service.decide("u1", "AAPL").await.unwrap();
        assert_eq!(
            decision,
            FallbackDecision::Switch {
                target: "MSFT".to_string()
            }
        );
    }

    #[tokio::test]
    async fn switch_best_with_no_scoreable_candidates_falls_back_safe() {
        let service = make_service(
            policy(FallbackStrategy::SwitchBest, Some("BND")),
            &["AAPL", "SHORTHIST"],
            &[("SHORTHIST", TrendEstimate::insufficient(2, 6))],
        )
        .await;
        let decision = service.decide("u1", "AAPL").await.unwrap();
        assert_eq!(
            decision,
            FallbackDecision::Switch {
                target: "BND".to_string()
            }
        );
    }

    #[tokio::test]
    async fn switch_best_tie_falls_back_safe() {
        let service = make_service(
            policy(FallbackStrategy::SwitchBest, None),
            &["AAPL", "MSFT", "GOOGL"],
            &[
                ("MSFT", TrendEstimate::value(dec!(0.02))),
                ("GOOGL", TrendEstimate::value(dec!(0.02))),
            ],
        )
        .await;
        let decision = service.decide("u1", "AAPL").await.unwrap();
        assert_eq!(
            decision,
            FallbackDecision::Switch {
                target: "SPY".to_string()
            }
        );
    }

    #[tokio::test]
    async fn switch_best_with_empty_portfolio_falls_back_safe() {
        let service =
            make_service(policy(FallbackStrategy::SwitchBest, None), &["AAPL"], &[]).await;
        let decision = service.decide("u1", "AAPL").await.unwrap();
        assert_eq!(
            decision,
            FallbackDecision::Switch {
                target: "SPY".to_string()
            }
        );
    }
}
