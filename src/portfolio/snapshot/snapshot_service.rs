use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;

use super::snapshot_model::PortfolioSnapshot;
use super::snapshot_traits::SnapshotRepositoryTrait;
use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::errors::Result;

#[async_trait]
pub trait SnapshotServiceTrait: Send + Sync {
    /// Records the portfolio value for (user, date). Calling it again for the
    /// same day overwrites the earlier sample; there is never a second row.
    async fn record_snapshot(
        &self,
        user_id: &str,
        date: NaiveDate,
        total_value: Decimal,
    ) -> Result<PortfolioSnapshot>;

    /// The user's value history, ascending by date.
    fn history(&self, user_id: &str) -> Result<Vec<PortfolioSnapshot>>;

    fn latest(&self, user_id: &str) -> Result<Option<PortfolioSnapshot>>;
}

pub struct SnapshotService {
    repository: Arc<dyn SnapshotRepositoryTrait>,
}

impl SnapshotService {
    pub fn new(repository: Arc<dyn SnapshotRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl SnapshotServiceTrait for SnapshotService {
    async fn record_snapshot(
        &self,
        user_id: &str,
        date: NaiveDate,
        total_value: Decimal,
    ) -> Result<PortfolioSnapshot> {
        let snapshot = PortfolioSnapshot {
            user_id: user_id.to_string(),
            date,
            total_value: total_value.round_dp(DISPLAY_DECIMAL_PRECISION),
        };
        self.repository.upsert_snapshot(&snapshot).await?;
        debug!(
            "Recorded snapshot for user '{}' on {}: {}",
            user_id, date, snapshot.total_value
        );
        Ok(snapshot)
    }

    fn history(&self, user_id: &str) -> Result<Vec<PortfolioSnapshot>> {
        self.repository.get_history(user_id)
    }

    fn latest(&self, user_id: &str) -> Result<Option<PortfolioSnapshot>> {
        self.repository.get_latest(user_id)
    }
}
