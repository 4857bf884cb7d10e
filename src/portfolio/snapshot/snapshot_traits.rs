//! Repository trait for portfolio value snapshots.

use async_trait::async_trait;

use super::snapshot_model::PortfolioSnapshot;
use crate::errors::Result;

#[async_trait]
pub trait SnapshotRepositoryTrait: Send + Sync {
    /// Inserts or overwrites the sample for the snapshot's (user, date) key
    /// in one atomic step. Concurrent writers for the same key never produce
    /// two rows; the last write wins.
    async fn upsert_snapshot(&self, snapshot: &PortfolioSnapshot) -> Result<()>;

    /// All samples for a user, ascending by date.
    fn get_history(&self, user_id: &str) -> Result<Vec<PortfolioSnapshot>>;

    /// The most recent sample for a user, if any.
    fn get_latest(&self, user_id: &str) -> Result<Option<PortfolioSnapshot>>;
}
