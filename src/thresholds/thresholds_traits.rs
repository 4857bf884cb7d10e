use async_trait::async_trait;
use rust_decimal::Decimal;

use super::thresholds_model::{Breach, Threshold};
use crate::errors::Result;

#[async_trait]
pub trait ThresholdRepositoryTrait: Send + Sync {
    fn get_thresholds(&self, user_id: &str) -> Result<Vec<Threshold>>;

    fn get_threshold(&self, user_id: &str, symbol: &str) -> Result<Option<Threshold>>;

    /// Insert-or-update on the (user, symbol) key.
    async fn upsert_threshold(&self, threshold: Threshold) -> Result<Threshold>;
}

#[async_trait]
pub trait ThresholdServiceTrait: Send + Sync {
    fn get_thresholds(&self, user_id: &str) -> Result<Vec<Threshold>>;

    /// Sets (or replaces) the floor for a symbol; newly set floors are enabled.
    async fn set_threshold(
        &self,
        user_id: &str,
        symbol: &str,
        min_price: Decimal,
    ) -> Result<Threshold>;

    /// Flips the alert flag without touching the stored floor.
    async fn set_alert_enabled(
        &self,
        user_id: &str,
        symbol: &str,
        enabled: bool,
    ) -> Result<Threshold>;

    /// Prices every enabled floor and returns those trading below it.
    /// A symbol whose feed fails is skipped, not reported.
    async fn check_breaches(&self, user_id: &str) -> Result<Vec<Breach>>;
}
