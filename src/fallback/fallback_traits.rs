use async_trait::async_trait;

use super::fallback_model::{FallbackDecision, FallbackPolicy};
use crate::errors::Result;

#[async_trait]
pub trait FallbackPolicyRepositoryTrait: Send + Sync {
    /// The user's stored policy; the default (hold cash, no safe asset) when
    /// none has been saved.
    fn get_policy(&self, user_id: &str) -> Result<FallbackPolicy>;

    async fn update_policy(&self, user_id: &str, policy: FallbackPolicy) -> Result<FallbackPolicy>;
}

#[async_trait]
pub trait FallbackServiceTrait: Send + Sync {
    fn get_policy(&self, user_id: &str) -> Result<FallbackPolicy>;

    async fn update_policy(&self, user_id: &str, policy: FallbackPolicy) -> Result<FallbackPolicy>;

    /// Decides the corrective action for a breached symbol under the user's
    /// policy. Pure decision; no Holding/Portfolio rows are touched.
    async fn decide(&self, user_id: &str, breached_symbol: &str) -> Result<FallbackDecision>;
}
