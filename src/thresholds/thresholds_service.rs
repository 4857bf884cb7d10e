use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, warn};
use rust_decimal::Decimal;

use super::thresholds_model::{Breach, Threshold};
use super::thresholds_traits::{ThresholdRepositoryTrait, ThresholdServiceTrait};
use crate::errors::{Error, Result, ValidationError};
use crate::market_data::MarketDataProviderTrait;

pub struct ThresholdService {
    provider: Arc<dyn MarketDataProviderTrait>,
    repository: Arc<dyn ThresholdRepositoryTrait>,
}

impl ThresholdService {
    pub fn new(
        provider: Arc<dyn MarketDataProviderTrait>,
        repository: Arc<dyn ThresholdRepositoryTrait>,
    ) -> Self {
        Self {
            provider,
            repository,
        }
    }
}

#[async_trait]
impl ThresholdServiceTrait for ThresholdService {
    fn get_thresholds(&self, user_id: &str) -> Result<Vec<Threshold>> {
        self.repository.get_thresholds(user_id)
    }

    async fn set_threshold(
        &self,
        user_id: &str,
        symbol: &str,
        min_price: Decimal,
    ) -> Result<Threshold> {
        if min_price <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Threshold price must be positive, got {}",
                min_price
            ))));
        }
        let symbol = symbol.trim().to_uppercase();
        let enabled = self
            .repository
            .get_threshold(user_id, &symbol)?
            .map(|t| t.alert_enabled)
            .unwrap_or(true);
        self.repository
            .upsert_threshold(Threshold {
                user_id: user_id.to_string(),
                symbol,
                min_price,
                alert_enabled: enabled,
            })
            .await
    }

    async fn set_alert_enabled(
        &self,
        user_id: &str,
        symbol: &str,
        enabled: bool,
    ) -> Result<Threshold> {
        let symbol = symbol.trim().to_uppercase();
        let mut threshold = self
            .repository
            .get_threshold(user_id, &symbol)?
            .ok_or_else(|| Error::NotFound(format!("No threshold for symbol {}", symbol)))?;
        threshold.alert_enabled = enabled;
        self.repository.upsert_threshold(threshold).await
    }

    async fn check_breaches(&self, user_id: &str) -> Result<Vec<Breach>> {
        let enabled: Vec<Threshold> = self
            .repository
            .get_thresholds(user_id)?
            .into_iter()
            .filter(|t| t.alert_enabled)
            .collect();
        debug!(
            "Checking {} enabled thresholds for user '{}'",
            enabled.len(),
            user_id
        );

        let lookups = enabled
            .iter()
            .map(|t| self.provider.latest_price_bounded(&t.symbol));
        let prices = join_all(lookups).await;

        let mut breaches = Vec::new();
        for (threshold, price_result) in enabled.iter().zip(prices) {
            match price_result {
                Ok(last_price) if last_price < threshold.min_price => {
                    breaches.push(Breach {
                        symbol: threshold.symbol.clone(),
                        min_price: threshold.min_price,
                        last_price,
                    });
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(
                        "Price unavailable for {} (user '{}'): {}. Skipping breach check.",
                        threshold.symbol, user_id, e
                    );
                }
            }
        }

        Ok(breaches)
    }
}
