use async_trait::async_trait;

use rust_decimal::Decimal;

use super::market_data_errors::MarketDataError;
use super::market_data_model::DailyClose;
use crate::constants::QUOTE_TIMEOUT;

/// External price source. Implementations wrap a concrete feed (HTTP API,
/// cached store, test fixture); the engine only depends on this trait.
#[async_trait]
pub trait MarketDataProviderTrait: Send + Sync {
    /// Latest traded price for a symbol.
    async fn latest_price(&self, symbol: &str) -> Result<Decimal, MarketDataError>;

    /// Daily closes for the last `lookback_days` calendar days, ascending by date.
    async fn historical_closes(
        &self,
        symbol: &str,
        lookback_days: u32,
    ) -> Result<Vec<DailyClose>, MarketDataError>;

    /// [`latest_price`](Self::latest_price) bounded by [`QUOTE_TIMEOUT`].
    /// Expiry is reported as [`MarketDataError::Timeout`].
    async fn latest_price_bounded(&self, symbol: &str) -> Result<Decimal, MarketDataError> {
        tokio::time::timeout(QUOTE_TIMEOUT, self.latest_price(symbol))
            .await
            .map_err(|_| MarketDataError::Timeout(symbol.to_string()))?
    }

    /// [`historical_closes`](Self::historical_closes) bounded by [`QUOTE_TIMEOUT`].
    async fn historical_closes_bounded(
        &self,
        symbol: &str,
        lookback_days: u32,
    ) -> Result<Vec<DailyClose>, MarketDataError> {
        tokio::time::timeout(QUOTE_TIMEOUT, self.historical_closes(symbol, lookback_days))
            .await
            .map_err(|_| MarketDataError::Timeout(symbol.to_string()))?
    }
}
