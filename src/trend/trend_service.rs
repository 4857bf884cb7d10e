use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::trend_model::TrendEstimate;
use crate::constants::{
    DISPLAY_DECIMAL_PRECISION, MIN_SAMPLES_STRENGTH, MIN_SAMPLES_SUGGESTION,
    STRENGTH_RETURN_WINDOW, TREND_LOOKBACK_DAYS,
};
use crate::errors::Result;
use crate::market_data::{DailyClose, MarketDataProviderTrait};

/// Probability-of-rise cutoff: above it the floor tightens to 5% below the
/// latest price, below it the suggestion widens to 5% above.
const CONTINUATION_PROB: f64 = 0.6;

const FIT_LEARNING_RATE: f64 = 0.5;
const FIT_ITERATIONS: usize = 800;

#[async_trait]
pub trait TrendServiceTrait: Send + Sync {
    /// Suggests a floor price for a symbol from its recent closes, or reports
    /// insufficient data (fewer than [`MIN_SAMPLES_SUGGESTION`] closes).
    async fn suggest_threshold(&self, symbol: &str) -> Result<TrendEstimate>;

    /// Average recent daily return, used to rank assets. Requires at least
    /// [`MIN_SAMPLES_STRENGTH`] closes. Higher is better.
    async fn trend_strength(&self, symbol: &str) -> Result<TrendEstimate>;
}

pub struct TrendService {
    provider: Arc<dyn MarketDataProviderTrait>,
}

impl TrendService {
    pub fn new(provider: Arc<dyn MarketDataProviderTrait>) -> Self {
        Self { provider }
    }

    /// Fetches the lookback series, mapping every feed failure to an empty
    /// series so callers see "insufficient data" instead of an error.
    async fn fetch_closes(&self, symbol: &str) -> Vec<DailyClose> {
        match self
            .provider
            .historical_closes_bounded(symbol, TREND_LOOKBACK_DAYS)
            .await
        {
            Ok(closes) => closes,
            Err(e) => {
                warn!("History unavailable for {}: {}", symbol, e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl TrendServiceTrait for TrendService {
    async fn suggest_threshold(&self, symbol: &str) -> Result<TrendEstimate> {
        let closes = self.fetch_closes(symbol).await;
        if closes.len() < MIN_SAMPLES_SUGGESTION {
            return Ok(TrendEstimate::insufficient(
                closes.len(),
                MIN_SAMPLES_SUGGESTION,
            ));
        }

        let prices: Vec<f64> = closes.iter().filter_map(|c| c.close.to_f64()).collect();
        let prob_up = match fit_prob_up(&prices) {
            Some(p) => p,
            None => {
                return Ok(TrendEstimate::insufficient(
                    prices.len(),
                    MIN_SAMPLES_SUGGESTION,
                ))
            }
        };

        let last = closes[closes.len() - 1].close;
        let factor = if prob_up > CONTINUATION_PROB {
            // Expect continuation: a tight stop 5% under the latest price.
            dec!(0.95)
        } else {
            // Expect reversal: suggest above the latest price to signal the
            // current level is not to be trusted.
            dec!(1.05)
        };
        let suggested = (last * factor).round_dp(DISPLAY_DECIMAL_PRECISION);
        debug!(
            "Suggested threshold for {}: {} (p_up = {:.3})",
            symbol, suggested, prob_up
        );

        Ok(TrendEstimate::value(suggested))
    }

    async fn trend_strength(&self, symbol: &str) -> Result<TrendEstimate> {
        let closes = self.fetch_closes(symbol).await;
        if closes.len() < MIN_SAMPLES_STRENGTH {
            return Ok(TrendEstimate::insufficient(
                closes.len(),
                MIN_SAMPLES_STRENGTH,
            ));
        }

        // Daily returns; a pair with a non-positive denominator cannot be
        // scored and is dropped rather than poisoning the mean.
        let returns: Vec<Decimal> = closes
            .windows(2)
            .filter(|w| w[0].close > Decimal::ZERO)
            .map(|w| w[1].close / w[0].close - Decimal::ONE)
            .collect();
        if returns.is_empty() {
            return Ok(TrendEstimate::insufficient(
                closes.len(),
                MIN_SAMPLES_STRENGTH,
            ));
        }

        let recent = &returns[returns.len().saturating_sub(STRENGTH_RETURN_WINDOW)..];
        let mean = recent.iter().sum::<Decimal>() / Decimal::from(recent.len() as u64);

        Ok(TrendEstimate::value(mean))
    }
}

/// Fits P(next close > close | prior close) as a one-feature logistic
/// regression: inputs are standardized and the model is trained with
/// fixed-iteration batch gradient descent, which is deterministic. Returns
/// the estimated probability of a rise after the latest close.
fn fit_prob_up(prices: &[f64]) -> Option<f64> {
    if prices.len() < 2 {
        return None;
    }

    let xs = &prices[..prices.len() - 1];
    let ys: Vec<f64> = prices
        .windows(2)
        .map(|w| if w[1] > w[0] { 1.0 } else { 0.0 })
        .collect();

    let n = xs.len() as f64;
    let mean = xs.iter().sum::<f64>() / n;
    let variance = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    let std = if variance > 0.0 { variance.sqrt() } else { 1.0 };
    let zs: Vec<f64> = xs.iter().map(|x| (x - mean) / std).collect();

    let mut weight = 0.0;
    let mut bias = 0.0;
    for _ in 0..FIT_ITERATIONS {
        let mut grad_w = 0.0;
        let mut grad_b = 0.0;
        for (z, y) in zs.iter().zip(&ys) {
            let err = sigmoid(weight * z + bias) - y;
            grad_w += err * z;
            grad_b += err;
        }
        weight -= FIT_LEARNING_RATE * grad_w / n;
        bias -= FIT_LEARNING_RATE * grad_b / n;
    }

    let last = (prices[prices.len() - 1] - mean) / std;
    let prob = sigmoid(weight * last + bias);
    prob.is_finite().then_some(prob)
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::MarketDataError;
    use chrono::NaiveDate;

    struct MockProvider {
        closes: std::result::Result<Vec<Decimal>, MarketDataError>,
    }

    impl MockProvider {
        fn with_closes(closes: &[Decimal]) -> Self {
            Self {
                closes: Ok(closes.to_vec()),
            }
        }

        fn failing() -> Self {
            Self {
                closes: Err(MarketDataError::NoData("XXXX".to_string())),
            }
        }
    }

    #[async_trait]
    impl MarketDataProviderTrait for MockProvider {
        async fn latest_price(&self, _: &str) -> std::result::Result<Decimal, MarketDataError> {
            unimplemented!()
        }

        async fn historical_closes(
            &self,
            _: &str,
            _: u32,
        ) -> std::result::Result<Vec<DailyClose>, MarketDataError> {
            let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
            self.closes.clone().map(|closes| {
                closes
                    .into_iter()
                    .enumerate()
                    .map(|(i, close)| DailyClose::new(start + chrono::Days::new(i as u64), close))
                    .collect()
            })
        }
    }

    fn service(closes: &[Decimal]) -> TrendService {
        TrendService::new(Arc::new(MockProvider::with_closes(closes)))
    }

    #[tokio::test]
    async fn four_closes_is_insufficient_for_suggestion() {
        let s = service(&[dec!(100), dec!(101), dec!(102), dec!(103)]);
        let estimate = s.suggest_threshold("AAPL").await.unwrap();
        assert_eq!(estimate, TrendEstimate::insufficient(4, 5));
    }

    #[tokio::test]
    async fn rising_series_suggests_tight_stop_below_latest() {
        let s = service(&[
            dec!(100),
            dec!(102),
            dec!(104),
            dec!(106),
            dec!(108),
            dec!(110),
            dec!(112),
            dec!(114),
        ]);
        let estimate = s.suggest_threshold("AAPL").await.unwrap();
        // Every label is "up", so p_up > 0.6 and the floor is 5% below 114.
        assert_eq!(estimate.as_value(), Some(dec!(108.30)));
    }

    #[tokio::test]
    async fn falling_series_suggests_above_latest() {
        let s = service(&[
            dec!(114),
            dec!(112),
            dec!(110),
            dec!(108),
            dec!(106),
            dec!(104),
            dec!(102),
            dec!(100),
        ]);
        let estimate = s.suggest_threshold("AAPL").await.unwrap();
        // Every label is "down": the suggestion lands 5% above 100.
        assert_eq!(estimate.as_value(), Some(dec!(105.00)));
    }

    #[tokio::test]
    async fn feed_failure_is_insufficient_data_not_an_error() {
        let s = TrendService::new(Arc::new(MockProvider::failing()));
        assert_eq!(
            s.suggest_threshold("XXXX").await.unwrap(),
            TrendEstimate::insufficient(0, 5)
        );
        assert_eq!(
            s.trend_strength("XXXX").await.unwrap(),
            TrendEstimate::insufficient(0, 6)
        );
    }

    #[tokio::test]
    async fn five_closes_is_insufficient_for_strength() {
        let s = service(&[dec!(1), dec!(2), dec!(3), dec!(4), dec!(5)]);
        let estimate = s.trend_strength("AAPL").await.unwrap();
        assert_eq!(estimate, TrendEstimate::insufficient(5, 6));
    }

    #[tokio::test]
    async fn strength_is_mean_of_daily_returns() {
        // Six closes growing 10% a day: five returns of exactly 0.1.
        let s = service(&[
            dec!(100),
            dec!(110),
            dec!(121),
            dec!(133.1),
            dec!(146.41),
            dec!(161.051),
        ]);
        let estimate = s.trend_strength("AAPL").await.unwrap();
        assert_eq!(estimate.as_value(), Some(dec!(0.1)));
    }

    #[tokio::test]
    async fn strength_averages_only_recent_window() {
        // 20 flat closes then a single 10% jump: 19 returns, only the last
        // 14 are averaged, 13 zeros and one 0.1.
        let mut closes = vec![dec!(100); 20];
        closes.push(dec!(110));
        let s = service(&closes);
        let expected = dec!(0.1) / Decimal::from(14u64);
        assert_eq!(
            s.trend_strength("AAPL").await.unwrap().as_value(),
            Some(expected)
        );
    }

    #[tokio::test]
    async fn zero_close_pairs_are_dropped_from_strength() {
        let s = service(&[
            dec!(100),
            dec!(0),
            dec!(100),
            dec!(110),
            dec!(121),
            dec!(133.1),
        ]);
        // Pairs: 100->0 (r = -1), 0->100 (dropped), then three 10% gains.
        let expected = (dec!(-1) + dec!(0.3)) / Decimal::from(4u64);
        assert_eq!(
            s.trend_strength("AAPL").await.unwrap().as_value(),
            Some(expected)
        );
    }

    #[test]
    fn fit_needs_two_prices() {
        assert!(fit_prob_up(&[100.0]).is_none());
    }

    #[test]
    fn fit_is_confident_on_monotone_series() {
        let up: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        assert!(fit_prob_up(&up).unwrap() > 0.6);

        let down: Vec<f64> = (0..10).map(|i| 100.0 - i as f64).collect();
        assert!(fit_prob_up(&down).unwrap() < 0.4);
    }

    #[test]
    fn fit_handles_constant_series() {
        // Zero variance: labels are all "not up", probability stays low.
        let flat = vec![100.0; 8];
        let p = fit_prob_up(&flat).unwrap();
        assert!(p < 0.5);
    }
}
