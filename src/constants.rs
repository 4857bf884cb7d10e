use std::time::Duration;

/// Decimal precision for displayed money values
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Sector label used when a holding carries none
pub const UNKNOWN_SECTOR: &str = "Unknown";

/// Switch target used when a fallback policy names no safe asset
pub const DEFAULT_SAFE_ASSET: &str = "SPY";

/// Deadline for a single price-source call
pub const QUOTE_TIMEOUT: Duration = Duration::from_secs(10);

/// Lookback window handed to the price source for trend series
pub const TREND_LOOKBACK_DAYS: u32 = 30;

/// Minimum closes needed to fit a threshold suggestion
pub const MIN_SAMPLES_SUGGESTION: usize = 5;

/// Minimum closes needed to score trend strength
pub const MIN_SAMPLES_STRENGTH: usize = 6;

/// Number of most recent daily returns averaged into a strength score
pub const STRENGTH_RETURN_WINDOW: usize = 14;
