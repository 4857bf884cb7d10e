use thiserror::Error;

/// Errors surfaced by a price-source provider.
///
/// Consumers treat every variant as "this symbol could not be priced right
/// now" and degrade by omission; none of them abort a whole computation.
#[derive(Error, Debug, Clone)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The symbol exists but the provider returned no quotes for the window.
    #[error("No data available for symbol: {0}")]
    NoData(String),

    /// The provider call exceeded its deadline.
    #[error("Price source timed out for symbol: {0}")]
    Timeout(String),

    /// Provider-specific failure (network, parsing, rate limit).
    #[error("Provider error: {0}")]
    Provider(String),
}
