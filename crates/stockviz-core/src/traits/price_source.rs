//! Price source trait definitions.

use crate::error::DataFetchError;
use crate::types::PriceSeries;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Trait for historical daily price sources.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch the trailing daily bars for a symbol.
    ///
    /// # Arguments
    /// * `symbol` - The symbol to fetch
    /// * `lookback` - Number of trading days wanted
    /// * `today` - Last calendar day of the window
    ///
    /// # Returns
    /// Up to `lookback` bars ordered from oldest to newest. Implementations
    /// may return more; the caller keeps the most recent ones.
    async fn daily_bars(
        &self,
        symbol: &str,
        lookback: usize,
        today: NaiveDate,
    ) -> Result<PriceSeries, DataFetchError>;

    /// Get the source name.
    fn name(&self) -> &str;
}
