//! Fetch-or-placeholder adapter over a price source.

use chrono::{Local, NaiveDate};
use stockviz_core::error::DataFetchError;
use stockviz_core::traits::PriceSource;
use stockviz_core::types::PriceSeries;
use tracing::{info, warn};

/// Result of asking the provider for a series.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The source delivered bars.
    Live(PriceSeries),
    /// The source failed; `series` is an all-empty stand-in.
    Fallback {
        series: PriceSeries,
        cause: DataFetchError,
    },
}

impl FetchOutcome {
    /// Placeholder window of `lookback` days ending at `today`.
    pub fn fallback(symbol: &str, lookback: usize, today: NaiveDate, cause: DataFetchError) -> Self {
        FetchOutcome::Fallback {
            series: PriceSeries::placeholder(symbol, today, lookback),
            cause,
        }
    }

    /// Get the series, live or placeholder.
    pub fn series(&self) -> &PriceSeries {
        match self {
            FetchOutcome::Live(series) => series,
            FetchOutcome::Fallback { series, .. } => series,
        }
    }

    /// Take the series, live or placeholder.
    pub fn into_series(self) -> PriceSeries {
        match self {
            FetchOutcome::Live(series) => series,
            FetchOutcome::Fallback { series, .. } => series,
        }
    }

    /// Check whether the placeholder path was taken.
    pub fn is_fallback(&self) -> bool {
        matches!(self, FetchOutcome::Fallback { .. })
    }

    /// Console warning naming the failure cause, if any.
    pub fn warning(&self) -> Option<String> {
        match self {
            FetchOutcome::Live(_) => None,
            FetchOutcome::Fallback { series, cause } => Some(format!(
                "data fetch for {} failed: {} -> using placeholder data",
                series.symbol, cause
            )),
        }
    }
}

/// Obtains a trailing window of daily bars, substituting placeholder
/// bars when the source fails.
///
/// One attempt per call; there are no retries.
pub struct DataProvider {
    source: Box<dyn PriceSource>,
    lookback: usize,
}

impl DataProvider {
    /// Create a provider returning `lookback` bars per fetch.
    pub fn new(source: Box<dyn PriceSource>, lookback: usize) -> Self {
        Self { source, lookback }
    }

    /// Fetch the window ending today.
    pub async fn fetch(&self, symbol: &str) -> FetchOutcome {
        self.fetch_at(symbol, Local::now().date_naive()).await
    }

    /// Fetch the window ending at `today`.
    pub async fn fetch_at(&self, symbol: &str, today: NaiveDate) -> FetchOutcome {
        match self.try_fetch(symbol, today).await {
            Ok(series) => {
                info!(
                    %symbol,
                    source = self.source.name(),
                    bars = series.len(),
                    "price data loaded"
                );
                FetchOutcome::Live(series)
            }
            Err(cause) => {
                warn!(
                    %symbol,
                    source = self.source.name(),
                    error = %cause,
                    "price fetch failed, substituting placeholder series"
                );
                FetchOutcome::fallback(symbol, self.lookback, today, cause)
            }
        }
    }

    async fn try_fetch(&self, symbol: &str, today: NaiveDate) -> Result<PriceSeries, DataFetchError> {
        if symbol.trim().is_empty() {
            return Err(DataFetchError::InvalidSymbol(symbol.to_string()));
        }

        let mut series = self.source.daily_bars(symbol, self.lookback, today).await?;
        series.bars.retain(|b| !b.is_empty());
        if series.is_empty() {
            return Err(DataFetchError::NoDataAvailable {
                symbol: symbol.to_string(),
            });
        }

        series.truncate_front(self.lookback);
        if series.len() < self.lookback {
            warn!(
                %symbol,
                bars = series.len(),
                wanted = self.lookback,
                "source returned a short window"
            );
        }

        Ok(series)
    }
}
