//! Daily price bars.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::InputError;

/// Number of bars in a report window.
pub const DEFAULT_LOOKBACK_DAYS: usize = 60;

/// One trading day's OHLCV record.
///
/// Every field except the date is nullable: placeholder series carry
/// dates only, and live sources occasionally omit single prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading date
    pub date: NaiveDate,
    /// Opening price
    pub open: Option<Decimal>,
    /// Highest price
    pub high: Option<Decimal>,
    /// Lowest price
    pub low: Option<Decimal>,
    /// Closing price
    pub close: Option<Decimal>,
    /// Traded shares
    pub volume: Option<u64>,
}

impl PriceBar {
    /// Create a bar with every field populated.
    pub fn new(
        date: NaiveDate,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: u64,
    ) -> Self {
        Self {
            date,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            volume: Some(volume),
        }
    }

    /// Create a bar that has a date and nothing else.
    pub fn placeholder(date: NaiveDate) -> Self {
        Self {
            date,
            open: None,
            high: None,
            low: None,
            close: None,
            volume: None,
        }
    }

    /// True when no price or volume is present.
    pub fn is_empty(&self) -> bool {
        self.open.is_none()
            && self.high.is_none()
            && self.low.is_none()
            && self.close.is_none()
            && self.volume.is_none()
    }

    /// All four prices, when every one of them is known.
    pub fn ohlc(&self) -> Option<(Decimal, Decimal, Decimal, Decimal)> {
        Some((self.open?, self.high?, self.low?, self.close?))
    }

    /// Whether the bar closed at or above its open. `None` if either is missing.
    pub fn is_up(&self) -> Option<bool> {
        Some(self.close? >= self.open?)
    }
}

/// How a series was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesOrigin {
    /// Fetched from a market data source
    Live,
    /// Substituted after a failed fetch
    Placeholder,
    /// Loaded from a local file
    File,
}

impl fmt::Display for SeriesOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SeriesOrigin::Live => "live",
            SeriesOrigin::Placeholder => "placeholder",
            SeriesOrigin::File => "file",
        };
        write!(f, "{}", s)
    }
}

/// Ordered daily bars for one symbol, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Ticker symbol
    pub symbol: String,
    /// Trading currency, when the source reports one
    pub currency: Option<String>,
    /// Where the bars came from
    pub origin: SeriesOrigin,
    /// Bars, most recent last
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Create a live series.
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Self {
        Self {
            symbol: symbol.into(),
            currency: None,
            origin: SeriesOrigin::Live,
            bars,
        }
    }

    /// Set the trading currency.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Set the origin.
    pub fn with_origin(mut self, origin: SeriesOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Build `len` empty bars on consecutive calendar days ending at `end`.
    pub fn placeholder(symbol: impl Into<String>, end: NaiveDate, len: usize) -> Self {
        let bars = (0..len)
            .rev()
            .map(|back| PriceBar::placeholder(end - Duration::days(back as i64)))
            .collect();

        Self {
            symbol: symbol.into(),
            currency: None,
            origin: SeriesOrigin::Placeholder,
            bars,
        }
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Extract close prices.
    pub fn closes(&self) -> Vec<Option<Decimal>> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Keep only the last `n` bars.
    pub fn truncate_front(&mut self, n: usize) {
        let excess = self.bars.len().saturating_sub(n);
        self.bars.drain(..excess);
    }

    /// Check that dates are strictly increasing (which also rules out duplicates).
    pub fn validate_dates(&self) -> Result<(), InputError> {
        for (index, pair) in self.bars.windows(2).enumerate() {
            if pair[1].date <= pair[0].date {
                return Err(InputError::NonIncreasingDate {
                    index: index + 1,
                    previous: pair[0].date,
                    current: pair[1].date,
                });
            }
        }
        Ok(())
    }
}
