//! Bars extended with derived statistics.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{PriceBar, SeriesOrigin};

/// Window of the short moving average.
pub const SHORT_MA_PERIOD: usize = 5;
/// Window of the long moving average.
pub const LONG_MA_PERIOD: usize = 25;

/// A price bar with its daily return and moving averages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedBar {
    /// Source bar
    #[serde(flatten)]
    pub bar: PriceBar,
    /// Percent change of close versus the previous close, 2 decimals
    pub return_pct: Option<Decimal>,
    /// 5-bar simple moving average of close
    pub ma5: Option<Decimal>,
    /// 25-bar simple moving average of close
    pub ma25: Option<Decimal>,
}

impl EnrichedBar {
    /// Wrap a bar with no derived values yet.
    pub fn from_bar(bar: PriceBar) -> Self {
        Self {
            bar,
            return_pct: None,
            ma5: None,
            ma25: None,
        }
    }
}

/// Enriched bars for one symbol, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedSeries {
    /// Ticker symbol
    pub symbol: String,
    /// Trading currency, when known
    pub currency: Option<String>,
    /// Where the underlying bars came from
    pub origin: SeriesOrigin,
    /// Enriched bars, most recent last
    pub bars: Vec<EnrichedBar>,
}

impl EnrichedSeries {
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

    /// True when no bar carries any price or volume.
    pub fn has_no_data(&self) -> bool {
        self.bars.iter().all(|b| b.bar.is_empty())
    }

    /// Get an iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &EnrichedBar> {
        self.bars.iter()
    }
}
