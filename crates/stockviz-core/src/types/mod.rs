//! Core data types for the price report.

mod bar;
mod enriched;

pub use bar::{PriceBar, PriceSeries, SeriesOrigin, DEFAULT_LOOKBACK_DAYS};
pub use enriched::{EnrichedBar, EnrichedSeries, LONG_MA_PERIOD, SHORT_MA_PERIOD};
