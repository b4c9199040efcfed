//! Chart views derived from an enriched series.
//!
//! The chart places bars on an integer axis so trading days are evenly
//! spaced regardless of weekends and holidays; dates only come back as
//! tick labels.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt::Write;
use stockviz_core::error::{ProcessingError, ProcessingResult};
use stockviz_core::types::{EnrichedSeries, SeriesOrigin};

/// Default spacing between date ticks.
pub const DEFAULT_TICK_STRIDE: usize = 2;

/// Default tick label format.
pub const DEFAULT_LABEL_FORMAT: &str = "%Y-%m-%d";

/// One candlestick at an integer position.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub index: usize,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    /// Closed at or above the open.
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}

/// Volume of one bar at an integer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeBar {
    pub index: usize,
    pub volume: u64,
}

/// Everything the chart renderer needs, in plain numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartViews {
    /// Upper panel title
    pub title: String,
    /// Y-axis label of the price panel
    pub price_label: String,
    /// Number of positions on the shared x axis
    pub len: usize,
    /// Bars with all four prices present
    pub candles: Vec<Candle>,
    /// (index, close) where close is present
    pub close: Vec<(f64, f64)>,
    /// (index, MA5) where defined
    pub ma5: Vec<(f64, f64)>,
    /// (index, MA25) where defined
    pub ma25: Vec<(f64, f64)>,
    /// Bars with a known volume
    pub volume: Vec<VolumeBar>,
    /// (index, label) every `tick_stride` bars
    pub ticks: Vec<(usize, String)>,
}

fn to_f64(value: Decimal) -> Option<f64> {
    value.to_f64()
}

fn line(series: &EnrichedSeries, pick: impl Fn(usize) -> Option<Decimal>) -> Vec<(f64, f64)> {
    (0..series.len())
        .filter_map(|i| pick(i).and_then(to_f64).map(|v| (i as f64, v)))
        .collect()
}

impl ChartViews {
    /// Shape `series` for the chart.
    ///
    /// Fails with `ProcessingError::Render` when `label_format` cannot
    /// format a date (unknown specifiers, time or zone fields).
    pub fn from_series(
        series: &EnrichedSeries,
        tick_stride: usize,
        label_format: &str,
    ) -> ProcessingResult<Self> {
        let bars = &series.bars;

        let candles = bars
            .iter()
            .enumerate()
            .filter_map(|(index, row)| {
                let (open, high, low, close) = row.bar.ohlc()?;
                Some(Candle {
                    index,
                    open: to_f64(open)?,
                    high: to_f64(high)?,
                    low: to_f64(low)?,
                    close: to_f64(close)?,
                })
            })
            .collect();

        let volume = bars
            .iter()
            .enumerate()
            .filter_map(|(index, row)| row.bar.volume.map(|volume| VolumeBar { index, volume }))
            .collect();

        let mut ticks = Vec::new();
        for (index, row) in bars.iter().enumerate().step_by(tick_stride.max(1)) {
            let mut label = String::new();
            write!(label, "{}", row.bar.date.format(label_format)).map_err(|_| {
                ProcessingError::Render(format!("invalid date label format: {:?}", label_format))
            })?;
            ticks.push((index, label));
        }

        let mut title = format!("{} Stock Price & Moving Averages", series.symbol);
        if series.origin == SeriesOrigin::Placeholder {
            title.push_str(" [placeholder]");
        }

        let price_label = match &series.currency {
            Some(currency) => format!("Price ({})", currency),
            None => "Price".to_string(),
        };

        Ok(Self {
            title,
            price_label,
            len: bars.len(),
            candles,
            close: line(series, |i| bars[i].bar.close),
            ma5: line(series, |i| bars[i].ma5),
            ma25: line(series, |i| bars[i].ma25),
            volume,
            ticks,
        })
    }

    /// Lowest and highest value across candles and lines.
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        let lows = self.candles.iter().map(|c| c.low);
        let highs = self.candles.iter().map(|c| c.high);
        let points = self
            .close
            .iter()
            .chain(self.ma5.iter())
            .chain(self.ma25.iter())
            .map(|&(_, v)| v);

        let values: Vec<f64> = lows.chain(highs).chain(points).collect();
        if values.is_empty() {
            return None;
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }

    /// Largest volume, zero when none is known.
    pub fn max_volume(&self) -> u64 {
        self.volume.iter().map(|v| v.volume).max().unwrap_or(0)
    }
}
