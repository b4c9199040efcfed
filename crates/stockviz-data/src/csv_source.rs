//! CSV price source.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use stockviz_core::error::DataFetchError;
use stockviz_core::traits::PriceSource;
use stockviz_core::types::{PriceBar, PriceSeries, SeriesOrigin};

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "\u{feff}Date", alias = "\u{feff}date", alias = "Datetime")]
    date: String,
    #[serde(alias = "Open", default)]
    open: Option<Decimal>,
    #[serde(alias = "High", default)]
    high: Option<Decimal>,
    #[serde(alias = "Low", default)]
    low: Option<Decimal>,
    #[serde(alias = "Close", default)]
    close: Option<Decimal>,
    #[serde(alias = "Volume", default)]
    volume: Option<f64>,
}

/// CSV price source for offline runs.
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    /// Create a new CSV price source.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataFetchError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataFetchError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Load all bars from the CSV file.
    fn load_all(&self) -> Result<Vec<PriceBar>, DataFetchError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| DataFetchError::ParseError(e.to_string()))?;

        let mut bars = Vec::new();

        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| DataFetchError::ParseError(e.to_string()))?;

            bars.push(PriceBar {
                date: Self::parse_date(&record.date)?,
                open: record.open,
                high: record.high,
                low: record.low,
                close: record.close,
                volume: record
                    .volume
                    .filter(|v| v.is_finite() && *v >= 0.0)
                    .map(|v| v as u64),
            });
        }

        // Sort by date
        bars.sort_by_key(|b| b.date);

        Ok(bars)
    }

    /// Parse various date formats.
    fn parse_date(date_str: &str) -> Result<NaiveDate, DataFetchError> {
        let date_str = date_str.trim();
        let formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];

        for format in formats {
            if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
                return Ok(d);
            }
        }

        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S") {
            return Ok(dt.date());
        }

        // Exports with the exchange offset, e.g. "2024-01-15 00:00:00+09:00"
        if let Ok(dt) = DateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S%:z") {
            return Ok(dt.date_naive());
        }

        Err(DataFetchError::ParseError(format!(
            "Could not parse date: {}",
            date_str
        )))
    }
}

#[async_trait]
impl PriceSource for CsvSource {
    async fn daily_bars(
        &self,
        symbol: &str,
        _lookback: usize,
        _today: NaiveDate,
    ) -> Result<PriceSeries, DataFetchError> {
        let bars = self.load_all()?;
        Ok(PriceSeries::new(symbol, bars).with_origin(SeriesOrigin::File))
    }

    fn name(&self) -> &str {
        "csv"
    }
}
