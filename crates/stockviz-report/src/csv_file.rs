//! Delimited report artifact.

use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use stockviz_core::error::{ProcessingError, ProcessingResult};
use stockviz_core::types::{EnrichedBar, EnrichedSeries, PriceBar, SeriesOrigin};
use tracing::debug;

/// Column order of the artifact.
pub const COLUMNS: [&str; 9] = [
    "Date", "Open", "High", "Low", "Close", "Volume", "Return", "MA5", "MA25",
];

/// Spreadsheet applications need the mark to detect UTF-8.
const UTF8_BOM: &str = "\u{feff}";

/// Fractional digits written for any decimal.
const MAX_DECIMALS: u32 = 6;

/// One row of the artifact. Field order is the column order.
#[derive(Debug, Serialize, Deserialize)]
struct ReportRecord {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Open")]
    open: Option<Decimal>,
    #[serde(rename = "High")]
    high: Option<Decimal>,
    #[serde(rename = "Low")]
    low: Option<Decimal>,
    #[serde(rename = "Close")]
    close: Option<Decimal>,
    #[serde(rename = "Volume")]
    volume: Option<u64>,
    #[serde(rename = "Return")]
    return_pct: Option<Decimal>,
    #[serde(rename = "MA5")]
    ma5: Option<Decimal>,
    #[serde(rename = "MA25")]
    ma25: Option<Decimal>,
}

/// Plain notation, bounded precision, no trailing zeros.
pub(crate) fn tidy(value: Decimal) -> Decimal {
    value.round_dp(MAX_DECIMALS).normalize()
}

impl From<&EnrichedBar> for ReportRecord {
    fn from(row: &EnrichedBar) -> Self {
        Self {
            date: row.bar.date,
            open: row.bar.open.map(tidy),
            high: row.bar.high.map(tidy),
            low: row.bar.low.map(tidy),
            close: row.bar.close.map(tidy),
            volume: row.bar.volume,
            return_pct: row.return_pct.map(tidy),
            ma5: row.ma5.map(tidy),
            ma25: row.ma25.map(tidy),
        }
    }
}

impl From<ReportRecord> for EnrichedBar {
    fn from(record: ReportRecord) -> Self {
        Self {
            bar: PriceBar {
                date: record.date,
                open: record.open,
                high: record.high,
                low: record.low,
                close: record.close,
                volume: record.volume,
            },
            return_pct: record.return_pct,
            ma5: record.ma5,
            ma25: record.ma25,
        }
    }
}

/// Write the series to `path`, replacing any existing file.
///
/// UTF-8 with a byte-order mark, one header row, empty fields for
/// missing values.
pub fn write_csv(series: &EnrichedSeries, path: &Path) -> ProcessingResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(UTF8_BOM.as_bytes())?;

    let mut writer = WriterBuilder::new().has_headers(true).from_writer(out);
    for row in series.iter() {
        writer
            .serialize(ReportRecord::from(row))
            .map_err(|e| ProcessingError::Serialization(e.to_string()))?;
    }
    // A zero-row series still gets its header line.
    if series.is_empty() {
        writer
            .write_record(COLUMNS)
            .map_err(|e| ProcessingError::Serialization(e.to_string()))?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = series.len(), "report written");
    Ok(())
}

/// Read a file produced by [`write_csv`] back into a series.
pub fn read_csv(path: &Path, symbol: &str) -> ProcessingResult<EnrichedSeries> {
    let content = fs::read(path)?;
    let body = content
        .strip_prefix(UTF8_BOM.as_bytes())
        .unwrap_or(&content);

    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(body);

    let headers = reader
        .headers()
        .map_err(|e| ProcessingError::Serialization(e.to_string()))?;
    if headers.iter().ne(COLUMNS.iter().copied()) {
        return Err(ProcessingError::Serialization(format!(
            "unexpected header: {}",
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    let mut bars = Vec::new();
    for result in reader.deserialize() {
        let record: ReportRecord =
            result.map_err(|e| ProcessingError::Serialization(e.to_string()))?;
        bars.push(EnrichedBar::from(record));
    }

    Ok(EnrichedSeries {
        symbol: symbol.to_string(),
        currency: None,
        origin: SeriesOrigin::File,
        bars,
    })
}
