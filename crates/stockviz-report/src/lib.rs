//! Report output: CSV artifact, console legend and table, chart views.

mod console;
mod csv_file;
mod views;

pub use console::{legend, print_report, table, LEGEND};
pub use csv_file::{read_csv, write_csv, COLUMNS};
pub use views::{Candle, ChartViews, VolumeBar, DEFAULT_LABEL_FORMAT, DEFAULT_TICK_STRIDE};

use std::io::Write;
use std::path::PathBuf;
use stockviz_core::error::ProcessingResult;
use stockviz_core::types::EnrichedSeries;
use tracing::info;

/// Writes the artifact and prints the console report for one series.
#[derive(Debug, Clone)]
pub struct ReportEmitter {
    csv_path: PathBuf,
    tick_stride: usize,
    label_format: String,
}

impl ReportEmitter {
    /// Create an emitter writing to `csv_path`.
    pub fn new(csv_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: csv_path.into(),
            tick_stride: DEFAULT_TICK_STRIDE,
            label_format: DEFAULT_LABEL_FORMAT.to_string(),
        }
    }

    /// Set the x-axis tick spacing and label format.
    pub fn with_ticks(mut self, stride: usize, label_format: impl Into<String>) -> Self {
        self.tick_stride = stride;
        self.label_format = label_format.into();
        self
    }

    /// Write the artifact, then the save notice, legend and table to `out`.
    pub fn emit<W: Write>(&self, series: &EnrichedSeries, out: &mut W) -> ProcessingResult<()> {
        write_csv(series, &self.csv_path)?;
        info!(path = %self.csv_path.display(), rows = series.len(), "report saved");

        writeln!(out)?;
        writeln!(out, "Saved: {}", self.csv_path.display())?;
        print_report(out, series)?;
        Ok(())
    }

    /// Shape the series for the chart.
    pub fn views(&self, series: &EnrichedSeries) -> ProcessingResult<ChartViews> {
        ChartViews::from_series(series, self.tick_stride, &self.label_format)
    }
}
