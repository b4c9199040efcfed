//! Report command implementation.

use anyhow::{Context, Result};
use chrono::Local;
use std::io;
use std::time::Duration;
use stockviz_config::AppConfig;
use stockviz_core::error::{DataFetchError, ProcessingError};
use stockviz_core::traits::PriceSource;
use stockviz_data::{CsvSource, DataProvider, FetchOutcome, YahooSource};
use stockviz_indicators::IndicatorEngine;
use stockviz_report::ReportEmitter;
use tracing::{info, warn};

use crate::cli::ReportArgs;

pub async fn run(args: ReportArgs, config: &AppConfig) -> Result<()> {
    let symbol = args.symbol.clone().unwrap_or_else(|| config.source.ticker.clone());
    let csv_path = args.output.clone().unwrap_or_else(|| config.output.csv_path.clone());
    let lookback = config.source.lookback_days;
    info!(%symbol, lookback, "starting report");

    // Fetch, falling back to placeholder bars
    let outcome = match build_source(&args, config) {
        Ok(source) => DataProvider::new(source, lookback).fetch(&symbol).await,
        Err(cause) => {
            warn!(error = %cause, "price source unavailable");
            FetchOutcome::fallback(&symbol, lookback, Local::now().date_naive(), cause)
        }
    };
    if let Some(warning) = outcome.warning() {
        println!("[WARN] {}", warning);
    }

    // Enrich
    let enriched = IndicatorEngine::new()
        .enrich(&outcome.into_series())
        .map_err(ProcessingError::from)
        .context("Failed to compute indicators")?;

    // Emit
    let emitter = ReportEmitter::new(&csv_path)
        .with_ticks(config.chart.tick_stride, config.chart.label_format.as_str());
    emitter
        .emit(&enriched, &mut io::stdout().lock())
        .with_context(|| format!("Failed to write report to {}", csv_path.display()))?;

    let views = emitter.views(&enriched).context("Failed to prepare chart")?;
    super::display_chart(&views, &config.chart, args.no_chart)
}

fn build_source(args: &ReportArgs, config: &AppConfig) -> Result<Box<dyn PriceSource>, DataFetchError> {
    match &args.data {
        Some(path) => {
            info!(path = %path.display(), "reading bars from file");
            Ok(Box::new(CsvSource::new(path)?))
        }
        None => {
            let source = YahooSource::new(
                &config.source.base_url,
                Duration::from_secs(config.source.timeout_secs),
                &config.source.user_agent,
            )?;
            Ok(Box::new(source))
        }
    }
}
