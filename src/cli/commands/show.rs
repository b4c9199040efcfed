//! Show command implementation.

use anyhow::{Context, Result};
use std::io::{self, Write};
use stockviz_config::AppConfig;
use stockviz_report::{print_report, read_csv, ChartViews};
use tracing::info;

use crate::cli::ShowArgs;

pub fn run(args: ShowArgs, config: &AppConfig) -> Result<()> {
    let symbol = args.symbol.as_deref().unwrap_or(&config.source.ticker);

    let series = read_csv(&args.input, symbol)
        .with_context(|| format!("Failed to read report {}", args.input.display()))?;
    info!(path = %args.input.display(), rows = series.len(), "report loaded");

    let mut out = io::stdout().lock();
    writeln!(out)?;
    writeln!(out, "Loaded: {}", args.input.display())?;
    print_report(&mut out, &series)?;
    drop(out);

    let views = ChartViews::from_series(&series, config.chart.tick_stride, &config.chart.label_format)
        .context("Failed to prepare chart")?;
    super::display_chart(&views, &config.chart, args.no_chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::report;
    use crate::cli::ReportArgs;

    #[tokio::test]
    async fn test_show_existing_report() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("report.csv");
        let config = AppConfig::default();

        report::run(
            ReportArgs {
                symbol: None,
                output: Some(output.clone()),
                data: Some(dir.path().join("absent.csv")),
                no_chart: true,
            },
            &config,
        )
        .await
        .unwrap();

        let shown = run(
            ShowArgs {
                input: output,
                symbol: Some("6758.T".to_string()),
                no_chart: true,
            },
            &config,
        );
        assert!(shown.is_ok());
    }

    #[test]
    fn test_show_missing_report() {
        let dir = tempfile::tempdir().unwrap();
        let shown = run(
            ShowArgs {
                input: dir.path().join("absent.csv"),
                symbol: None,
                no_chart: true,
            },
            &AppConfig::default(),
        );
        assert!(shown.is_err());
    }
}
