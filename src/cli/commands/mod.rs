//! CLI command implementations.

pub mod report;
pub mod show;
pub mod validate;

use anyhow::{Context, Result};
use std::io::{self, IsTerminal};
use stockviz_config::ChartSettings;
use stockviz_core::error::ProcessingError;
use stockviz_monitor::ChartWindow;
use stockviz_report::ChartViews;
use tracing::info;

/// Open the chart window unless disabled or stdout is not a terminal.
fn display_chart(views: &ChartViews, settings: &ChartSettings, no_chart: bool) -> Result<()> {
    if no_chart || !settings.enabled {
        info!("chart disabled");
        return Ok(());
    }
    if !io::stdout().is_terminal() {
        info!("stdout is not a terminal, skipping chart");
        return Ok(());
    }

    ChartWindow::default()
        .show(views)
        .map_err(|e| ProcessingError::Render(e.to_string()))
        .context("Failed to display chart")
}
