//! Daily price report CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use stockviz_config::load_config;
use stockviz_monitor::{setup_logging, LogFormat};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    // Command-line flags win over the file and environment
    if let Some(level) = cli.log_level {
        config.logging.level = level.as_str().to_string();
    }
    if cli.json_logs {
        config.logging.format = LogFormat::Json.to_string();
    }

    // Setup logging
    let format: LogFormat = config.logging.format.parse().map_err(anyhow::Error::msg)?;
    let _guard = setup_logging(&config.logging.level, format, config.logging.file.as_deref())
        .context("Failed to open log file")?;

    // Execute command
    match cli.command {
        Commands::Report(args) => cli::commands::report::run(args, &config).await,
        Commands::Show(args) => cli::commands::show::run(args, &config),
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config, &config),
    }
}
