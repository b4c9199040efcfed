//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings, ChartSettings, LoggingConfig, OutputSettings, SourceSettings};

use config::{Config, Environment, File};
use std::path::Path;
use thiserror::Error;

/// Prefix of environment overrides, e.g. `STOCKVIZ__SOURCE__TICKER`.
pub const ENV_PREFIX: &str = "STOCKVIZ";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Load configuration from file and environment, then validate it.
///
/// A missing file is not an error; every setting has a default.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let settings: AppConfig = config.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}
