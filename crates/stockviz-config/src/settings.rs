//! Configuration structures.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::PathBuf;
use stockviz_core::types::DEFAULT_LOOKBACK_DAYS;
use stockviz_data::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use stockviz_report::{DEFAULT_LABEL_FORMAT, DEFAULT_TICK_STRIDE};

use crate::ConfigError;

const LOG_FORMATS: [&str; 3] = ["pretty", "compact", "json"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default)]
    pub output: OutputSettings,
    #[serde(default)]
    pub chart: ChartSettings,
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "stockviz".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty`, `compact` or `json`
    pub format: String,
    /// Additional log file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Where prices come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub ticker: String,
    pub lookback_days: usize,
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            ticker: "7203.T".to_string(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Report artifact settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub csv_path: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("stock_portfolio.csv"),
        }
    }
}

/// Chart window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub enabled: bool,
    /// Label every n-th bar on the date axis
    pub tick_stride: usize,
    pub label_format: String,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            tick_stride: DEFAULT_TICK_STRIDE,
            label_format: DEFAULT_LABEL_FORMAT.to_string(),
        }
    }
}

impl AppConfig {
    /// Check value ranges the types alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.source.ticker.trim().is_empty() {
            return invalid("source.ticker must not be empty");
        }
        if self.source.lookback_days == 0 {
            return invalid("source.lookback_days must be at least 1");
        }
        if self.source.timeout_secs == 0 {
            return invalid("source.timeout_secs must be at least 1");
        }
        if self.chart.tick_stride == 0 {
            return invalid("chart.tick_stride must be at least 1");
        }
        // Formatting fails on unknown specifiers and on time or zone fields
        let mut sample = String::new();
        if write!(sample, "{}", NaiveDate::default().format(&self.chart.label_format)).is_err() {
            return Err(ConfigError::Invalid(format!(
                "chart.label_format is not a valid date format: {:?}",
                self.chart.label_format
            )));
        }
        if !LOG_FORMATS.contains(&self.logging.format.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "logging.format must be one of {}: got {:?}",
                LOG_FORMATS.join(", "),
                self.logging.format
            )));
        }

        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let cases: Vec<fn(&mut AppConfig)> = vec![
            |c: &mut AppConfig| c.source.ticker = "  ".to_string(),
            |c: &mut AppConfig| c.source.lookback_days = 0,
            |c: &mut AppConfig| c.source.timeout_secs = 0,
            |c: &mut AppConfig| c.chart.tick_stride = 0,
            |c: &mut AppConfig| c.chart.label_format = "%Y-%".to_string(),
            |c: &mut AppConfig| c.chart.label_format = "%H:%M".to_string(),
            |c: &mut AppConfig| c.chart.label_format = "%Y-%m-%d %Z".to_string(),
            |c: &mut AppConfig| c.logging.format = "xml".to_string(),
        ];

        for mutate in cases {
            let mut config = AppConfig::default();
            mutate(&mut config);
            assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        }
    }

    #[test]
    fn test_date_only_label_formats_pass() {
        for format in ["%Y-%m-%d", "%m/%d", "%b %e", "%y%m%d"] {
            let mut config = AppConfig::default();
            config.chart.label_format = format.to_string();
            assert!(config.validate().is_ok(), "{}", format);
        }
    }

    #[test]
    fn test_log_format_case_insensitive() {
        let mut config = AppConfig::default();
        config.logging.format = "JSON".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_match_runtime_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.source.lookback_days, DEFAULT_LOOKBACK_DAYS);
        assert_eq!(config.source.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.source.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.chart.tick_stride, DEFAULT_TICK_STRIDE);
        assert_eq!(config.chart.label_format, DEFAULT_LABEL_FORMAT);
    }

    #[test]
    fn test_to_toml() {
        let text = AppConfig::default().to_toml().unwrap();
        assert!(text.contains("[source]"));
        assert!(text.contains("ticker = \"7203.T\""));
        assert!(text.contains("csv_path = \"stock_portfolio.csv\""));
        assert!(!text.contains("file ="));
    }
}
