//! Validate configuration command.

use anyhow::Result;
use std::path::Path;
use stockviz_config::AppConfig;

pub fn run(config_path: &Path, config: &AppConfig) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);
    if !config_path.exists() {
        println!("(file not found, using defaults and environment)");
    }

    println!("Configuration is valid!");
    println!();
    print!("{}", config.to_toml()?);

    Ok(())
}
