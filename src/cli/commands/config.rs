//! Configuration command
//!
//! Prints the configuration a `run` would use after every layer is merged.

use anyhow::Result;
use clap::{Args, ValueEnum};
use std::path::Path;

use crate::config::{BatchConfig, ConfigOverrides};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    #[default]
    Toml,
    Json,
}

#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = ConfigFormat::Toml)]
    pub format: ConfigFormat,
}

pub fn execute(args: ConfigArgs, custom_config: Option<&Path>) -> Result<()> {
    let config = BatchConfig::load(custom_config, &ConfigOverrides::default())?;
    print!("{}", render(&config, args.format)?);
    Ok(())
}

fn render(config: &BatchConfig, format: ConfigFormat) -> Result<String> {
    let rendered = match format {
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Json => format!("{}\n", serde_json::to_string_pretty(config)?),
    };
    Ok(rendered)
}
