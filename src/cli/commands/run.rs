use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

use super::OutputFormat;
use crate::batch::{BatchRunner, count_lines};
use crate::cli::Output;
use crate::config::{BatchConfig, ConfigOverrides};

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Directory to scan (overrides config)
    #[arg(short, long, value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// Minimum file size in bytes (overrides config)
    #[arg(short = 's', long = "min-size", value_name = "BYTES")]
    pub min_size: Option<u64>,

    /// Worker threads, 0 = one per CPU core (overrides config)
    #[arg(short = 'j', long, value_name = "N")]
    pub threads: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl RunArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            input_dir: self.input_dir.clone(),
            min_size_bytes: self.min_size,
            thread_pool_size: self.threads,
        }
    }
}

pub fn execute(args: RunArgs, custom_config: Option<&Path>, output: &Output) -> Result<()> {
    let config = BatchConfig::load(custom_config, &args.overrides())?;
    let runner = BatchRunner::new(config);

    match args.format {
        OutputFormat::Text => {
            runner.run(count_lines, output)?;
        }
        OutputFormat::Json => {
            // Keep stdout clean for the JSON document
            let report = runner.run(count_lines, &Output::quiet())?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
