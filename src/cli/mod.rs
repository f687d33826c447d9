//! Command-line interface for minibatch
//!
//! Argument parsing with clap, logging setup and dispatch to the command
//! implementations in [`commands`].

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;
mod output;

pub use output::Output;

#[derive(Parser, Debug)]
#[command(
    name = "minibatch",
    version = crate::VERSION,
    about = "Scan a directory and process matching files in parallel",
    long_about = "minibatch lists an input directory, keeps regular files at or above a size \
                  threshold, counts their lines on a fixed-size worker pool and prints a \
                  success/failure summary."
)]
pub struct Cli {
    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file (TOML)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the batch (default when no command is given)
    Run(commands::run::RunArgs),
    /// Show the effective configuration
    Config(commands::config::ConfigArgs),
    /// Show version information
    Version,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);

        let output = Output::new(self.verbose > 0, self.quiet);
        let custom_config = self.config.as_deref();

        match self.command {
            Some(Commands::Run(args)) => commands::run::execute(args, custom_config, &output),
            Some(Commands::Config(args)) => commands::config::execute(args, custom_config),
            Some(Commands::Version) => commands::version::execute(&output),
            None => commands::run::execute(Default::default(), custom_config, &output),
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // stdout carries the report (and JSON output), so logs go to stderr
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_defaults_to_run() {
        let cli = Cli::try_parse_from(["minibatch"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_run_overrides_parse() {
        let cli = Cli::try_parse_from([
            "minibatch",
            "-vv",
            "run",
            "--input-dir",
            "data",
            "--min-size",
            "10",
            "--threads",
            "2",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Run(args)) => {
                let overrides = args.overrides();
                assert_eq!(overrides.input_dir, Some(PathBuf::from("data")));
                assert_eq!(overrides.min_size_bytes, Some(10));
                assert_eq!(overrides.thread_pool_size, Some(2));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
