//! Command implementations for the minibatch CLI
//!
//! Each command lives in its own module with its clap arguments and an
//! `execute` function.

pub mod config;
pub mod run;
pub mod version;

use clap::ValueEnum;

/// How a command renders its result on stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
