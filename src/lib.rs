//! # minibatch - a small parallel file batch pipeline
//!
//! minibatch scans one directory for regular files at or above a size
//! threshold, runs a processing function over each of them on a fixed-size
//! worker pool and aggregates the outcomes into a success/failure summary.
//!
//! ## Quick Start
//!
//! ```bash
//! # Count lines of every file >= 1 KiB in ./input with 4 workers
//! minibatch run
//!
//! # Different directory, threshold and pool size
//! minibatch run --input-dir logs --min-size 4096 --threads 8
//!
//! # Machine-readable report
//! minibatch run --format json
//! ```
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use minibatch::batch::{FileScanner, ProcessEngine, count_lines};
//!
//! let tasks = FileScanner::new("input", 1024).scan();
//! let mut engine = ProcessEngine::new(count_lines, 4);
//! let results = engine.process_all(tasks)?;
//! engine.shutdown()?;
//!
//! let summary = results.summary();
//! println!("{} ok, {} failed", summary.success_count, summary.fail_count);
//! # Ok::<(), minibatch::batch::EngineError>(())
//! ```
//!
//! Any `Fn(&ScanTask) -> anyhow::Result<ProcessResult>` can replace
//! [`batch::count_lines`]. Errors and panics inside it become failed results
//! for that one file and never abort the rest of the batch.

pub mod batch;
pub mod cli;
pub mod config;
pub mod parallel;

pub use cli::{Cli, Output};
pub use config::BatchConfig;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
