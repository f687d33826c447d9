//! The batch pipeline
//!
//! ```text
//! FileScanner ──tasks──▶ ProcessEngine ──ResultSet──▶ summarize
//!                           │  ▲
//!                  workers  ▼  │ one result per task
//!                       TaskProcessor
//! ```
//!
//! The scanner and aggregation run on the calling thread; only
//! [`TaskProcessor`] invocations run on the engine's worker pool.

pub mod aggregator;
pub mod engine;
pub mod processor;
pub mod runner;
pub mod scanner;
pub mod types;

pub use aggregator::{Summary, summarize};
pub use engine::{EngineError, EngineState, ProcessEngine};
pub use processor::{TaskProcessor, count_lines};
pub use runner::{BatchReport, BatchRunner};
pub use scanner::{FileScanner, ScanError};
pub use types::{ProcessResult, ResultSet, ScanTask};
