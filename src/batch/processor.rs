use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};

use super::types::{ProcessResult, ScanTask};

/// Unit of work run by the engine for each scanned file.
///
/// Implementations are called concurrently from several worker threads and
/// must not rely on engine state. Returning `Err` (or panicking) turns into a
/// failed [`ProcessResult`] for that task only.
pub trait TaskProcessor: Send + Sync {
    fn process(&self, task: &ScanTask) -> Result<ProcessResult>;
}

impl<F> TaskProcessor for F
where
    F: Fn(&ScanTask) -> Result<ProcessResult> + Send + Sync,
{
    fn process(&self, task: &ScanTask) -> Result<ProcessResult> {
        self(task)
    }
}

/// Default processor: count newline-delimited lines
pub fn count_lines(task: &ScanTask) -> Result<ProcessResult> {
    let path = task.path();
    let file = File::open(path).with_context(|| format!("failed to read {}", path.display()))?;

    // Count newlines chunk by chunk so a huge single line is never buffered whole
    let mut reader = BufReader::new(file);
    let mut lines = 0usize;
    let mut last = None;
    loop {
        let chunk = match reader.fill_buf() {
            Ok(chunk) => chunk,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };
        if chunk.is_empty() {
            break;
        }
        lines += chunk.iter().filter(|&&b| b == b'\n').count();
        last = chunk.last().copied();
        let len = chunk.len();
        reader.consume(len);
    }
    // A final line without a trailing newline still counts
    if last.is_some_and(|b| b != b'\n') {
        lines += 1;
    }

    Ok(ProcessResult::success(
        task.clone(),
        format!("line count: {lines}"),
    ))
}
