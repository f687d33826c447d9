use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use super::aggregator::{Summary, summarize};

/// A file selected for processing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanTask {
    path: PathBuf,
    size: u64,
}

impl ScanTask {
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size in bytes as observed at scan time
    pub fn size(&self) -> u64 {
        self.size
    }
}

impl fmt::Display for ScanTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.path.display(), self.size)
    }
}

/// Outcome of processing exactly one [`ScanTask`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessResult {
    task: ScanTask,
    success: bool,
    message: String,
}

impl ProcessResult {
    pub fn success(task: ScanTask, message: impl Into<String>) -> Self {
        Self {
            task,
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(task: ScanTask, message: impl Into<String>) -> Self {
        Self {
            task,
            success: false,
            message: message.into(),
        }
    }

    pub fn task(&self) -> &ScanTask {
        &self.task
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn with_task(mut self, task: ScanTask) -> Self {
        self.task = task;
        self
    }
}

/// All results of one batch run, one per submitted task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    results: Vec<ProcessResult>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProcessResult> {
        self.results.iter()
    }

    pub fn as_slice(&self) -> &[ProcessResult] {
        &self.results
    }

    pub fn into_vec(self) -> Vec<ProcessResult> {
        self.results
    }

    /// Reorder by task path for callers that need a stable listing
    pub fn sort_by_path(&mut self) {
        self.results.sort_by(|a, b| a.task.path.cmp(&b.task.path));
    }

    pub fn summary(&self) -> Summary {
        summarize(self)
    }
}

impl From<Vec<ProcessResult>> for ResultSet {
    fn from(results: Vec<ProcessResult>) -> Self {
        Self { results }
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ProcessResult;
    type IntoIter = std::slice::Iter<'a, ProcessResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

impl IntoIterator for ResultSet {
    type Item = ProcessResult;
    type IntoIter = std::vec::IntoIter<ProcessResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}
