use anyhow::Result;
use serde::Serialize;

use super::aggregator::{Summary, summarize};
use super::engine::ProcessEngine;
use super::processor::TaskProcessor;
use super::scanner::FileScanner;
use super::types::ResultSet;
use crate::cli::Output;
use crate::config::BatchConfig;

/// Everything one run produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// Files selected by the scan
    pub scanned: usize,
    /// Set when the input directory could not be listed
    pub scan_error: Option<String>,
    pub summary: Summary,
    pub results: ResultSet,
}

/// Drives scan → parallel processing → summary for one configuration
#[derive(Debug, Clone)]
pub struct BatchRunner {
    config: BatchConfig,
}

impl BatchRunner {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub fn run<P>(&self, processor: P, output: &Output) -> Result<BatchReport>
    where
        P: TaskProcessor + 'static,
    {
        output.header("=== batch start ===");
        self.echo_config(output);

        let scanner = FileScanner::new(&self.config.input_dir, self.config.min_size_bytes);
        let (tasks, scan_error) = match scanner.try_scan() {
            Ok(tasks) => (tasks, None),
            Err(e) => {
                tracing::debug!("Scan failed: {e:?}");
                output.error(&format!("File scan failed: {e}"));
                (Vec::new(), Some(e.to_string()))
            }
        };

        let scanned = tasks.len();
        output.info(&format!("Scanned {scanned} file(s)"));

        if tasks.is_empty() {
            output.warning("No files to process");
            output.summary(&Summary::default());
            output.header("=== batch end ===");
            return Ok(BatchReport {
                scanned,
                scan_error,
                ..Default::default()
            });
        }

        let pb = output.progress_bar(scanned as u64, "files");
        let mut engine = ProcessEngine::new(processor, self.config.worker_count()).with_progress({
            let pb = pb.clone();
            move |current: usize, _total: usize, _worker_id: usize| pb.set_position(current as u64)
        });

        let results = engine.process_all(tasks)?;
        pb.finish_and_clear();

        let summary = summarize(&results);
        output.summary(&summary);
        for result in &results {
            output.result_line(result);
        }

        engine.shutdown()?;
        output.header("=== batch end ===");

        tracing::info!(
            "Batch finished: {} succeeded, {} failed",
            summary.success_count,
            summary.fail_count
        );

        Ok(BatchReport {
            scanned,
            scan_error,
            summary,
            results,
        })
    }

    fn echo_config(&self, output: &Output) {
        if !output.is_verbose() {
            return;
        }
        let config = &self.config;
        output.key_value("input_dir", &config.input_dir.display().to_string());
        output.key_value("processed_dir", &config.processed_dir.display().to_string());
        output.key_value("error_dir", &config.error_dir.display().to_string());
        output.key_value("min_size_bytes", &config.min_size_bytes.to_string());
        output.key_value("threads", &config.worker_count().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::processor::count_lines;
    use crate::batch::types::{ProcessResult, ScanTask};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn config_for(dir: &Path) -> BatchConfig {
        BatchConfig {
            input_dir: dir.to_path_buf(),
            min_size_bytes: 1024,
            thread_pool_size: 4,
            ..Default::default()
        }
    }

    fn lines_file(path: &Path, lines: usize, size: usize) {
        let mut content = "x\n".repeat(lines).into_bytes();
        let pad = size - content.len();
        // Pad the last line so the byte size is exact without adding lines
        content.pop();
        content.extend(std::iter::repeat_n(b'y', pad));
        content.push(b'\n');
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_mixed_directory_run() {
        let temp_dir = TempDir::new().unwrap();
        lines_file(&temp_dir.path().join("a.txt"), 10, 2048);
        fs::write(temp_dir.path().join("b.txt"), vec![b'x'; 512]).unwrap();
        fs::write(temp_dir.path().join("c.txt"), vec![b'x'; 2048]).unwrap();

        // c.txt stands in for a file the process is not allowed to read
        let processor = |task: &ScanTask| -> anyhow::Result<ProcessResult> {
            if task.path().ends_with("c.txt") {
                anyhow::bail!("permission denied");
            }
            count_lines(task)
        };

        let runner = BatchRunner::new(config_for(temp_dir.path()));
        let report = runner.run(processor, &Output::quiet()).unwrap();

        assert_eq!(report.scanned, 2);
        assert!(report.scan_error.is_none());
        assert_eq!(report.summary.success_count, 1);
        assert_eq!(report.summary.fail_count, 1);

        let a = report
            .results
            .iter()
            .find(|r| r.task().path().ends_with("a.txt"))
            .unwrap();
        assert!(a.is_success());
        assert_eq!(a.message(), "line count: 10");

        let c = report
            .results
            .iter()
            .find(|r| r.task().path().ends_with("c.txt"))
            .unwrap();
        assert!(!c.is_success());
        assert!(c.message().contains("permission denied"));
    }

    #[cfg(unix)]
    #[test]
    fn test_permission_denied_file_fails_alone() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        lines_file(&temp_dir.path().join("a.txt"), 10, 2048);
        let locked = temp_dir.path().join("c.txt");
        fs::write(&locked, vec![b'x'; 2048]).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores file modes, nothing to check there
        if fs::File::open(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
            return;
        }

        let runner = BatchRunner::new(config_for(temp_dir.path()));
        let report = runner.run(count_lines, &Output::quiet()).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

        assert_eq!(report.scanned, 2);
        assert_eq!(report.summary.success_count, 1);
        assert_eq!(report.summary.fail_count, 1);

        let c = report
            .results
            .iter()
            .find(|r| r.task().path().ends_with("c.txt"))
            .unwrap();
        assert!(!c.is_success());
        assert!(c.message().starts_with("processing failed: failed to read"));
        assert!(c.message().contains("Permission denied"));
    }

    #[test]
    fn test_empty_directory_run() {
        let temp_dir = TempDir::new().unwrap();
        let runner = BatchRunner::new(config_for(temp_dir.path()));

        let report = runner.run(count_lines, &Output::quiet()).unwrap();

        assert_eq!(report.scanned, 0);
        assert!(report.results.is_empty());
        assert_eq!(report.summary, Summary::default());
        assert!(report.scan_error.is_none());
    }

    #[test]
    fn test_missing_directory_run() {
        let temp_dir = TempDir::new().unwrap();
        let runner = BatchRunner::new(config_for(&temp_dir.path().join("missing")));

        let report = runner.run(count_lines, &Output::quiet()).unwrap();

        assert!(report.results.is_empty());
        assert_eq!(report.summary.total, 0);
        assert!(report.scan_error.is_some());
    }
}
