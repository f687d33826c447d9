//! Console output for minibatch
//!
//! All human-facing report lines go through [`Output`] so quiet and verbose
//! modes are honoured in one place. Errors always go to stderr.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::batch::{ProcessResult, Summary};

/// Output handler for consistent CLI formatting
#[derive(Debug, Clone)]
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    /// Create a new output handler
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Output that prints nothing but errors
    pub fn quiet() -> Self {
        Self::new(false, true)
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Errors are shown even in quiet mode
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✖").red(), message);
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    /// Print a bold section header
    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("{}", style(title).bold());
        }
    }

    /// Print an indented key/value pair
    pub fn key_value(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {:<16} {}", style(key).dim(), value);
        }
    }

    /// Success/failure counts for a finished run
    pub fn summary(&self, summary: &Summary) {
        if self.quiet {
            return;
        }
        println!(
            "{} {} succeeded, {} failed ({} total)",
            style("Σ").cyan().bold(),
            style(summary.success_count).green().bold(),
            style(summary.fail_count).red().bold(),
            summary.total
        );
    }

    /// One line per processed file
    pub fn result_line(&self, result: &ProcessResult) {
        if self.quiet {
            return;
        }
        let (icon, status) = if result.is_success() {
            (style("✔").green(), style("OK  ").green())
        } else {
            (style("✖").red(), style("FAIL").red())
        };
        println!(
            "  {} {} {} {}",
            icon,
            status,
            style(result.task().path().display()).underlined(),
            style(result.message()).dim()
        );
    }

    /// Progress bar for `len` items, hidden in quiet mode
    pub fn progress_bar(&self, len: u64, message: &str) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        if let Ok(bar_style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(bar_style.progress_chars("#>-"));
        }
        pb.set_message(message.to_string());
        pb
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new(false, false)
    }
}
