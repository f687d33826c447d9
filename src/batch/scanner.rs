//! Input directory scanning
//!
//! Lists the direct entries of the input directory and turns every regular file
//! at or above the size threshold into a [`ScanTask`]. The listing is taken
//! eagerly and never recurses into subdirectories.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use super::types::ScanTask;

/// Why the input directory could not be listed
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("cannot read directory {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct FileScanner {
    input_dir: PathBuf,
    min_size_bytes: u64,
}

impl FileScanner {
    /// Scanner for the top level of `input_dir`, keeping files of at least `min_size_bytes`
    pub fn new(input_dir: impl Into<PathBuf>, min_size_bytes: u64) -> Self {
        Self {
            input_dir: input_dir.into(),
            min_size_bytes,
        }
    }

    /// Directory being listed
    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    /// Inclusive size threshold
    pub fn min_size_bytes(&self) -> u64 {
        self.min_size_bytes
    }

    /// Scan, degrading a listing failure to an empty task list.
    ///
    /// The failure is logged at error level, so "nothing found" and "could not
    /// list" look the same to callers that only inspect the returned tasks. Use
    /// [`FileScanner::try_scan`] to tell them apart.
    pub fn scan(&self) -> Vec<ScanTask> {
        match self.try_scan() {
            Ok(tasks) => tasks,
            Err(e) => {
                tracing::error!("File scan failed: {e}");
                Vec::new()
            }
        }
    }

    /// Scan, returning a typed error when the directory itself cannot be listed.
    ///
    /// Entries whose metadata cannot be read are skipped without an error.
    pub fn try_scan(&self) -> Result<Vec<ScanTask>, ScanError> {
        let dir_meta = std::fs::metadata(&self.input_dir).map_err(|source| ScanError::Unreadable {
            path: self.input_dir.clone(),
            source,
        })?;
        if !dir_meta.is_dir() {
            return Err(ScanError::NotADirectory {
                path: self.input_dir.clone(),
            });
        }

        let walker = WalkDir::new(&self.input_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        let mut tasks = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::other("directory listing failed"));
                    return Err(ScanError::Unreadable {
                        path: self.input_dir.clone(),
                        source,
                    });
                }
                Err(e) => {
                    tracing::trace!("Skipping unreadable entry: {e}");
                    continue;
                }
            };

            // Symlinks are not followed, so they report their own file type here
            if !entry.file_type().is_file() {
                continue;
            }

            let size = match entry.metadata() {
                Ok(meta) => meta.len(),
                Err(e) => {
                    tracing::trace!("Skipping {}: {e}", entry.path().display());
                    continue;
                }
            };

            if size >= self.min_size_bytes {
                tasks.push(ScanTask::new(entry.into_path(), size));
            }
        }

        tracing::debug!(
            "Scanned {}: {} file(s) >= {} bytes",
            self.input_dir.display(),
            tasks.len(),
            self.min_size_bytes
        );
        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn file_names(tasks: &[ScanTask]) -> Vec<String> {
        tasks
            .iter()
            .map(|t| t.path().file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("exact.txt"), vec![b'x'; 1024]).unwrap();
        fs::write(temp_dir.path().join("small.txt"), vec![b'x'; 1023]).unwrap();
        fs::write(temp_dir.path().join("large.txt"), vec![b'x'; 4096]).unwrap();

        let tasks = FileScanner::new(temp_dir.path(), 1024).scan();

        assert_eq!(file_names(&tasks), vec!["exact.txt", "large.txt"]);
        assert_eq!(tasks[0].size(), 1024);
    }

    #[test]
    fn test_directories_are_excluded_and_not_recursed() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("deep.txt"), vec![b'x'; 2048]).unwrap();
        fs::write(temp_dir.path().join("top.txt"), vec![b'x'; 2048]).unwrap();

        let tasks = FileScanner::new(temp_dir.path(), 0).scan();

        assert_eq!(file_names(&tasks), vec!["top.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_excluded() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("real.txt");
        fs::write(&target, vec![b'x'; 2048]).unwrap();
        std::os::unix::fs::symlink(&target, temp_dir.path().join("link.txt")).unwrap();

        let tasks = FileScanner::new(temp_dir.path(), 1024).scan();

        assert_eq!(file_names(&tasks), vec!["real.txt"]);
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = FileScanner::new(temp_dir.path(), 1024);

        assert!(scanner.try_scan().unwrap().is_empty());
        assert!(scanner.scan().is_empty());
    }

    #[test]
    fn test_missing_directory_fails_soft() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = FileScanner::new(temp_dir.path().join("missing"), 1024);

        assert!(scanner.scan().is_empty());
        assert!(matches!(
            scanner.try_scan(),
            Err(ScanError::Unreadable { .. })
        ));
    }

    #[test]
    fn test_file_as_input_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("plain.txt");
        fs::write(&file, b"hello").unwrap();

        let scanner = FileScanner::new(&file, 0);

        assert!(scanner.scan().is_empty());
        assert!(matches!(
            scanner.try_scan(),
            Err(ScanError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_rescan_reflects_filesystem_changes() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = FileScanner::new(temp_dir.path(), 1);

        assert!(scanner.scan().is_empty());
        fs::write(temp_dir.path().join("new.txt"), b"data").unwrap();
        assert_eq!(file_names(&scanner.scan()), vec!["new.txt"]);
    }
}
