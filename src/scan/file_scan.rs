// src/scan/file_scan.rs

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::Result as AnyResult;
use tracing::debug;

use crate::errors::{MakeError, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::scan::Scan;

/// [`Scan`] over a directory.
///
/// Status is the file's modification time. Building is a stand-in action
/// that records how many times a file was built: it rewrites the file as
/// `"<n> times built.\n"`, where `n` is one more than the count already in
/// the file (or `0` for a file that did not exist).
#[derive(Debug, Clone)]
pub struct FileScan<F: FileSystem = RealFileSystem> {
    fs: F,
    base: PathBuf,
}

impl FileScan<RealFileSystem> {
    /// Scan the real filesystem below `base`.
    pub fn from_dir(base: impl Into<PathBuf>) -> Result<Self> {
        Self::new(RealFileSystem, base)
    }
}

impl<F: FileSystem> FileScan<F> {
    /// Fails with [`MakeError::InvalidDir`] unless `base` is a directory.
    pub fn new(fs: F, base: impl Into<PathBuf>) -> Result<Self> {
        let base = base.into();
        if !fs.is_dir(&base) {
            return Err(MakeError::InvalidDir(base));
        }
        Ok(Self { fs, base })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn join(&self, filename: &str) -> PathBuf {
        self.base.join(filename)
    }

    /// Times the file at `path` was built so far, if it exists.
    fn previous_builds(&self, path: &Path) -> Option<u64> {
        if !self.fs.exists(path) {
            return None;
        }
        let contents = self.fs.read_to_string(path).unwrap_or_default();
        let count = contents
            .split_whitespace()
            .next()
            .and_then(|word| word.parse().ok())
            .unwrap_or(0);
        Some(count)
    }
}

impl<F: FileSystem> Scan for FileScan<F> {
    fn status(&self, filename: &str) -> AnyResult<SystemTime> {
        self.fs.modified(&self.join(filename))
    }

    fn build(&self, filename: &str) -> AnyResult<SystemTime> {
        let path = self.join(filename);
        let count = self.previous_builds(&path).map_or(0, |n| n + 1);

        self.fs
            .write(&path, format!("{count} times built.\n").as_bytes())?;
        debug!(file = %filename, count, "wrote build output");

        self.fs.modified(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn scan() -> (MockFileSystem, FileScan<MockFileSystem>) {
        let fs = MockFileSystem::new();
        fs.add_dir("out");
        let scan = FileScan::new(fs.clone(), "out").unwrap();
        (fs, scan)
    }

    #[test]
    fn base_must_be_a_directory() {
        let fs = MockFileSystem::new();
        fs.add_file("file", "");

        assert!(matches!(
            FileScan::new(fs.clone(), "file"),
            Err(MakeError::InvalidDir(p)) if p == Path::new("file")
        ));
        assert!(matches!(
            FileScan::new(fs, "missing"),
            Err(MakeError::InvalidDir(_))
        ));
    }

    #[test]
    fn status_of_missing_file_is_an_error() {
        let (_, scan) = scan();
        assert!(scan.status("bar").is_err());
    }

    #[test]
    fn status_is_stable_for_an_existing_file() {
        let (fs, scan) = scan();
        let stamp = fs.add_file("out/bar", "");

        assert_eq!(scan.status("bar").unwrap(), stamp);
        assert_eq!(scan.status("bar").unwrap(), scan.status("bar").unwrap());
    }

    #[test]
    fn fresh_build_starts_counting_at_zero() {
        let (fs, scan) = scan();

        let built = scan.build("foo").unwrap();

        assert_eq!(fs.read_to_string(Path::new("out/foo")).unwrap(), "0 times built.\n");
        assert_eq!(scan.status("foo").unwrap(), built);
    }

    #[test]
    fn rebuild_increments_the_count() {
        let (fs, scan) = scan();
        let before = fs.add_file("out/foo", "10 times built.\n");

        let after = scan.build("foo").unwrap();

        assert_eq!(fs.read_to_string(Path::new("out/foo")).unwrap(), "11 times built.\n");
        assert!(after > before);
    }

    #[test]
    fn unreadable_count_restarts_from_one() {
        let (fs, scan) = scan();
        fs.add_file("out/foo", "hand written\n");

        scan.build("foo").unwrap();

        assert_eq!(fs.read_to_string(Path::new("out/foo")).unwrap(), "1 times built.\n");
    }
}
