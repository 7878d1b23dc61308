//! Common test utilities for integration tests
//!
//! Provides shared fixtures and a file system wrapper that counts and fails
//! operations on demand.

#![allow(dead_code)]

use rollover::{FileSystem, StdFileSystem};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant, SystemTime};
use tempfile::TempDir;

/// Create a temporary directory for test isolation
///
/// Returns a TempDir that will be cleaned up when dropped.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Setup test logging
///
/// Initializes a tracing subscriber for test output so rotation warnings show
/// up next to a failing test.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Poll `predicate` every 10ms until it holds or `timeout` elapses
pub fn wait_for(predicate: impl Fn() -> bool, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if predicate() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    predicate()
}

/// Total number of lines across `paths`
pub fn count_lines(paths: &[PathBuf]) -> usize {
    paths
        .iter()
        .filter_map(|path| std::fs::read_to_string(path).ok())
        .map(|contents| contents.lines().count())
        .sum()
}

/// `StdFileSystem` that counts mutating operations and can fail renames
#[derive(Debug, Default)]
pub struct CountingFileSystem {
    inner: StdFileSystem,
    pub renames: AtomicUsize,
    pub removes: AtomicUsize,
    pub creates: AtomicUsize,
    pub appends: AtomicUsize,
    pub fail_renames: AtomicBool,
}

impl CountingFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renames, removes and truncating creates performed so far
    pub fn mutations(&self) -> usize {
        self.renames.load(Ordering::SeqCst)
            + self.removes.load(Ordering::SeqCst)
            + self.creates.load(Ordering::SeqCst)
    }

    pub fn set_fail_renames(&self, fail: bool) {
        self.fail_renames.store(fail, Ordering::SeqCst);
    }
}

impl FileSystem for CountingFileSystem {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.inner.create_dir_all(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn size(&self, path: &Path) -> io::Result<u64> {
        self.inner.size(path)
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        self.inner.modified(path)
    }

    fn open_append(&self, path: &Path) -> io::Result<File> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        self.inner.open_append(path)
    }

    fn create(&self, path: &Path) -> io::Result<File> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.renames.fetch_add(1, Ordering::SeqCst);
        if self.fail_renames.load(Ordering::SeqCst) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "rename disabled for test",
            ));
        }
        self.inner.rename(from, to)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        self.inner.remove(path)
    }

    fn list(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        self.inner.list(dir)
    }
}
