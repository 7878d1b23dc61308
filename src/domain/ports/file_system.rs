//! File system port

use std::fmt::Debug;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Port trait for the filesystem operations the rotation engine performs.
///
/// The engine never touches `std::fs` directly. Everything it needs to decide
/// on and carry out a rotation goes through this trait, which lets tests count
/// operations or inject failures (a rename that fails, a directory that cannot
/// be created) without a real broken disk.
///
/// # Thread Safety
///
/// One instance is shared between writer threads and the background monitor,
/// so implementations must be `Send + Sync`.
pub trait FileSystem: Send + Sync + Debug {
    /// Create `path` and any missing parents
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Whether anything exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Current length of the file at `path` in bytes
    fn size(&self, path: &Path) -> io::Result<u64>;

    /// Last modification time of the file at `path`
    fn modified(&self, path: &Path) -> io::Result<SystemTime>;

    /// Open `path` for appending, creating it if missing
    fn open_append(&self, path: &Path) -> io::Result<File>;

    /// Create `path` as an empty file opened for appending, truncating any
    /// existing content
    fn create(&self, path: &Path) -> io::Result<File>;

    /// Rename `from` to `to`, replacing `to` if the platform allows it
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Remove the file at `path`
    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Paths of the entries directly inside `dir`
    fn list(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;
}
