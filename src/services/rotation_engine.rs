//! Log file rotation engine
//!
//! Decides when the active file must be archived and performs the archive:
//! - Daily: rename to `<name>.<YYYY-MM-DD>` once per calendar day
//! - SizeBounded: rename into a ring of numbered backups `<name>.1 ..= <name>.N`,
//!   evicting the slot being reused
//!
//! The engine holds no lock itself. Callers pass the guarded [`LogState`] in,
//! which keeps every rotation decision under the logger's single lock.

use chrono::{DateTime, Local, NaiveDate};
use std::fmt::Display;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::errors::{LoggerError, LoggerResult};
use crate::domain::models::{RotationMode, DATE_FORMAT};
use crate::domain::ports::{Clock, FileSystem};

/// Mutable rotation state, guarded by the logger's lock
#[derive(Debug)]
pub struct LogState {
    /// Append handle to the active file; `None` if the last (re)open failed
    pub(crate) file: Option<File>,
    /// Daily mode: the date the active file belongs to
    pub(crate) current_date: NaiveDate,
    /// SizeBounded mode: most recently written backup slot (0 = none yet)
    pub(crate) current_suffix: u32,
    pub(crate) closed: bool,
}

impl LogState {
    /// Date the active file belongs to (meaningful in daily mode)
    pub const fn current_date(&self) -> NaiveDate {
        self.current_date
    }

    /// Most recently written backup slot (meaningful in size-bounded mode)
    pub const fn current_suffix(&self) -> u32 {
        self.current_suffix
    }

    /// Whether an active file handle is open
    pub const fn is_open(&self) -> bool {
        self.file.is_some()
    }
}

/// Rotation policy for one log file
#[derive(Debug)]
pub struct RotationEngine {
    mode: RotationMode,
    directory: PathBuf,
    base_filename: String,
    active_path: PathBuf,
    fs: Arc<dyn FileSystem>,
    clock: Arc<dyn Clock>,
}

impl RotationEngine {
    /// Create an engine for `directory/base_filename`
    pub fn new(
        mode: RotationMode,
        directory: impl Into<PathBuf>,
        base_filename: impl Into<String>,
        fs: Arc<dyn FileSystem>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let directory = directory.into();
        let base_filename = base_filename.into();
        let active_path = directory.join(&base_filename);
        Self {
            mode,
            directory,
            base_filename,
            active_path,
            fs,
            clock,
        }
    }

    /// Rotation mode fixed at construction
    pub const fn mode(&self) -> RotationMode {
        self.mode
    }

    /// Path of the active log file
    pub fn active_path(&self) -> &Path {
        &self.active_path
    }

    /// Clock driving daily rotation and timestamps
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Path of the backup `<base_filename>.<suffix>`
    pub fn backup_path(&self, suffix: impl Display) -> PathBuf {
        self.directory
            .join(format!("{}.{suffix}", self.base_filename))
    }

    /// Create the directory, recover state from existing files and open the
    /// active file.
    ///
    /// A recovered file that is already due for rotation is rotated here.
    pub fn open(&self) -> LoggerResult<LogState> {
        self.fs
            .create_dir_all(&self.directory)
            .map_err(|source| LoggerError::CreateDirectory {
                path: self.directory.clone(),
                source,
            })?;

        let mut state = LogState {
            file: None,
            current_date: self.clock.today(),
            current_suffix: 0,
            closed: false,
        };

        match self.mode {
            RotationMode::None => {}
            RotationMode::Daily => {
                if let Some(date) = self.recover_date(state.current_date) {
                    state.current_date = date;
                }
            }
            RotationMode::SizeBounded { max_backups, .. } => {
                state.current_suffix = self.recover_suffix(max_backups);
            }
        }

        if self.must_rotate(&state) {
            // failures are already reported; an open active file is all that matters here
            let _ = self.rotate(&mut state);
        }

        if state.file.is_none() {
            let file =
                self.fs
                    .open_append(&self.active_path)
                    .map_err(|source| LoggerError::OpenFile {
                        path: self.active_path.clone(),
                        source,
                    })?;
            state.file = Some(file);
        }

        debug!(
            path = %self.active_path.display(),
            mode = ?self.mode,
            current_date = %state.current_date,
            current_suffix = state.current_suffix,
            "opened active log file"
        );

        Ok(state)
    }

    /// Whether the active file must be archived now
    pub fn must_rotate(&self, state: &LogState) -> bool {
        if state.closed {
            return false;
        }
        match self.mode {
            RotationMode::None => false,
            RotationMode::Daily => self.clock.today() > state.current_date,
            RotationMode::SizeBounded {
                max_backups,
                max_bytes,
            } => max_backups > 1 && self.active_size() >= max_bytes,
        }
    }

    /// Archive the active file and open a fresh one.
    ///
    /// Re-checks [`must_rotate`](Self::must_rotate) first so concurrent
    /// triggers rotate only once; returns `Ok(false)` when nothing was due.
    /// Every step is attempted even after an earlier one failed, and the first
    /// failure is returned once the active file has been reopened.
    pub fn rotate(&self, state: &mut LogState) -> LoggerResult<bool> {
        if !self.must_rotate(state) {
            return Ok(false);
        }

        match self.mode {
            RotationMode::None => Ok(false),
            RotationMode::Daily => self.rotate_daily(state),
            RotationMode::SizeBounded { max_backups, .. } => self.rotate_ring(state, max_backups),
        }
    }

    /// Existing backups of this log file, sorted.
    ///
    /// Reads the directory once, so the cost does not depend on the ring size.
    pub fn backups(&self) -> Vec<PathBuf> {
        if self.mode == RotationMode::None {
            return Vec::new();
        }
        let entries = match self.fs.list(&self.directory) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %self.directory.display(), error = %e, "failed to list log directory");
                return Vec::new();
            }
        };

        let mut backups: Vec<PathBuf> = entries
            .into_iter()
            .filter(|path| {
                self.backup_suffix(path).is_some_and(|suffix| match self.mode {
                    RotationMode::None => false,
                    RotationMode::Daily => NaiveDate::parse_from_str(suffix, DATE_FORMAT).is_ok(),
                    RotationMode::SizeBounded { max_backups, .. } => is_ring_slot(suffix, max_backups),
                })
            })
            .collect();
        backups.sort();
        backups
    }

    fn rotate_daily(&self, state: &mut LogState) -> LoggerResult<bool> {
        let archive = self.backup_path(state.current_date.format(DATE_FORMAT));
        let today = self.clock.today();

        if self.fs.exists(&archive) {
            warn!(
                archive = %archive.display(),
                "daily archive already exists, keeping the active file"
            );
            state.current_date = today;
            return Ok(false);
        }

        state.file.take();
        let renamed = self
            .fs
            .rename(&self.active_path, &archive)
            .map_err(|source| LoggerError::Rename {
                from: self.active_path.clone(),
                to: archive.clone(),
                source,
            });
        if let Err(ref e) = renamed {
            warn!(error = %e, "failed to archive daily log file");
        }

        state.current_date = today;
        let reopened = self.reopen(state, renamed.is_ok());

        if renamed.is_ok() {
            info!(archive = %archive.display(), "rotated daily log file");
        }
        renamed.and(reopened).map(|()| true)
    }

    fn rotate_ring(&self, state: &mut LogState, max_backups: u32) -> LoggerResult<bool> {
        let next = state.current_suffix % max_backups + 1;
        let backup = self.backup_path(next);
        let mut first_error = None;

        state.file.take();

        if self.fs.exists(&backup) {
            if let Err(source) = self.fs.remove(&backup) {
                record(
                    &mut first_error,
                    LoggerError::RemoveBackup {
                        path: backup.clone(),
                        source,
                    },
                );
            }
        }

        let renamed = match self.fs.rename(&self.active_path, &backup) {
            Ok(()) => true,
            Err(source) => {
                record(
                    &mut first_error,
                    LoggerError::Rename {
                        from: self.active_path.clone(),
                        to: backup.clone(),
                        source,
                    },
                );
                false
            }
        };

        if let Err(e) = self.reopen(state, renamed) {
            first_error.get_or_insert(e);
        }
        state.current_suffix = next;

        match first_error {
            Some(e) => Err(e),
            None => {
                info!(backup = %backup.display(), slot = next, "rotated log file by size");
                Ok(true)
            }
        }
    }

    /// Open the active file again after an archive attempt.
    ///
    /// After a successful rename the file is created fresh; after a failed one
    /// the existing file is appended to so no lines are discarded.
    fn reopen(&self, state: &mut LogState, fresh: bool) -> LoggerResult<()> {
        let opened = if fresh {
            self.fs
                .create(&self.active_path)
                .map_err(|source| LoggerError::CreateFile {
                    path: self.active_path.clone(),
                    source,
                })
        } else {
            self.fs
                .open_append(&self.active_path)
                .map_err(|source| LoggerError::OpenFile {
                    path: self.active_path.clone(),
                    source,
                })
        };

        match opened {
            Ok(file) => {
                state.file = Some(file);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "no active log file after rotation");
                Err(e)
            }
        }
    }

    fn active_size(&self) -> u64 {
        self.fs.size(&self.active_path).unwrap_or_else(|e| {
            debug!(path = %self.active_path.display(), error = %e, "could not stat active log file");
            0
        })
    }

    /// Highest `n` such that backups `.1 ..= .n` all exist
    fn recover_suffix(&self, max_backups: u32) -> u32 {
        (1..=max_backups)
            .take_while(|suffix| self.fs.exists(&self.backup_path(suffix)))
            .last()
            .unwrap_or(0)
    }

    /// Date of a non-empty active file last written before `today`
    fn recover_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        if self.fs.size(&self.active_path).ok()? == 0 {
            return None;
        }
        let modified = self.fs.modified(&self.active_path).ok()?;
        let date = DateTime::<Local>::from(modified).date_naive();
        (date < today).then_some(date)
    }

    /// `suffix` of a file named `<base_filename>.<suffix>`
    fn backup_suffix<'p>(&self, path: &'p Path) -> Option<&'p str> {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.strip_prefix(self.base_filename.as_str()))
            .and_then(|rest| rest.strip_prefix('.'))
    }
}

/// Whether `suffix` names a slot `1..=max_backups` in canonical decimal form
fn is_ring_slot(suffix: &str, max_backups: u32) -> bool {
    !suffix.starts_with(['0', '+'])
        && suffix
            .parse::<u32>()
            .is_ok_and(|slot| (1..=max_backups).contains(&slot))
}

fn record(slot: &mut Option<LoggerError>, error: LoggerError) {
    warn!(error = %error, "log rotation step failed");
    slot.get_or_insert(error);
}
