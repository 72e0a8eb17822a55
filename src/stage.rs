//! The contract shared by the three pipeline stages.
//!
//! A stage takes the run [`Config`], does its filesystem work and returns a
//! [`StageReport`] of what it did. Errors that make the rest of the stage
//! meaningless come back as `Err`; per-file failures are collected in the
//! report so one bad file does not block unrelated ones.

use crate::config::Config;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Filename prefix marking a hidden file.
pub const HIDDEN_FILE_MARKER: char = '.';

/// A failed filesystem operation, with the path it failed on.
#[derive(Debug, Error)]
pub enum FilesystemError {
    /// Creating a store directory failed.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Listing the base directory failed.
    #[error("failed to read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Renaming a file into its store failed.
    #[error("failed to move {} to {}: {source}", from.display(), to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    /// Removing an orphan raw failed.
    #[error("failed to delete {}: {source}", path.display())]
    Delete {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Walking a store hit an unreadable entry.
    #[error("failed to walk {}: {source}", root.display())]
    Walk {
        root: PathBuf,
        source: walkdir::Error,
    },
}

/// Something a stage did to the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A store directory was created.
    DirectoryCreated(PathBuf),
    /// The directory was already there; nothing was done.
    DirectoryExists(PathBuf),
    /// A file was renamed from the base directory into a store.
    FileMoved { from: PathBuf, to: PathBuf },
    /// An orphan raw was removed for good.
    FileDeleted(PathBuf),
}

/// What a single stage did, and what it failed to do.
#[derive(Debug)]
pub struct StageReport {
    /// Name of the stage that produced this report.
    pub stage: &'static str,
    /// Actions in the order they were taken.
    pub actions: Vec<Action>,
    /// Per-file errors that did not stop the stage.
    pub failures: Vec<FilesystemError>,
}

impl StageReport {
    /// Creates an empty report for the named stage.
    pub fn new(stage: &'static str) -> Self {
        Self {
            stage,
            actions: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Appends an action that was carried out.
    ///
    /// # Arguments
    ///
    /// * `action` - What was done to the filesystem
    pub fn record(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// Appends a per-file failure. The stage keeps going; the pipeline stops
    /// after it.
    ///
    /// # Arguments
    ///
    /// * `error` - The failed operation and the path it failed on
    pub fn fail(&mut self, error: FilesystemError) {
        self.failures.push(error);
    }

    /// Returns true if nothing went wrong in this stage.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of actions matching `predicate`.
    ///
    /// # Example
    ///
    /// ```
    /// use photoflow::stage::{Action, StageReport};
    /// use std::path::PathBuf;
    ///
    /// let mut report = StageReport::new("prune");
    /// report.record(Action::FileDeleted(PathBuf::from("raws/C.raf")));
    /// assert_eq!(report.count(|a| matches!(a, Action::FileDeleted(_))), 1);
    /// ```
    pub fn count(&self, predicate: impl Fn(&Action) -> bool) -> usize {
        self.actions.iter().filter(|a| predicate(a)).count()
    }
}

/// One step of the pipeline.
pub trait Stage {
    /// Short name used in output and logs.
    fn name(&self) -> &'static str;

    /// Runs the stage against the filesystem described by `config`.
    ///
    /// # Errors
    ///
    /// Returns a `FilesystemError` when the stage cannot continue at all.
    /// Failures limited to a single file are recorded in the report instead.
    fn run(&self, config: &Config) -> Result<StageReport, FilesystemError>;
}

/// Filename with its final extension removed.
///
/// `IMG_001.jpg` becomes `IMG_001`, `a.tar.gz` becomes `a.tar`, and a name with
/// no extension (or only a leading dot, like `.hidden`) is returned whole.
///
/// # Example
///
/// ```
/// use photoflow::stage::file_stem;
/// use std::ffi::OsStr;
/// use std::path::Path;
///
/// assert_eq!(file_stem(Path::new("raws/IMG_001.raf")), Some(OsStr::new("IMG_001")));
/// ```
pub fn file_stem(path: &Path) -> Option<&OsStr> {
    path.file_stem()
}

/// Returns true if the file name starts with [`HIDDEN_FILE_MARKER`].
pub fn is_hidden(name: &OsStr) -> bool {
    name.as_encoded_bytes().first() == Some(&(HIDDEN_FILE_MARKER as u8))
}

/// Literal, case-sensitive suffix match on the raw name bytes.
///
/// # Arguments
///
/// * `name` - A file name, not a full path
/// * `extension` - The configured extension including its dot, e.g. `.jpg`
pub fn has_extension(name: &OsStr, extension: &str) -> bool {
    name.as_encoded_bytes().ends_with(extension.as_bytes())
}
