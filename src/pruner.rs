//! Deletes raw files that have no approved preview.
//!
//! The approved set is the stems of every file under the preview store
//! (optionally skipping hidden ones). Every file under the raw store whose
//! stem is not in that set is removed. Both stores are walked recursively.
//! Deletion is permanent.

use crate::config::Config;
use crate::stage::{Action, FilesystemError, Stage, StageReport, file_stem, is_hidden};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

pub struct OrphanPruner;

impl Stage for OrphanPruner {
    fn name(&self) -> &'static str {
        "prune"
    }

    fn run(&self, config: &Config) -> Result<StageReport, FilesystemError> {
        let mut report = StageReport::new(self.name());

        let approved = approved_stems(&config.preview_path(), config.ignore_hidden_files)?;
        debug!(count = approved.len(), "approved preview stems collected");

        prune_raws(&config.raw_path(), &approved, &mut report, |path| {
            fs::remove_file(path)
        });

        Ok(report)
    }
}

/// Walks `raw_root` and removes, via `remove`, every file whose stem is not in
/// `approved`.
///
/// Walk errors and failed removals are recorded in `report` and the walk
/// carries on with the next entry.
///
/// # Arguments
///
/// * `raw_root` - The raw store to walk recursively
/// * `approved` - Stems of the approved previews
/// * `report` - Receives a `FileDeleted` action or a failure per orphan
/// * `remove` - Deletes a single file
fn prune_raws(
    raw_root: &Path,
    approved: &HashSet<OsString>,
    report: &mut StageReport,
    remove: impl Fn(&Path) -> io::Result<()>,
) {
    for entry in WalkDir::new(raw_root).min_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry in raw store");
                report.fail(FilesystemError::Walk {
                    root: raw_root.to_path_buf(),
                    source: e,
                });
                continue;
            }
        };
        if is_directory(&entry) {
            continue;
        }

        let path = entry.path();
        let keep = file_stem(path).is_some_and(|stem| approved.contains(stem));
        if keep {
            continue;
        }

        match remove(path) {
            Ok(()) => report.record(Action::FileDeleted(path.to_path_buf())),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not delete orphan raw");
                report.fail(FilesystemError::Delete {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        }
    }
}

/// True for directories and for symlinks that point at one.
///
/// Links are not followed by the walk, so a symlinked file would otherwise
/// report neither as a file nor as a directory. Everything else, including
/// dangling links, counts as a file.
fn is_directory(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir())
}

/// Stems of every file under `preview_root`.
///
/// Any walk error is returned: deleting against an incomplete set could
/// remove raws whose preview simply wasn't read.
pub fn approved_stems(
    preview_root: &Path,
    ignore_hidden_files: bool,
) -> Result<HashSet<OsString>, FilesystemError> {
    let mut stems = HashSet::new();

    for entry in WalkDir::new(preview_root).min_depth(1) {
        let entry = entry.map_err(|e| FilesystemError::Walk {
            root: preview_root.to_path_buf(),
            source: e,
        })?;
        if is_directory(&entry) {
            continue;
        }
        if ignore_hidden_files && is_hidden(entry.file_name()) {
            debug!(path = %entry.path().display(), "hidden preview not approved");
            continue;
        }
        if let Some(stem) = file_stem(entry.path()) {
            stems.insert(stem.to_os_string());
        }
    }

    Ok(stems)
}
