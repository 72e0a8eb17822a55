//! Creates the preview, raw and edits stores under the base directory.
//!
//! Directories that already exist are reported and left alone, so running the
//! provisioner again is a no-op.

use crate::config::Config;
use crate::stage::{Action, FilesystemError, Stage, StageReport};
use std::fs;
use std::io::ErrorKind;
use tracing::debug;

pub struct DirectoryProvisioner;

impl Stage for DirectoryProvisioner {
    fn name(&self) -> &'static str {
        "provision"
    }

    fn run(&self, config: &Config) -> Result<StageReport, FilesystemError> {
        let mut report = StageReport::new(self.name());

        for path in [config.preview_path(), config.raw_path(), config.edits_path()] {
            if path.is_dir() {
                debug!(path = %path.display(), "directory already exists");
                report.record(Action::DirectoryExists(path));
                continue;
            }

            match fs::create_dir(&path) {
                Ok(()) => report.record(Action::DirectoryCreated(path)),
                // Lost a race with something else creating it.
                Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => {
                    report.record(Action::DirectoryExists(path))
                }
                Err(e) => return Err(FilesystemError::CreateDir { path, source: e }),
            }
        }

        Ok(report)
    }
}
