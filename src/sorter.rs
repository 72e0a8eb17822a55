//! Moves previews and raws from the base directory into their stores.
//!
//! Only the immediate entries of the base directory are considered. Each
//! category's matches are listed in full before the first one is moved.

use crate::config::Config;
use crate::stage::{Action, FilesystemError, Stage, StageReport, has_extension};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct FileSorter;

impl Stage for FileSorter {
    fn name(&self) -> &'static str {
        "sort"
    }

    fn run(&self, config: &Config) -> Result<StageReport, FilesystemError> {
        let mut report = StageReport::new(self.name());

        let categories = [
            (&config.preview_extension, config.preview_path()),
            (&config.raw_extension, config.raw_path()),
        ];
        for (extension, destination_dir) in categories {
            let matches = matching_files(&config.base_dir, extension)?;
            debug!(
                extension = %extension,
                count = matches.len(),
                "files matched in base directory"
            );

            for file_path in matches {
                match move_into(&file_path, &destination_dir) {
                    Ok(action) => report.record(action),
                    Err(e) => {
                        warn!(error = %e, "could not move file");
                        report.fail(e);
                    }
                }
            }
        }

        Ok(report)
    }
}

/// Regular files directly inside `dir` whose name ends with `extension`,
/// sorted by name.
pub fn matching_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, FilesystemError> {
    let entries = fs::read_dir(dir).map_err(|e| FilesystemError::ReadDir {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut matches = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| FilesystemError::ReadDir {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();
        if has_extension(&entry.file_name(), extension) && path.is_file() {
            matches.push(path);
        }
    }

    matches.sort();
    Ok(matches)
}

/// Moves `file_path` into `destination_dir`, keeping its file name.
///
/// An existing file of the same name is replaced where the platform's rename
/// allows it (last write wins); otherwise the move fails.
fn move_into(file_path: &Path, destination_dir: &Path) -> Result<Action, FilesystemError> {
    let file_name = file_path
        .file_name()
        .ok_or_else(|| FilesystemError::Move {
            from: file_path.to_path_buf(),
            to: destination_dir.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "file has no name component",
            ),
        })?;

    let destination_path = destination_dir.join(file_name);
    if destination_path.exists() {
        warn!(
            path = %destination_path.display(),
            "destination already exists and will be overwritten"
        );
    }

    fs::rename(file_path, &destination_path).map_err(|e| FilesystemError::Move {
        from: file_path.to_path_buf(),
        to: destination_path.clone(),
        source: e,
    })?;

    Ok(Action::FileMoved {
        from: file_path.to_path_buf(),
        to: destination_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::provisioner::DirectoryProvisioner;
    use tempfile::TempDir;

    fn provisioned() -> (TempDir, Config) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config = test_config(temp_dir.path());
        DirectoryProvisioner
            .run(&config)
            .expect("Failed to provision directories");
        (temp_dir, config)
    }

    fn touch(path: &Path) {
        fs::write(path, b"data").expect("Failed to write test file");
    }

    #[test]
    fn test_moves_previews_and_raws_into_their_stores() {
        let (_temp_dir, config) = provisioned();
        touch(&config.base_dir.join("A.jpg"));
        touch(&config.base_dir.join("A.raf"));
        touch(&config.base_dir.join("notes.txt"));

        let report = FileSorter.run(&config).unwrap();

        assert!(report.is_success());
        assert!(config.preview_path().join("A.jpg").is_file());
        assert!(config.raw_path().join("A.raf").is_file());
        assert!(!config.base_dir.join("A.jpg").exists());
        assert!(!config.base_dir.join("A.raf").exists());
        assert!(config.base_dir.join("notes.txt").is_file());
        assert_eq!(
            report.actions,
            vec![
                Action::FileMoved {
                    from: config.base_dir.join("A.jpg"),
                    to: config.preview_path().join("A.jpg"),
                },
                Action::FileMoved {
                    from: config.base_dir.join("A.raf"),
                    to: config.raw_path().join("A.raf"),
                },
            ]
        );
    }

    #[test]
    fn test_extension_match_is_case_sensitive() {
        let (_temp_dir, config) = provisioned();
        touch(&config.base_dir.join("upper.JPG"));

        let report = FileSorter.run(&config).unwrap();

        assert!(report.actions.is_empty());
        assert!(config.base_dir.join("upper.JPG").is_file());
    }

    #[test]
    fn test_nested_files_are_not_sorted() {
        let (_temp_dir, config) = provisioned();
        let nested = config.base_dir.join("card01");
        fs::create_dir(&nested).expect("Failed to create nested dir");
        touch(&nested.join("B.jpg"));

        FileSorter.run(&config).unwrap();

        assert!(nested.join("B.jpg").is_file());
        assert!(!config.preview_path().join("B.jpg").exists());
    }

    #[test]
    fn test_directory_with_matching_name_is_left_alone() {
        let (_temp_dir, config) = provisioned();
        fs::create_dir(config.base_dir.join("folder.jpg")).expect("Failed to create dir");

        let report = FileSorter.run(&config).unwrap();

        assert!(report.actions.is_empty());
        assert!(config.base_dir.join("folder.jpg").is_dir());
    }

    #[test]
    fn test_missing_store_is_collected_and_other_files_still_move() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config = test_config(temp_dir.path());
        fs::create_dir(config.raw_path()).expect("Failed to create raw dir");
        touch(&config.base_dir.join("A.jpg"));
        touch(&config.base_dir.join("A.raf"));

        let report = FileSorter.run(&config).unwrap();

        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0], FilesystemError::Move { .. }));
        assert!(config.base_dir.join("A.jpg").is_file());
        assert!(config.raw_path().join("A.raf").is_file());
    }

    #[test]
    fn test_unreadable_base_directory_is_fatal() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config = test_config(&temp_dir.path().join("missing"));

        let result = FileSorter.run(&config);
        assert!(matches!(result, Err(FilesystemError::ReadDir { .. })));
    }

    #[test]
    fn test_matching_files_is_sorted_snapshot() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        for name in ["c.jpg", "a.jpg", "b.jpg", "d.raf"] {
            touch(&temp_dir.path().join(name));
        }

        let matches = matching_files(temp_dir.path(), ".jpg").unwrap();
        let names: Vec<_> = matches
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg", "c.jpg"]);
    }
}
