//! Run configuration.
//!
//! Settings are read from a TOML file with a single `basic_configuration` table,
//! validated, and bound to the photo directory given on the command line. The
//! result is an immutable [`Config`] handed to every stage.
//!
//! # Configuration File Format
//!
//! ```toml
//! [basic_configuration]
//! jpeg_directory = "jpegs"
//! raw_directory = "raws"
//! edits_directory = "edits"
//! jpeg_file_extension = ".jpg"
//! raw_file_extension = ".raf"
//! ignore_hidden_files = true
//! ```

use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Configuration file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "photoflow.toml";

/// Errors that can occur while loading or validating the configuration.
///
/// All of these are raised before any directory is created or file touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// The configuration file exists but could not be read.
    #[error("could not read configuration file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Invalid TOML syntax, a missing table or a missing key.
    #[error("invalid configuration: {0}")]
    Invalid(String),
    /// A required value is present but empty.
    #[error("`{key}` must not be empty")]
    EmptyValue { key: &'static str },
    /// A directory name that is not a single plain path component.
    #[error("`{key}` must be a plain directory name, got '{value}'")]
    InvalidDirectoryName { key: &'static str, value: String },
    /// An extension without a leading dot or without anything after it.
    #[error("`{key}` must look like '.ext', got '{value}'")]
    InvalidExtension { key: &'static str, value: String },
    /// Two of the three subdirectories share a name.
    #[error("directory name '{0}' is used for more than one store")]
    DuplicateDirectory(String),
    /// Preview and raw files would be indistinguishable.
    #[error("preview and raw extensions are both '{0}'")]
    DuplicateExtension(String),
}

/// Contents of the configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub basic_configuration: BasicConfiguration,
}

/// The `basic_configuration` table. Every key is required.
#[derive(Debug, Clone, Deserialize)]
pub struct BasicConfiguration {
    /// Subdirectory holding approved previews.
    pub jpeg_directory: String,
    /// Subdirectory holding raw camera files.
    pub raw_directory: String,
    /// Subdirectory reserved for edited output.
    pub edits_directory: String,
    /// Preview extension including the leading dot, e.g. `.jpg`.
    pub jpeg_file_extension: String,
    /// Raw extension including the leading dot, e.g. `.raf`.
    pub raw_file_extension: String,
    /// Leave previews whose name starts with `.` out of the approved set.
    #[serde(deserialize_with = "strict_bool")]
    pub ignore_hidden_files: bool,
}

/// Accepts a TOML boolean or exactly the strings `"true"` / `"false"`.
fn strict_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Text(text) => match text.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected true or false, got '{}'",
                other
            ))),
        },
    }
}

impl Settings {
    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file does not exist,
    /// `ConfigError::Io` if it cannot be read and `ConfigError::Invalid`
    /// if parsing fails or a key is missing.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses settings from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Checks the values a well-formed file can still get wrong.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let basic = &self.basic_configuration;

        let directories = [
            ("jpeg_directory", &basic.jpeg_directory),
            ("raw_directory", &basic.raw_directory),
            ("edits_directory", &basic.edits_directory),
        ];
        for (key, value) in directories {
            validate_directory_name(key, value)?;
        }
        for (i, (_, name)) in directories.iter().enumerate() {
            if directories[i + 1..].iter().any(|(_, other)| other == name) {
                return Err(ConfigError::DuplicateDirectory((*name).clone()));
            }
        }

        validate_extension("jpeg_file_extension", &basic.jpeg_file_extension)?;
        validate_extension("raw_file_extension", &basic.raw_file_extension)?;
        if basic.jpeg_file_extension == basic.raw_file_extension {
            return Err(ConfigError::DuplicateExtension(
                basic.jpeg_file_extension.clone(),
            ));
        }

        Ok(())
    }
}

fn validate_directory_name(key: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::EmptyValue { key });
    }

    let mut components = Path::new(value).components();
    let plain = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !value.contains(['/', '\\']);

    if plain {
        Ok(())
    } else {
        Err(ConfigError::InvalidDirectoryName {
            key,
            value: value.to_string(),
        })
    }
}

fn validate_extension(key: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::EmptyValue { key });
    }
    if !value.starts_with('.') || value.len() < 2 || value.contains(['/', '\\']) {
        return Err(ConfigError::InvalidExtension {
            key,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Immutable configuration for a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The photographer's working directory.
    pub base_dir: PathBuf,
    pub preview_dir: String,
    pub raw_dir: String,
    pub edits_dir: String,
    pub preview_extension: String,
    pub raw_extension: String,
    pub ignore_hidden_files: bool,
}

impl Config {
    /// Loads and validates the configuration file and binds it to `base_dir`.
    ///
    /// Nothing on disk is modified.
    pub fn resolve(base_dir: &Path, config_path: &Path) -> Result<Self, ConfigError> {
        let settings = Settings::load(config_path)?;
        let config = Self::from_settings(base_dir, settings)?;
        debug!(config = ?config, path = %config_path.display(), "configuration resolved");
        Ok(config)
    }

    /// Validates already-parsed settings and binds them to `base_dir`.
    pub fn from_settings(base_dir: &Path, settings: Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let basic = settings.basic_configuration;

        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            preview_dir: basic.jpeg_directory,
            raw_dir: basic.raw_directory,
            edits_dir: basic.edits_directory,
            preview_extension: basic.jpeg_file_extension,
            raw_extension: basic.raw_file_extension,
            ignore_hidden_files: basic.ignore_hidden_files,
        })
    }

    /// `<base>/<preview_dir>`
    pub fn preview_path(&self) -> PathBuf {
        self.base_dir.join(&self.preview_dir)
    }

    /// `<base>/<raw_dir>`
    pub fn raw_path(&self) -> PathBuf {
        self.base_dir.join(&self.raw_dir)
    }

    /// `<base>/<edits_dir>`
    pub fn edits_path(&self) -> PathBuf {
        self.base_dir.join(&self.edits_dir)
    }
}

/// Config used by unit tests: `jpegs`/`raws`/`edits`, `.jpg`/`.raf`, hidden previews ignored.
#[cfg(test)]
pub(crate) fn test_config(base: &Path) -> Config {
    Config {
        base_dir: base.to_path_buf(),
        preview_dir: "jpegs".to_string(),
        raw_dir: "raws".to_string(),
        edits_dir: "edits".to_string(),
        preview_extension: ".jpg".to_string(),
        raw_extension: ".raf".to_string(),
        ignore_hidden_files: true,
    }
}
