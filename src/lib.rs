//! photoflow - organize a photographer's working directory
//!
//! This library provisions the preview, raw and edits stores under a working
//! directory, sorts previews and raws into them by extension, and deletes raw
//! files whose stem has no approved preview.

pub mod cli;
pub mod config;
pub mod output;
pub mod pipeline;
pub mod provisioner;
pub mod pruner;
pub mod sorter;
pub mod stage;

pub use config::{Config, ConfigError, Settings};
pub use pipeline::{Pipeline, RunError, RunSummary};
pub use provisioner::DirectoryProvisioner;
pub use pruner::OrphanPruner;
pub use sorter::FileSorter;
pub use stage::{Action, FilesystemError, Stage, StageReport};

pub use cli::{CliArgs, run_cli};
