//! Runs the stages in order against one resolved configuration.

use crate::config::{Config, ConfigError};
use crate::provisioner::DirectoryProvisioner;
use crate::pruner::OrphanPruner;
use crate::sorter::FileSorter;
use crate::stage::{Action, FilesystemError, Stage, StageReport};
use thiserror::Error;
use tracing::{info, warn};

/// Errors that end a run before every stage has finished.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    /// The configuration could not be loaded; nothing was touched.
    Config(#[from] ConfigError),
    /// A stage hit an error it could not continue past.
    #[error("{stage} stage aborted: {source}")]
    Stage {
        stage: &'static str,
        source: FilesystemError,
    },
}

/// Reports of every stage that ran.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// One report per stage, in run order.
    pub reports: Vec<StageReport>,
}

impl RunSummary {
    /// All per-file failures across stages, in order.
    pub fn failures(&self) -> impl Iterator<Item = &FilesystemError> {
        self.reports.iter().flat_map(|r| r.failures.iter())
    }

    /// Returns true if no stage recorded a failure.
    ///
    /// A run can finish without a `RunError` and still not be a success; the
    /// binary exits non-zero in that case.
    pub fn is_success(&self) -> bool {
        self.reports.iter().all(StageReport::is_success)
    }

    fn count(&self, predicate: impl Fn(&Action) -> bool + Copy) -> usize {
        self.reports.iter().map(|r| r.count(predicate)).sum()
    }

    /// Number of store directories created by this run.
    pub fn directories_created(&self) -> usize {
        self.count(|a| matches!(a, Action::DirectoryCreated(_)))
    }

    /// Number of files moved into a store.
    pub fn files_moved(&self) -> usize {
        self.count(|a| matches!(a, Action::FileMoved { .. }))
    }

    /// Number of orphan raws deleted.
    pub fn files_deleted(&self) -> usize {
        self.count(|a| matches!(a, Action::FileDeleted(_)))
    }
}

/// An ordered list of stages.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// Creates a pipeline that runs `stages` in the given order.
    ///
    /// # Arguments
    ///
    /// * `stages` - The stages to run, first to last
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Provision, then sort, then prune.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use photoflow::{Config, Pipeline};
    /// use std::path::Path;
    ///
    /// let config = Config::resolve(Path::new("/path/to/shoot"), Path::new("photoflow.toml"))?;
    /// let summary = Pipeline::standard().run(&config, |report| {
    ///     println!("{}: {} actions", report.stage, report.actions.len());
    /// })?;
    /// println!("deleted {} raws", summary.files_deleted());
    /// # Ok::<(), photoflow::RunError>(())
    /// ```
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(DirectoryProvisioner),
            Box::new(FileSorter),
            Box::new(OrphanPruner),
        ])
    }

    /// Runs every stage in order, passing each finished report to `on_report`.
    ///
    /// A stage that collected per-file failures is the last one to run: later
    /// stages read what earlier ones left behind, and pruning after an
    /// incomplete sort would delete raws whose preview never reached its store.
    ///
    /// # Arguments
    ///
    /// * `config` - The resolved configuration every stage reads
    /// * `on_report` - Called with each report as soon as its stage finishes
    ///
    /// # Errors
    ///
    /// Returns `RunError::Stage` if a stage fails outright.
    pub fn run(
        &self,
        config: &Config,
        mut on_report: impl FnMut(&StageReport),
    ) -> Result<RunSummary, RunError> {
        let mut summary = RunSummary::default();

        for stage in &self.stages {
            info!(stage = stage.name(), "running stage");
            let report = stage.run(config).map_err(|source| RunError::Stage {
                stage: stage.name(),
                source,
            })?;
            on_report(&report);

            let halted = !report.is_success();
            summary.reports.push(report);
            if halted {
                warn!(stage = stage.name(), "stage had failures, stopping");
                break;
            }
        }

        Ok(summary)
    }
}
