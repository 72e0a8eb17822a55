//! Command-line interface module for photoflow.
//!
//! Parses arguments, resolves the configuration and drives the pipeline,
//! printing each stage's actions as it finishes.

use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::output::OutputFormatter;
use crate::pipeline::{Pipeline, RunError, RunSummary};
use clap::Parser;
use std::path::PathBuf;

/// Sort a photo working directory and prune raws without an approved preview.
#[derive(Debug, Clone, Parser)]
#[command(name = "photoflow", version, about)]
pub struct CliArgs {
    /// The photo working directory to organize.
    #[arg(short = 'p', long = "photo-directory", value_name = "PATH")]
    pub photo_directory: PathBuf,

    /// Configuration file to read.
    #[arg(
        short = 'c',
        long = "config-file",
        value_name = "PATH",
        default_value = DEFAULT_CONFIG_FILE
    )]
    pub config_file: PathBuf,
}

/// Runs photoflow with the given arguments.
///
/// The configuration is resolved first; if that fails nothing on disk has been
/// touched. The returned summary may still contain per-file failures, see
/// [`RunSummary::is_success`].
///
/// # Examples
///
/// ```no_run
/// use photoflow::cli::{CliArgs, run_cli};
/// use std::path::PathBuf;
///
/// let args = CliArgs {
///     photo_directory: PathBuf::from("/path/to/shoot"),
///     config_file: PathBuf::from("photoflow.toml"),
/// };
/// match run_cli(&args) {
///     Ok(summary) if summary.is_success() => println!("done"),
///     Ok(_) => eprintln!("finished with failures"),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(args: &CliArgs) -> Result<RunSummary, RunError> {
    let config = Config::resolve(&args.photo_directory, &args.config_file)?;

    OutputFormatter::info(&format!(
        "Organizing contents of: {}",
        config.base_dir.display()
    ));

    Pipeline::standard().run(&config, OutputFormatter::stage_report)
}
