use clap::Parser;
use photoflow::cli::{CliArgs, run_cli};
use photoflow::output::OutputFormatter;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "photoflow=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    match run_cli(&args) {
        Ok(summary) => {
            OutputFormatter::run_summary(&summary);
            if summary.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            OutputFormatter::run_error(&e);
            ExitCode::FAILURE
        }
    }
}
