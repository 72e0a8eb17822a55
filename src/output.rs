//! Output formatting and styling module.
//!
//! Every line the user sees goes through [`OutputFormatter`]. It only formats;
//! the stages decide what happened.

use crate::pipeline::{RunError, RunSummary};
use crate::stage::{Action, FilesystemError, StageReport};
use colored::*;

/// Prints progress lines, summaries and errors with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use photoflow::output::OutputFormatter;
    /// OutputFormatter::success("Moved A.jpg to jpegs/A.jpg");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    ///
    /// # Arguments
    ///
    /// * `header` - The header text
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// One line describing a single action.
    ///
    /// # Example
    ///
    /// ```
    /// use photoflow::output::OutputFormatter;
    /// use photoflow::stage::Action;
    /// use std::path::PathBuf;
    ///
    /// let line = OutputFormatter::action_line(&Action::FileDeleted(PathBuf::from("C.raf")));
    /// assert_eq!(line, "Deleted C.raf");
    /// ```
    pub fn action_line(action: &Action) -> String {
        match action {
            Action::DirectoryCreated(path) => format!("Created {}", path.display()),
            Action::DirectoryExists(path) => {
                format!("{} already exists. Skipping creation.", path.display())
            }
            Action::FileMoved { from, to } => {
                format!("Moved {} to {}", from.display(), to.display())
            }
            Action::FileDeleted(path) => format!("Deleted {}", path.display()),
        }
    }

    /// Prints the stage header, a line per action, and any collected failures.
    ///
    /// Existing directories are printed as info, everything else that was
    /// done as a success line.
    ///
    /// # Arguments
    ///
    /// * `report` - The finished stage's report
    pub fn stage_report(report: &StageReport) {
        Self::header(&report.stage.to_uppercase());

        if report.actions.is_empty() && report.failures.is_empty() {
            Self::info("Nothing to do.");
        }
        for action in &report.actions {
            match action {
                Action::DirectoryExists(_) => Self::info(&Self::action_line(action)),
                _ => Self::success(&Self::action_line(action)),
            }
        }
        for failure in &report.failures {
            Self::error(&failure.to_string());
        }
    }

    /// Prints totals for the whole run, followed by the failure list if any.
    ///
    /// # Arguments
    ///
    /// * `summary` - Reports of every stage that ran
    pub fn run_summary(summary: &RunSummary) {
        Self::header("SUMMARY");
        println!(
            "Directories created: {}",
            summary.directories_created().to_string().green()
        );
        println!("Files moved: {}", summary.files_moved().to_string().green());
        println!(
            "Files deleted: {}",
            summary.files_deleted().to_string().green()
        );

        let failures: Vec<&FilesystemError> = summary.failures().collect();
        if failures.is_empty() {
            println!();
            Self::success("Done.");
            return;
        }

        println!();
        Self::warning(&format!(
            "{} {} failed.",
            failures.len(),
            if failures.len() == 1 {
                "operation"
            } else {
                "operations"
            }
        ));
        for failure in failures {
            Self::error(&failure.to_string());
        }
    }

    /// Prints an error that stopped the run.
    pub fn run_error(error: &RunError) {
        Self::error(&format!("Error: {}", error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_action_lines() {
        assert_eq!(
            OutputFormatter::action_line(&Action::DirectoryCreated(PathBuf::from("/p/jpegs"))),
            "Created /p/jpegs"
        );
        assert_eq!(
            OutputFormatter::action_line(&Action::DirectoryExists(PathBuf::from("/p/raws"))),
            "/p/raws already exists. Skipping creation."
        );
        assert_eq!(
            OutputFormatter::action_line(&Action::FileMoved {
                from: PathBuf::from("/p/A.jpg"),
                to: PathBuf::from("/p/jpegs/A.jpg"),
            }),
            "Moved /p/A.jpg to /p/jpegs/A.jpg"
        );
        assert_eq!(
            OutputFormatter::action_line(&Action::FileDeleted(PathBuf::from("/p/raws/C.raf"))),
            "Deleted /p/raws/C.raf"
        );
    }
}
