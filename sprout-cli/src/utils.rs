//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including repository discovery, resolver construction and output
//! formatting.

use crate::error::CliError;
use sprout::port::allocator::PortAllocator;
use sprout::port::registry::SystemPortSource;
use sprout::template::LinePrompter;
use sprout::{
    init_logger, Config, ConfigBuilder, EnvFileReport, FileOutcome, LogLevel, Logger, Resolver,
    WorkspaceManager,
};
use std::env;
use std::io::{Stderr, StdinLock};
use std::path::{Path, PathBuf};

/// Resolver used by the commands: real stdin/stderr prompts and the host's
/// port table.
pub type StdioResolver = Resolver<LinePrompter<StdinLock<'static>, Stderr>, SystemPortSource>;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,
}

impl GlobalOptions {
    /// The logger selected by the verbosity flags.
    pub fn logger(&self) -> Logger {
        init_logger(self.verbose, self.quiet)
    }
}

/// The current working directory.
pub fn current_dir() -> Result<PathBuf, CliError> {
    Ok(env::current_dir()?)
}

/// Checks that `branch` is usable as a git branch and as a directory below
/// the workspace root.
///
/// This is a subset of `git check-ref-format --branch`: it rejects names that
/// could escape the workspace directory or be read as an option.
pub fn validate_branch(branch: &str) -> Result<(), CliError> {
    let invalid = |reason: &str| -> Result<(), CliError> {
        Err(CliError::InvalidArguments(format!(
            "invalid branch name '{branch}': {reason}"
        )))
    };

    if branch.is_empty() {
        return invalid("must not be empty");
    }
    if branch.starts_with('-') {
        return invalid("must not start with '-'");
    }
    if branch.starts_with('/') || branch.ends_with('/') || branch.contains("//") {
        return invalid("must not start or end with '/' or contain '//'");
    }
    if branch
        .split('/')
        .any(|part| part.starts_with('.') || part.ends_with(".lock"))
    {
        return invalid("path components must not start with '.' or end with '.lock'");
    }
    if branch.contains("..") || branch.contains("@{") || branch == "@" {
        return invalid("must not contain '..' or '@{'");
    }
    if let Some(c) = branch
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || "~^:?*[\\".contains(*c))
    {
        return invalid(&format!("must not contain {c:?}"));
    }
    Ok(())
}

/// Opens the workspaces of the repository containing the current directory.
pub fn open_manager() -> Result<WorkspaceManager, CliError> {
    let cwd = current_dir()?;
    Ok(WorkspaceManager::discover(&cwd)?)
}

/// Load configuration without a repository.
///
/// Only defaults and `SPROUT_*` environment variables apply.
pub fn load_configuration() -> Result<Config, CliError> {
    ConfigBuilder::new()
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Builds the interactive resolver for `config`'s port range.
pub fn stdio_resolver(config: &Config) -> Result<StdioResolver, CliError> {
    let allocator = PortAllocator::new(SystemPortSource::new(), config.port_range()?);
    Ok(Resolver::new(allocator, LinePrompter::stdio()))
}

/// A logger that is quiet when `silent` is set, and `global`'s otherwise.
pub fn command_logger(global: &GlobalOptions, silent: bool) -> Logger {
    if silent {
        Logger::new(LogLevel::Quiet)
    } else {
        global.logger()
    }
}

/// Format a timestamp for display.
pub fn format_timestamp(ts: std::time::SystemTime) -> String {
    use chrono::{DateTime, Local};
    let dt: DateTime<Local> = ts.into();
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Shorten a path for display.
///
/// If the path is within the home directory, show it as ~/...
/// Otherwise, show the full path.
pub fn shorten_path(path: &Path) -> String {
    if let Some(home) = home::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}

/// `path` relative to `base` when it is below it, unchanged otherwise.
pub fn relative_to(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Prints the progress line for one env-file outcome.
///
/// Failures are logged as errors, so they show even in quiet and silent
/// runs.
pub fn print_outcome(logger: &Logger, outcome: &FileOutcome, base: &Path) {
    let path = relative_to(outcome.path(), base);
    match outcome {
        FileOutcome::Created { .. } => logger.progress(&format!("✓ Created {path}")),
        FileOutcome::Overwritten { .. } => logger.progress(&format!("✓ Overwritten {path}")),
        FileOutcome::WouldCreate { .. } => logger.progress(&format!("Would create {path}")),
        FileOutcome::WouldOverwrite { .. } => logger.progress(&format!("Would overwrite {path}")),
        FileOutcome::Skipped { .. } => {
            logger.progress(&format!("Skipping {path} (already exists)"));
        }
        FileOutcome::Failed { reason, .. } => {
            logger.error(&format!("Failed to create {path}: {reason}"));
        }
    }
}

/// Renders the summary table of `report`.
pub fn format_summary(report: &EnvFileReport) -> Vec<String> {
    let rows = report.counts();
    let width = rows
        .iter()
        .map(|(label, _)| label.len())
        .chain(std::iter::once("Status".len()))
        .max()
        .unwrap_or(0);

    let mut lines = vec!["Summary".to_string(), format!("{:<width$}  Count", "Status")];
    lines.extend(
        rows.iter()
            .map(|(label, count)| format!("{label:<width$}  {count:>5}")),
    );
    lines
}

/// Prints the summary table of `report`.
pub fn print_summary(logger: &Logger, report: &EnvFileReport) {
    for line in format_summary(report) {
        logger.progress(&line);
    }
}

/// Turns failed files into a command failure.
pub fn check_report(report: &EnvFileReport) -> Result<(), CliError> {
    let failed = report.failures().count();
    if failed == 0 {
        Ok(())
    } else {
        Err(CliError::SemanticFailure(format!(
            "Failed to create {failed} .env file(s)"
        )))
    }
}
