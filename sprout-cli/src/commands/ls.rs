//! Ls command implementation.
//!
//! This module implements the `ls` command, which displays the workspaces
//! of the current repository as a table or as JSON.

use crate::error::CliError;
use crate::utils::{current_dir, format_timestamp, open_manager, relative_to, GlobalOptions};
use clap::{Args, ValueEnum};
use sprout::Workspace;
use std::io::Write;
use std::path::Path;

/// Column headers for table output.
const COLUMN_HEADERS: [&str; 4] = ["BRANCH", "PATH", "STATUS", "MODIFIED"];

/// List workspaces.
#[derive(Args)]
pub struct LsCommand {
    /// Output format
    #[arg(long, value_enum, default_value = "table", ignore_case = true)]
    pub format: OutputFormat,
}

/// Output format for the ls command.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated table format (human-readable)
    Table,
    /// JSON format
    Json,
}

impl LsCommand {
    /// Execute the ls command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let logger = global.logger();
        let cwd = current_dir()?;
        let manager = open_manager()?;
        let workspaces = manager.list()?;

        match self.format {
            OutputFormat::Table if workspaces.is_empty() => {
                logger.progress("No sprout-managed worktrees found");
                Ok(())
            }
            OutputFormat::Table => format_as_table(&workspaces, manager.root(), &cwd),
            OutputFormat::Json => format_as_json(&workspaces, manager.root(), &cwd),
        }
    }
}

fn modified(workspace: &Workspace) -> String {
    workspace
        .modified
        .map_or_else(|| "-".to_string(), format_timestamp)
}

/// Format workspaces as a human-readable table.
fn format_as_table(workspaces: &[Workspace], root: &Path, cwd: &Path) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    writeln!(handle, "{}", COLUMN_HEADERS.join("\t"))?;

    for workspace in workspaces {
        let status = if workspace.contains(cwd) { "current" } else { "-" };
        writeln!(
            handle,
            "{}\t{}\t{}\t{}",
            workspace.branch,
            relative_to(&workspace.path, root),
            status,
            modified(workspace),
        )?;
    }

    Ok(())
}

/// Format workspaces as JSON.
fn format_as_json(workspaces: &[Workspace], root: &Path, cwd: &Path) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let json_data: Vec<serde_json::Value> = workspaces
        .iter()
        .map(|w| {
            serde_json::json!({
                "branch": w.branch,
                "path": w.path.display().to_string(),
                "relative_path": relative_to(&w.path, root),
                "current": w.contains(cwd),
                "modified": w.modified.map(format_timestamp),
            })
        })
        .collect();

    serde_json::to_writer_pretty(&mut handle, &json_data).map_err(std::io::Error::other)?;

    writeln!(handle)?;

    Ok(())
}
