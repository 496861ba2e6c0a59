//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    CompletionsCommand, CreateCommand, EnvCommand, LsCommand, PathCommand, RmCommand,
};
use clap::{Parser, Subcommand};

/// Command-line tool for per-branch git worktree workspaces.
#[derive(Parser)]
#[command(name = "sprout")]
#[command(
    version,
    about = "Manage per-branch git worktree workspaces",
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Create a workspace for a branch
    Create(CreateCommand),

    /// List workspaces
    #[command(visible_alias = "list")]
    Ls(LsCommand),

    /// Remove a workspace
    #[command(visible_alias = "remove")]
    Rm(RmCommand),

    /// Print the path of a workspace
    Path(PathCommand),

    /// Create .env files from .env.example templates
    Env(EnvCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
