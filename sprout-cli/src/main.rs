//! Main entry point for the sprout CLI.
//!
//! This is the command-line interface for sprout workspaces.
//! It provides commands for managing per-branch worktrees:
//! - `create`: Create a workspace and render its env files
//! - `ls`: List workspaces
//! - `rm`: Remove a workspace
//! - `path`: Print the path of a workspace
//! - `env`: Render `.env.example` templates in the current directory

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Route library log records through the CLI's verbosity
    let logger = sprout::init_logger(cli.verbose, cli.quiet);
    logger.install();

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::Create(cmd) => cmd.execute(&global),
        cli::Command::Ls(cmd) => cmd.execute(&global),
        cli::Command::Rm(cmd) => cmd.execute(&global),
        cli::Command::Path(cmd) => cmd.execute(&global),
        cli::Command::Env(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
