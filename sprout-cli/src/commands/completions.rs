//! Shell completion generation command.
//!
//! This module provides the `completions` command which generates shell completion
//! scripts for bash, zsh, fish, and PowerShell.

use crate::cli::Cli;
use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io;

/// Name of the installed binary.
const BIN_NAME: &str = "sprout";

/// Generate shell completion scripts
#[derive(Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsCommand {
    /// Execute the completions command.
    pub fn execute(&self, global: &GlobalOptions) -> Result<(), CliError> {
        let logger = global.logger();
        let mut cmd = Cli::command();

        logger.progress(&format!("# Generating {} completion script", self.shell));
        logger.progress("# Run the following command to enable completions:");

        match self.shell {
            Shell::Bash => {
                logger.progress(
                    "#   sprout completions bash > ~/.local/share/bash-completion/completions/sprout",
                );
                logger.progress("# Or source it directly in ~/.bashrc:");
                logger.progress("#   eval \"$(sprout completions bash)\"");
            }
            Shell::Zsh => {
                logger.progress("#   sprout completions zsh > ~/.zsh/completions/_sprout");
                logger.progress("# Make sure ~/.zsh/completions is in your $fpath");
            }
            Shell::Fish => {
                logger.progress(
                    "#   sprout completions fish > ~/.config/fish/completions/sprout.fish",
                );
            }
            Shell::PowerShell => {
                logger.progress("#   sprout completions powershell | Out-String | Invoke-Expression");
            }
            _ => {}
        }

        generate(self.shell, &mut cmd, BIN_NAME, &mut io::stdout());

        Ok(())
    }
}
