//! Path command implementation.
//!
//! Prints nothing but the absolute path of a workspace, so it composes with
//! `cd "$(sprout path <branch>)"`.

use crate::error::CliError;
use crate::utils::{open_manager, validate_branch, GlobalOptions};
use clap::Args;

/// Print the path of a workspace.
#[derive(Args)]
pub struct PathCommand {
    /// Branch name of the workspace
    pub branch: String,
}

impl PathCommand {
    /// Execute the path command.
    pub fn execute(self, _global: &GlobalOptions) -> Result<(), CliError> {
        validate_branch(&self.branch)?;
        let manager = open_manager()?;
        let path = manager.path_of(&self.branch)?;
        println!("{}", path.display());
        Ok(())
    }
}
