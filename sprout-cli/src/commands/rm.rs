//! Rm command implementation.
//!
//! This module implements the `rm` command, which removes the worktree of
//! a workspace and then offers to delete its branch.

use crate::error::CliError;
use crate::utils::{open_manager, validate_branch, GlobalOptions};
use clap::Args;
use sprout::template::{LinePrompter, Prompter};
use sprout::{Logger, WorkspaceManager};

/// Remove a workspace.
#[derive(Args)]
pub struct RmCommand {
    /// Branch name of the workspace
    pub branch: String,

    /// Answer yes to the removal and branch deletion questions
    #[arg(short, long)]
    pub yes: bool,
}

impl RmCommand {
    /// Execute the rm command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let logger = global.logger();
        validate_branch(&self.branch)?;
        let manager = open_manager()?;
        let mut prompter = LinePrompter::stdio();
        self.run(&manager, &mut prompter, &logger)
    }

    /// Removes the workspace, asking `prompter` for every confirmation.
    pub fn run(
        &self,
        manager: &WorkspaceManager,
        prompter: &mut dyn Prompter,
        logger: &Logger,
    ) -> Result<(), CliError> {
        let branch = self.branch.as_str();

        // 1. The workspace must exist
        manager.path_of(branch)?;

        let mut confirm = |question: &str| -> Result<bool, CliError> {
            if self.yes {
                Ok(true)
            } else {
                prompter
                    .confirm(question, false)
                    .map_err(|e| sprout::Error::Prompt(e).into())
            }
        };

        // 2. Confirm and remove the worktree
        if !confirm(&format!(
            "Are you sure you want to remove the worktree for branch '{branch}'?"
        ))? {
            logger.progress("Cancelled");
            return Ok(());
        }

        logger.progress(&format!("Removing worktree for branch {branch}..."));
        manager.remove(branch)?;
        logger.progress("✅ Worktree removed successfully");

        // 3. Offer to delete the branch
        if !confirm(&format!(
            "Do you also want to delete the git branch '{branch}'?"
        ))? {
            return Ok(());
        }

        let deleted = match manager.delete_branch(branch, false) {
            Ok(()) => true,
            Err(sprout::Error::Git { message, .. }) => {
                logger.warn(&message);
                // An unmerged branch is only force-deleted on an explicit answer.
                let force = !self.yes
                    && prompter
                        .confirm("Force delete the branch?", false)
                        .map_err(sprout::Error::Prompt)?;
                if force {
                    match manager.delete_branch(branch, true) {
                        Ok(()) => true,
                        Err(e) => {
                            logger.error(&format!("Error deleting branch: {e}"));
                            false
                        }
                    }
                } else {
                    logger.progress("Branch deletion cancelled");
                    false
                }
            }
            Err(e) => {
                logger.error(&format!("Error deleting branch: {e}"));
                false
            }
        };

        if deleted {
            logger.progress("✅ Branch deleted successfully");
        } else {
            logger.progress("Note: The worktree has been removed, but the branch still exists");
        }
        Ok(())
    }
}
