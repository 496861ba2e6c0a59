//! Create command implementation.
//!
//! This module implements the `create` command, which adds a worktree for
//! a branch below the workspace directory and renders every `.env.example`
//! of the repository into it.

use crate::error::CliError;
use crate::utils::{
    check_report, open_manager, print_outcome, print_summary, shorten_path, stdio_resolver,
    validate_branch, GlobalOptions,
};
use clap::Args;
use sprout::template::Environment;

/// Create a workspace for a branch.
#[derive(Args)]
pub struct CreateCommand {
    /// Branch to check out; created from HEAD if it does not exist
    pub branch: String,

    /// Print only the workspace path on stdout
    #[arg(long)]
    pub path: bool,
}

impl CreateCommand {
    /// Execute the create command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let logger = global.logger();

        // 1. Locate the repository and its configuration
        validate_branch(&self.branch)?;
        let manager = open_manager()?;
        let base = manager.workspace_path(&self.branch);

        // 2. Resolver and context shared by every template of this run
        let mut resolver = stdio_resolver(manager.config())?;
        let mut ctx = manager.resolution_context(
            Environment::from_process(),
            Some(&self.branch),
            resolver.allocator().source(),
        );

        logger.progress(&format!(
            "Creating workspace for branch '{}'...",
            self.branch
        ));

        // 3. Add the worktree and render its env files
        let created = manager.create(&self.branch, &mut resolver, &mut ctx, |outcome| {
            print_outcome(&logger, outcome, &base);
        })?;

        if created.report.has_failures() {
            logger.progress("");
            print_summary(&logger, &created.report);
            return check_report(&created.report);
        }

        // 4. Report
        if self.path {
            println!("{}", created.path.display());
        } else {
            logger.progress("");
            logger.progress(&format!(
                "✅ Workspace '{}' created successfully!",
                self.branch
            ));
            logger.progress("");
            logger.progress("Navigate to your workspace with:");
            logger.progress(&format!("  cd {}", shorten_path(&created.path)));
        }

        Ok(())
    }
}
