//! Env command implementation.
//!
//! This module implements the `env` command, which renders every
//! `.env.example` below the current directory into a `.env` next to it.

use crate::error::CliError;
use crate::utils::{
    check_report, command_logger, current_dir, load_configuration, print_outcome, print_summary,
    stdio_resolver, GlobalOptions,
};
use clap::Args;
use sprout::envfile::TargetLayout;
use sprout::git;
use sprout::port::allocator::PortLedger;
use sprout::template::Environment;
use sprout::{EnvFilePlan, EnvFileProcessor, ResolutionContext, TemplateDiscovery, WorkspaceManager};

/// Create .env files from .env.example templates.
#[derive(Args)]
pub struct EnvCommand {
    /// Overwrite existing .env files
    #[arg(long)]
    pub force: bool,

    /// Show what would be created without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Never prompt; missing variables become empty
    #[arg(long)]
    pub silent: bool,
}

impl EnvCommand {
    /// Execute the env command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let logger = command_logger(global, self.silent);
        let cwd = current_dir()?;

        // 1. Configuration comes from the repository when there is one;
        //    its workspaces are never searched.
        let mut discovery = TemplateDiscovery::new(&cwd);
        let config = match WorkspaceManager::discover(&cwd) {
            Ok(manager) => {
                discovery = discovery.exclude(manager.workspaces_dir());
                manager.config().clone()
            }
            Err(sprout::Error::NotARepository { .. }) => load_configuration()?,
            Err(e) => return Err(e.into()),
        };

        // 2. Discover templates
        let templates = discovery.find()?;
        if templates.is_empty() {
            logger.progress("No .env.example files found in current directory or subdirectories");
            return Ok(());
        }

        let branch = git::current_branch(&cwd);
        logger.progress(&format!("Found {} .env.example file(s)", templates.len()));
        if let Some(ref branch) = branch {
            logger.progress(&format!("Current branch: {branch}"));
        }
        logger.progress("");

        // 3. Plan and process
        let plan = EnvFilePlan::build(templates, &TargetLayout::Sibling, self.force);

        let mut resolver = stdio_resolver(&config)?;
        let mut ctx = ResolutionContext::new(Environment::from_process())
            .with_branch_token(config.branch_token())
            .silent(self.silent);
        if !self.dry_run {
            ctx = ctx.with_ports(PortLedger::from_source(resolver.allocator().source()));
        }
        if let Some(branch) = branch {
            ctx = ctx.with_branch(branch);
        }

        let report = EnvFileProcessor::new(&mut resolver)
            .dry_run(self.dry_run)
            .process_with(&plan, &mut ctx, |outcome| {
                print_outcome(&logger, outcome, &cwd);
            });

        // 4. Summary
        logger.progress("");
        print_summary(&logger, &report);

        check_report(&report)
    }
}
