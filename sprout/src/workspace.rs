//! Per-branch workspaces.
//!
//! A workspace is a git worktree at `<repository root>/<directory>/<branch>`
//! (the directory defaults to `.sprout`) whose `.env` files were rendered
//! from the repository's `.env.example` templates when it was created.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use rand::Rng;

use crate::config::{Config, ConfigBuilder};
use crate::envfile::{
    EnvFilePlan, EnvFileProcessor, EnvFileReport, FileOutcome, TargetLayout, TemplateDiscovery,
    TEMPLATE_FILE_NAME,
};
use crate::error::{Error, Result};
use crate::git;
use crate::port::allocator::PortLedger;
use crate::port::registry::PortSource;
use crate::template::{Environment, Prompter, ResolutionContext, Resolver};

/// A workspace found by [`WorkspaceManager::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// The branch checked out, or the directory name when detached.
    pub branch: String,
    /// Absolute path of the worktree.
    pub path: PathBuf,
    /// Last modification time of the worktree directory.
    pub modified: Option<SystemTime>,
}

impl Workspace {
    /// Returns `true` if `dir` is this workspace or inside it.
    #[must_use]
    pub fn contains(&self, dir: &Path) -> bool {
        let dir = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        dir.starts_with(&self.path)
    }
}

/// Result of [`WorkspaceManager::create`].
#[derive(Debug, Clone)]
pub struct CreatedWorkspace {
    /// Path of the new worktree.
    pub path: PathBuf,
    /// What happened to each env file.
    pub report: EnvFileReport,
}

/// Manages the workspaces of one repository.
///
/// # Examples
///
/// ```no_run
/// use sprout::workspace::WorkspaceManager;
/// use std::path::Path;
///
/// let manager = WorkspaceManager::discover(Path::new(".")).unwrap();
/// for workspace in manager.list().unwrap() {
///     println!("{} -> {}", workspace.branch, workspace.path.display());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    root: PathBuf,
    config: Config,
}

impl WorkspaceManager {
    /// Creates a manager for the repository rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Finds the repository containing `dir` and loads its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotARepository`] outside a repository, or a
    /// configuration error.
    pub fn discover(dir: &Path) -> Result<Self> {
        let root = git::repository_root(dir)?;
        let config = ConfigBuilder::new().with_root(&root).build()?;
        log::debug!("repository root {}", root.display());
        Ok(Self::new(root, config))
    }

    /// The repository root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The effective configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Directory holding every workspace.
    #[must_use]
    pub fn workspaces_dir(&self) -> PathBuf {
        self.root.join(self.config.directory())
    }

    /// Where the workspace for `branch` lives (whether or not it exists).
    #[must_use]
    pub fn workspace_path(&self, branch: &str) -> PathBuf {
        self.workspaces_dir().join(branch)
    }

    /// Returns `true` if git has a worktree at the workspace path of
    /// `branch`.
    #[must_use]
    pub fn exists(&self, branch: &str) -> bool {
        git::worktree_exists(&self.root, &self.workspace_path(branch))
    }

    /// Path of the existing workspace for `branch`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkspaceNotFound`] if there is none.
    pub fn path_of(&self, branch: &str) -> Result<PathBuf> {
        if self.exists(branch) {
            Ok(self.workspace_path(branch))
        } else {
            Err(Error::WorkspaceNotFound {
                branch: branch.to_string(),
            })
        }
    }

    /// Templates to render for a new workspace, sorted by path.
    ///
    /// Existing workspaces and `.git` are not searched.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository root cannot be read.
    pub fn templates(&self) -> Result<Vec<PathBuf>> {
        TemplateDiscovery::new(&self.root)
            .exclude(self.config.directory())
            .find()
    }

    /// A resolution context for rendering the templates of `branch`.
    ///
    /// The port ledger starts from a snapshot of `ports`.
    #[must_use]
    pub fn resolution_context(
        &self,
        environment: Environment,
        branch: Option<&str>,
        ports: &dyn PortSource,
    ) -> ResolutionContext {
        let ctx = ResolutionContext::new(environment)
            .with_branch_token(self.config.branch_token())
            .with_ports(PortLedger::from_source(ports));
        match branch {
            Some(branch) => ctx.with_branch(branch),
            None => ctx,
        }
    }

    /// Creates the workspace for `branch` and renders its env files.
    ///
    /// The branch is created from the current HEAD if it does not exist.
    /// Every `.env.example` below the repository root is rendered to the
    /// same relative location inside the new worktree. Per-file failures
    /// are recorded in the report; `on_outcome` sees each outcome as soon
    /// as it is known.
    ///
    /// # Errors
    ///
    /// - [`Error::TemplateNotFound`] if the root has no `.env.example`
    /// - [`Error::WorkspaceExists`] if the workspace already exists
    /// - [`Error::Git`] if the worktree cannot be added
    pub fn create<P, S, R>(
        &self,
        branch: &str,
        resolver: &mut Resolver<P, S, R>,
        ctx: &mut ResolutionContext,
        on_outcome: impl FnMut(&FileOutcome),
    ) -> Result<CreatedWorkspace>
    where
        P: Prompter,
        S: PortSource,
        R: Rng,
    {
        let root_template = self.root.join(TEMPLATE_FILE_NAME);
        if !root_template.is_file() {
            return Err(Error::TemplateNotFound {
                path: root_template,
            });
        }
        if self.exists(branch) {
            return Err(Error::WorkspaceExists {
                branch: branch.to_string(),
            });
        }

        let templates = self.templates()?;
        let path = self.workspace_path(branch);
        git::create_worktree(&self.root, &path, branch)?;
        log::debug!("created worktree {}", path.display());

        let layout = TargetLayout::Relocated {
            from: self.root.clone(),
            to: path.clone(),
        };
        let plan = EnvFilePlan::build(templates, &layout, false);
        let report = EnvFileProcessor::new(resolver).process_with(&plan, ctx, on_outcome);

        Ok(CreatedWorkspace { path, report })
    }

    /// Every workspace under [`Self::workspaces_dir`], sorted by branch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Git`] if the worktrees cannot be listed.
    pub fn list(&self) -> Result<Vec<Workspace>> {
        let dir = self.workspaces_dir();
        let dir = dir.canonicalize().unwrap_or(dir);

        let mut workspaces: Vec<Workspace> = git::list_worktrees(&self.root)?
            .into_iter()
            .filter_map(|info| {
                let path = info.path.canonicalize().unwrap_or(info.path);
                let relative = path.strip_prefix(&dir).ok()?;
                let branch = info
                    .branch
                    .unwrap_or_else(|| relative.to_string_lossy().into_owned());
                let modified = path.metadata().and_then(|m| m.modified()).ok();
                Some(Workspace {
                    branch,
                    path,
                    modified,
                })
            })
            .collect();

        workspaces.sort_by(|a, b| a.branch.cmp(&b.branch));
        Ok(workspaces)
    }

    /// Removes the worktree of `branch`; the branch itself is kept.
    ///
    /// # Errors
    ///
    /// - [`Error::WorkspaceNotFound`] if there is no such workspace
    /// - [`Error::Git`] if git refuses, e.g. because of local changes
    pub fn remove(&self, branch: &str) -> Result<()> {
        let path = self.path_of(branch)?;
        git::remove_worktree(&self.root, &path)
    }

    /// Deletes the local branch `branch`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Git`] if git refuses, e.g. an unmerged branch
    /// without `force`.
    pub fn delete_branch(&self, branch: &str, force: bool) -> Result<()> {
        git::delete_branch(&self.root, branch, force)
    }
}
