//! Worktree and branch management through the `git` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::error::{Error, Result};

/// Captured output of a successful git command.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Standard output, trimmed.
    pub stdout: String,
    /// Standard error, trimmed.
    pub stderr: String,
}

impl GitOutput {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }
}

/// Runs `git <args>` in `cwd` and captures its output.
///
/// # Errors
///
/// Returns [`Error::Git`] if git cannot be started or exits unsuccessfully.
/// The message is git's standard error (or standard output when that is
/// empty).
///
/// # Examples
///
/// ```no_run
/// use sprout::git::run_git;
/// use std::path::Path;
///
/// let output = run_git(Path::new("."), &["status", "--porcelain"]).unwrap();
/// println!("{}", output.stdout);
/// ```
pub fn run_git(cwd: &Path, args: &[&str]) -> Result<GitOutput> {
    let command = command_name(args);
    log::debug!("running git {} in {}", args.join(" "), cwd.display());

    let output = Command::new("git")
        .current_dir(cwd)
        .args(args)
        .output()
        .map_err(|e| Error::Git {
            command: command.clone(),
            message: format!("failed to execute git: {e}"),
        })?;

    let git_output = GitOutput::from_output(&output);
    if output.status.success() {
        Ok(git_output)
    } else {
        let message = if git_output.stderr.is_empty() {
            git_output.stdout
        } else {
            git_output.stderr
        };
        Err(Error::Git { command, message })
    }
}

/// Subcommand words up to the first option or path, e.g. `worktree add`.
fn command_name(args: &[&str]) -> String {
    args.iter()
        .take(2)
        .take_while(|arg| !arg.starts_with('-') && !arg.contains(['/', '\\']))
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns `true` if a local branch named `name` exists.
#[must_use]
pub fn branch_exists(root: &Path, name: &str) -> bool {
    let reference = format!("refs/heads/{name}");
    run_git(root, &["show-ref", "--verify", "--quiet", &reference]).is_ok()
}

/// One entry of `git worktree list --porcelain`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorktreeInfo {
    /// Absolute path of the working tree.
    pub path: PathBuf,
    /// Checked-out commit, if any.
    pub head: Option<String>,
    /// Short branch name, `None` when detached or bare.
    pub branch: Option<String>,
    /// The repository is bare.
    pub bare: bool,
    /// HEAD is detached.
    pub detached: bool,
    /// The worktree is locked.
    pub locked: bool,
    /// Git considers the worktree prunable (its directory is gone).
    pub prunable: bool,
}

/// Parses `git worktree list --porcelain` output.
///
/// # Examples
///
/// ```
/// use sprout::git::parse_worktree_list;
///
/// let text = "worktree /repo\nHEAD abc\nbranch refs/heads/main\n\nworktree /repo/.sprout/x\nHEAD def\ndetached\n";
/// let worktrees = parse_worktree_list(text);
/// assert_eq!(worktrees.len(), 2);
/// assert_eq!(worktrees[0].branch.as_deref(), Some("main"));
/// assert!(worktrees[1].detached);
/// ```
#[must_use]
pub fn parse_worktree_list(text: &str) -> Vec<WorktreeInfo> {
    let mut worktrees = Vec::new();
    let mut current: Option<WorktreeInfo> = None;

    for line in text.lines() {
        let (key, value) = line.split_once(' ').unwrap_or((line, ""));
        if key == "worktree" {
            worktrees.extend(current.take());
            current = Some(WorktreeInfo {
                path: PathBuf::from(value),
                ..WorktreeInfo::default()
            });
            continue;
        }

        let Some(info) = current.as_mut() else {
            continue;
        };
        match key {
            "HEAD" => info.head = Some(value.to_string()),
            "branch" => {
                info.branch = Some(value.strip_prefix("refs/heads/").unwrap_or(value).to_string());
            }
            "bare" => info.bare = true,
            "detached" => info.detached = true,
            "locked" => info.locked = true,
            "prunable" => info.prunable = true,
            _ => {}
        }
    }

    worktrees.extend(current);
    worktrees
}

/// Lists every worktree of the repository, the main one first.
///
/// # Errors
///
/// Returns [`Error::Git`] if `git worktree list` fails.
pub fn list_worktrees(root: &Path) -> Result<Vec<WorktreeInfo>> {
    let output = run_git(root, &["worktree", "list", "--porcelain"])?;
    Ok(parse_worktree_list(&output.stdout))
}

/// Returns `true` if git has a worktree registered at `path`.
///
/// Paths are compared after canonicalization, so symlinked temporary
/// directories still match. Failure to list worktrees counts as "no".
#[must_use]
pub fn worktree_exists(root: &Path, path: &Path) -> bool {
    let wanted = canonical(path);
    match list_worktrees(root) {
        Ok(worktrees) => worktrees.iter().any(|w| canonical(&w.path) == wanted),
        Err(e) => {
            log::debug!("cannot list worktrees: {e}");
            false
        }
    }
}

/// Adds a worktree at `path` with `branch` checked out.
///
/// The branch is created from the current HEAD when it does not exist yet.
///
/// # Errors
///
/// Returns [`Error::Git`] carrying git's error output on failure.
pub fn create_worktree(root: &Path, path: &Path, branch: &str) -> Result<()> {
    let path = path.to_string_lossy();
    if branch_exists(root, branch) {
        run_git(root, &["worktree", "add", &path, branch])?;
    } else {
        run_git(root, &["worktree", "add", "-b", branch, &path])?;
    }
    Ok(())
}

/// Removes the worktree at `path`.
///
/// Git refuses when the worktree has uncommitted changes.
///
/// # Errors
///
/// Returns [`Error::Git`] carrying git's error output on failure.
pub fn remove_worktree(root: &Path, path: &Path) -> Result<()> {
    run_git(root, &["worktree", "remove", &path.to_string_lossy()])?;
    Ok(())
}

/// Deletes a local branch, with `-D` when `force` is set and `-d` otherwise.
///
/// # Errors
///
/// Returns [`Error::Git`] on failure, e.g. an unmerged branch without
/// `force`.
pub fn delete_branch(root: &Path, name: &str, force: bool) -> Result<()> {
    let flag = if force { "-D" } else { "-d" };
    run_git(root, &["branch", flag, name])?;
    Ok(())
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
