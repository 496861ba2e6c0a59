//! Git integration.
//!
//! Read-only queries (repository discovery, the current branch) go through
//! `gix`. Anything that changes the repository, like adding or removing a
//! worktree, runs the `git` binary so hooks and configuration behave as
//! they would on the command line.

pub mod discovery;
pub mod worktree;

pub use discovery::{current_branch, is_repository, repository_root};
pub use worktree::{
    branch_exists, create_worktree, delete_branch, list_worktrees, parse_worktree_list,
    remove_worktree, run_git, worktree_exists, GitOutput, WorktreeInfo,
};
