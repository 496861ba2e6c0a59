//! Common test utilities for integration tests.
//!
//! Tests run against real git repositories created in temporary
//! directories, so `git` must be installed.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// A throwaway git repository with one commit on `main`.
///
/// The commit ignores `.env`, so worktrees holding rendered files are still
/// clean for `git worktree remove`.
///
/// The repository is deleted when the value is dropped.
#[allow(dead_code)]
pub struct TestRepo {
    _dir: TempDir,
    root: PathBuf,
}

#[allow(dead_code)]
impl TestRepo {
    /// Initializes the repository and commits a README.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = dir.path().canonicalize().expect("failed to canonicalize");

        git(&root, &["init", "-q", "-b", "main"]);
        git(&root, &["config", "user.name", "Test User"]);
        git(&root, &["config", "user.email", "test@example.com"]);
        git(&root, &["config", "commit.gpgsign", "false"]);

        let repo = Self { _dir: dir, root };
        repo.write("README.md", "Test repository\n");
        repo.write(".gitignore", ".env\n");
        repo.commit_all("Initial commit");
        repo
    }

    /// The canonical repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `contents` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        fs::write(&path, contents).expect("failed to write file");
        path
    }

    /// Reads `relative` below the root.
    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.root.join(relative)).expect("failed to read file")
    }

    /// Stages everything and commits.
    pub fn commit_all(&self, message: &str) {
        git(&self.root, &["add", "-A"]);
        git(&self.root, &["commit", "-q", "-m", message]);
    }

    /// Runs git in the repository root and returns trimmed stdout.
    pub fn git(&self, args: &[&str]) -> String {
        git(&self.root, args)
    }
}

/// Runs git in `dir`, panicking with its stderr on failure.
#[allow(dead_code)]
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Extracts the value of `KEY=value` lines from rendered env text.
#[allow(dead_code)]
pub fn env_value<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    text.lines()
        .filter_map(|line| line.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}
