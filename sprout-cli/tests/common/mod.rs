//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Throwaway git repositories in temporary directories
//! - Command builders with an isolated environment
//! - Parsing helpers for rendered env files

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tempfile::TempDir;

/// Variables that would change sprout's behavior if inherited.
const SPROUT_VARS: [&str; 4] = [
    "SPROUT_DIR",
    "SPROUT_PORT_MIN",
    "SPROUT_PORT_MAX",
    "SPROUT_LOG_MODE",
];

/// Test environment rooted in a temporary directory.
///
/// With [`TestEnv::repo`] the directory is a git repository with one
/// commit on `main` that ignores `.env`.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Canonical path of the temporary directory
    pub root: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// A plain directory, not a repository.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let root = temp_dir
            .path()
            .canonicalize()
            .expect("Failed to canonicalize temp dir");
        Self { temp_dir, root }
    }

    /// A git repository with an initial commit.
    pub fn repo() -> Self {
        let env = Self::new();
        env.git(&["init", "-q", "-b", "main"]);
        env.git(&["config", "user.name", "Test User"]);
        env.git(&["config", "user.email", "test@example.com"]);
        env.git(&["config", "commit.gpgsign", "false"]);
        env.write("README.md", "Test repository\n");
        env.write(".gitignore", ".env\n");
        env.commit_all("Initial commit");
        env
    }

    /// The sprout binary, run in the root with sprout's variables cleared.
    pub fn command(&self) -> Command {
        self.command_in(&self.root)
    }

    /// The sprout binary, run in `dir`.
    pub fn command_in(&self, dir: &Path) -> Command {
        let mut cmd = Command::cargo_bin("sprout").expect("Failed to find sprout binary");
        cmd.current_dir(dir);
        for var in SPROUT_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Writes `contents` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).expect("Failed to create parent dir");
        fs::write(&path, contents).expect("Failed to write file");
        path
    }

    /// Reads `relative` below the root.
    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.root.join(relative)).expect("Failed to read file")
    }

    /// Stages everything and commits.
    pub fn commit_all(&self, message: &str) {
        self.git(&["add", "-A"]);
        self.git(&["commit", "-q", "-m", message]);
    }

    /// Runs git in the root and returns trimmed stdout.
    pub fn git(&self, args: &[&str]) -> String {
        let output = process::Command::new("git")
            .current_dir(&self.root)
            .args(args)
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Runs `sprout create <branch>` and asserts success.
    pub fn create(&self, branch: &str) {
        self.command().arg("create").arg(branch).assert().success();
    }
}

/// Value of `key` in rendered env text.
#[allow(dead_code)]
pub fn env_value<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    text.lines()
        .filter_map(|line| line.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

/// Parses `key` as a port number.
#[allow(dead_code)]
pub fn port_value(text: &str, key: &str) -> u16 {
    env_value(text, key)
        .unwrap_or_else(|| panic!("{key} missing in {text:?}"))
        .parse()
        .expect("not a port number")
}
