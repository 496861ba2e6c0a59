//! Repository discovery through `gix`.

use std::path::{Path, PathBuf};

use gix::bstr::ByteSlice;

use crate::error::{Error, Result};

/// Returns `true` if `dir` is inside a git repository.
#[must_use]
pub fn is_repository(dir: &Path) -> bool {
    gix::discover::upwards(dir).is_ok()
}

/// Root of the main working tree of the repository containing `dir`.
///
/// From inside a linked worktree this is still the main checkout, so
/// workspaces are always created next to each other. The path is
/// canonical.
///
/// # Errors
///
/// Returns [`Error::NotARepository`] if `dir` is not inside a repository
/// with a working tree.
///
/// # Examples
///
/// ```no_run
/// use sprout::git::repository_root;
/// use std::path::Path;
///
/// let root = repository_root(Path::new(".")).unwrap();
/// println!("repository at {}", root.display());
/// ```
pub fn repository_root(dir: &Path) -> Result<PathBuf> {
    let not_a_repo = || Error::NotARepository {
        path: dir.to_path_buf(),
    };
    let repo = open(dir).ok_or_else(not_a_repo)?;

    // The common dir of a non-bare repository is `<main root>/.git`, also
    // when `repo` was opened through a linked worktree.
    if let Ok(common) = repo.common_dir().canonicalize() {
        if common.file_name().is_some_and(|name| name == ".git") {
            if let Some(parent) = common.parent() {
                return Ok(parent.to_path_buf());
            }
        }
    }

    let work_dir = repo.work_dir().ok_or_else(not_a_repo)?;
    Ok(work_dir
        .canonicalize()
        .unwrap_or_else(|_| work_dir.to_path_buf()))
}

/// Name of the branch checked out at `dir`.
///
/// Returns `None` outside a repository, on a detached HEAD, or when the
/// branch name is not valid UTF-8.
#[must_use]
pub fn current_branch(dir: &Path) -> Option<String> {
    let repo = open(dir)?;
    repo.head_name().ok().flatten().and_then(|name| {
        let bstr = name.as_bstr();
        if let Ok(s) = bstr.to_str() {
            s.strip_prefix("refs/heads/").map(String::from)
        } else {
            log::debug!("branch name contains non-UTF8 characters: {bstr:?}");
            None
        }
    })
}

fn open(dir: &Path) -> Option<gix::Repository> {
    let (repo_path, _trust) = gix::discover::upwards(dir).ok()?;
    let std_path: &Path = repo_path.as_ref();
    gix::open(std_path).ok()
}
