//! Finding `.env.example` templates.

use std::fs;
use std::path::{Path, PathBuf};

use super::TEMPLATE_FILE_NAME;
use crate::error::Result;

/// Directory never descended into.
const GIT_DIR: &str = ".git";

/// Recursive search for templates below a root directory.
///
/// `.git` directories are always skipped, as are the directories passed to
/// [`TemplateDiscovery::exclude`]. Symbolic links to directories are not
/// followed.
///
/// # Examples
///
/// ```
/// use sprout::envfile::TemplateDiscovery;
/// use std::fs;
///
/// let dir = tempfile::tempdir().unwrap();
/// fs::create_dir_all(dir.path().join("api")).unwrap();
/// fs::write(dir.path().join(".env.example"), "").unwrap();
/// fs::write(dir.path().join("api/.env.example"), "").unwrap();
/// fs::write(dir.path().join("api/.env"), "").unwrap();
///
/// let templates = TemplateDiscovery::new(dir.path()).find().unwrap();
/// assert_eq!(templates.len(), 2);
/// assert!(templates[0].ends_with(".env.example"));
/// assert!(templates[1].ends_with("api/.env.example"));
/// ```
#[derive(Debug, Clone)]
pub struct TemplateDiscovery {
    root: PathBuf,
    excluded: Vec<PathBuf>,
}

impl TemplateDiscovery {
    /// Searches below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            excluded: Vec::new(),
        }
    }

    /// Skips `dir`, given relative to the root or as an absolute path.
    #[must_use]
    pub fn exclude(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let absolute = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.root.join(dir)
        };
        self.excluded.push(absolute);
        self
    }

    /// The search root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every template below the root, sorted by path.
    ///
    /// Subdirectories that cannot be read are skipped with a debug log.
    ///
    /// # Errors
    ///
    /// Returns an error if the root itself cannot be read.
    pub fn find(&self) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        let mut pending = vec![self.root.clone()];
        let mut at_root = true;

        while let Some(dir) = pending.pop() {
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) if at_root => return Err(e.into()),
                Err(e) => {
                    log::debug!("skipping unreadable directory {}: {e}", dir.display());
                    continue;
                }
            };
            at_root = false;

            for entry in entries.flatten() {
                let path = entry.path();
                let Ok(file_type) = entry.file_type() else {
                    continue;
                };

                if file_type.is_dir() {
                    if entry.file_name() != GIT_DIR && !self.is_excluded(&path) {
                        pending.push(path);
                    }
                } else if entry.file_name() == TEMPLATE_FILE_NAME && path.is_file() {
                    found.push(path);
                }
            }
        }

        found.sort();
        log::debug!(
            "found {} template(s) below {}",
            found.len(),
            self.root.display()
        );
        Ok(found)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.excluded.iter().any(|excluded| excluded == path)
    }
}
