//! Configuration file loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::{Config, CONFIG_FILE_NAME};
use crate::error::{Error, Result};

/// Loads `sprout.yaml` files.
///
/// # Examples
///
/// ```
/// use sprout::config::ConfigLoader;
///
/// let dir = tempfile::tempdir().unwrap();
/// assert!(ConfigLoader::load_project(dir.path()).unwrap().is_none());
///
/// std::fs::write(dir.path().join("sprout.yaml"), "directory: trees\n").unwrap();
/// let config = ConfigLoader::load_project(dir.path()).unwrap().unwrap();
/// assert_eq!(config.directory().to_str(), Some("trees"));
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Path of the configuration file for a repository root.
    #[must_use]
    pub fn project_config_path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE_NAME)
    }

    /// Loads the repository's configuration file, if there is one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_project(root: &Path) -> Result<Option<Config>> {
        let path = Self::project_config_path(root);
        if !path.is_file() {
            return Ok(None);
        }
        log::debug!("loading configuration from {}", path.display());
        Self::load_file(&path).map(Some)
    }

    /// Load and parse a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the file cannot be read and
    /// [`Error::Configuration`] if the YAML is invalid.
    pub fn load_file(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path).map_err(|e| Error::Validation {
            field: path.display().to_string(),
            message: format!("Failed to read configuration file: {e}"),
        })?;

        // An empty file is an empty mapping
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(&contents)?)
    }
}
