//! Layered configuration building.

use std::path::{Path, PathBuf};

use crate::config::environment::EnvironmentConfig;
use crate::config::loader::ConfigLoader;
use crate::config::schema::Config;
use crate::config::validator::ConfigValidator;
use crate::error::Result;

/// Builds the effective configuration.
///
/// Layers, lowest precedence first: built-in defaults, `sprout.yaml` in the
/// repository root, `SPROUT_*` environment variables, programmatic
/// overrides. The merged result is validated and has every field set.
///
/// # Examples
///
/// ```
/// use sprout::config::{Config, ConfigBuilder};
///
/// let config = ConfigBuilder::new()
///     .skip_env()
///     .with_config(Config {
///         branch_token: Some("GIT_BRANCH".to_string()),
///         ..Config::default()
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(config.branch_token(), "GIT_BRANCH");
/// assert_eq!(config.directory().to_str(), Some(".sprout"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    root: Option<PathBuf>,
    skip_env: bool,
    overrides: Option<Config>,
}

impl ConfigBuilder {
    /// Creates a builder that reads no file until [`Self::with_root`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `sprout.yaml` from this repository root.
    #[must_use]
    pub fn with_root(mut self, root: impl AsRef<Path>) -> Self {
        self.root = Some(root.as_ref().to_path_buf());
        self
    }

    /// Ignores `SPROUT_*` environment variables.
    #[must_use]
    pub fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Applies `config` on top of every other layer.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.overrides = Some(config);
        self
    }

    /// Merges the layers and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is unreadable or invalid,
    /// an environment variable is malformed, or validation fails.
    pub fn build(self) -> Result<Config> {
        let mut config = Config::defaults();

        if let Some(root) = &self.root {
            if let Some(file) = ConfigLoader::load_project(root)? {
                config.merge(file);
            }
        }

        if !self.skip_env {
            EnvironmentConfig::apply_overrides(&mut config)?;
        }

        if let Some(overrides) = self.overrides {
            config.merge(overrides);
        }

        ConfigValidator::validate(&config)?;
        Ok(config)
    }
}
