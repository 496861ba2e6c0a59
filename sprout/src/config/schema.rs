//! Configuration schema definitions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::template::DEFAULT_BRANCH_TOKEN;
use crate::{Port, PortRange};

/// Name of the optional configuration file at the repository root.
pub const CONFIG_FILE_NAME: &str = "sprout.yaml";

/// Directory below the repository root that holds the workspaces.
pub const DEFAULT_DIRECTORY: &str = ".sprout";

/// Sprout configuration.
///
/// Every field is optional so that layers (file, environment, programmatic)
/// only override what they set. [`crate::config::ConfigBuilder`] fills in
/// the defaults; the accessors fall back to them as well.
///
/// # Examples
///
/// ```
/// use sprout::config::{Config, PortConfig};
///
/// let config: Config = serde_yaml::from_str("directory: .worktrees\nports:\n  min: 20000\n").unwrap();
/// assert_eq!(config.directory().to_str(), Some(".worktrees"));
/// assert_eq!(config.port_range().unwrap().min().value(), 20000);
/// assert_eq!(config.branch_token(), "BRANCH_NAME");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Workspace directory, relative to the repository root.
    pub directory: Option<PathBuf>,

    /// Range `auto_port()` draws from.
    pub ports: Option<PortConfig>,

    /// Template variable that resolves to the workspace branch.
    pub branch_token: Option<String>,
}

/// Port range bounds; either side may be left to the default.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PortConfig {
    /// Lowest port handed out.
    pub min: Option<u16>,
    /// Highest port handed out.
    pub max: Option<u16>,
}

impl Config {
    /// The built-in defaults, with every field set.
    #[must_use]
    pub fn defaults() -> Self {
        let range = PortRange::unprivileged();
        Self {
            directory: Some(PathBuf::from(DEFAULT_DIRECTORY)),
            ports: Some(PortConfig {
                min: Some(range.min().value()),
                max: Some(range.max().value()),
            }),
            branch_token: Some(DEFAULT_BRANCH_TOKEN.to_string()),
        }
    }

    /// Overlays `other` on top of `self`; fields set in `other` win.
    pub fn merge(&mut self, other: Self) {
        if other.directory.is_some() {
            self.directory = other.directory;
        }
        if let Some(theirs) = other.ports {
            let ours = self.ports.get_or_insert_with(PortConfig::default);
            ours.min = theirs.min.or(ours.min);
            ours.max = theirs.max.or(ours.max);
        }
        if other.branch_token.is_some() {
            self.branch_token = other.branch_token;
        }
    }

    /// Workspace directory relative to the repository root.
    #[must_use]
    pub fn directory(&self) -> &Path {
        self.directory
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_DIRECTORY))
    }

    /// The configured port range.
    ///
    /// # Errors
    ///
    /// Returns an error if a bound is 0 or the bounds are inverted.
    pub fn port_range(&self) -> Result<PortRange> {
        let default = PortRange::unprivileged();
        let ports = self.ports.unwrap_or_default();
        let min = Port::try_from(ports.min.unwrap_or(default.min().value()))?;
        let max = Port::try_from(ports.max.unwrap_or(default.max().value()))?;
        Ok(PortRange::new(min, max)?)
    }

    /// Template variable bound to the branch.
    #[must_use]
    pub fn branch_token(&self) -> &str {
        self.branch_token.as_deref().unwrap_or(DEFAULT_BRANCH_TOKEN)
    }
}

impl PortConfig {
    /// Bounds taken from `range`.
    #[must_use]
    pub fn from_range(range: PortRange) -> Self {
        Self {
            min: Some(range.min().value()),
            max: Some(range.max().value()),
        }
    }
}

impl TryFrom<&Config> for PortRange {
    type Error = Error;

    fn try_from(config: &Config) -> Result<Self> {
        config.port_range()
    }
}
