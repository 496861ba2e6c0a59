//! Environment variable overrides for configuration.

use std::env;
use std::path::PathBuf;

use crate::config::schema::{Config, PortConfig};
use crate::error::{Error, Result};

/// Overrides the workspace directory.
pub const SPROUT_DIR: &str = "SPROUT_DIR";
/// Overrides the lowest port handed out.
pub const SPROUT_PORT_MIN: &str = "SPROUT_PORT_MIN";
/// Overrides the highest port handed out.
pub const SPROUT_PORT_MAX: &str = "SPROUT_PORT_MAX";

/// Reads `SPROUT_*` environment variables into a configuration layer.
///
/// # Examples
///
/// ```no_run
/// use sprout::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::defaults();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if a port variable is not a number.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        config.merge(Self::from_lookup(|name| env::var(name).ok())?);
        Ok(())
    }

    /// Builds the override layer from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if a port variable is not a number.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let min = get(SPROUT_PORT_MIN)
            .map(|v| Self::parse_port(SPROUT_PORT_MIN, &v))
            .transpose()?;
        let max = get(SPROUT_PORT_MAX)
            .map(|v| Self::parse_port(SPROUT_PORT_MAX, &v))
            .transpose()?;

        Ok(Config {
            directory: get(SPROUT_DIR).map(PathBuf::from),
            ports: (min.is_some() || max.is_some()).then_some(PortConfig { min, max }),
            branch_token: None,
        })
    }

    fn parse_port(field: &str, value: &str) -> Result<u16> {
        value.trim().parse().map_err(|_| Error::Validation {
            field: field.into(),
            message: format!("Invalid port number: {value}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;
    use std::path::Path;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_no_variables_is_empty_layer() {
        let layer = EnvironmentConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(layer, Config::default());
    }

    #[test]
    fn test_all_variables() {
        let layer = EnvironmentConfig::from_lookup(lookup(&[
            (SPROUT_DIR, "trees"),
            (SPROUT_PORT_MIN, "30000"),
            (SPROUT_PORT_MAX, " 30010 "),
        ]))
        .unwrap();

        assert_eq!(layer.directory(), Path::new("trees"));
        let range = layer.port_range().unwrap();
        assert_eq!((range.min().value(), range.max().value()), (30000, 30010));
    }

    #[test]
    fn test_single_bound() {
        let layer = EnvironmentConfig::from_lookup(lookup(&[(SPROUT_PORT_MAX, "2000")])).unwrap();
        assert_eq!(
            layer.ports,
            Some(PortConfig {
                min: None,
                max: Some(2000)
            })
        );
    }

    #[test]
    fn test_empty_value_is_unset() {
        let layer = EnvironmentConfig::from_lookup(lookup(&[(SPROUT_DIR, "")])).unwrap();
        assert!(layer.directory.is_none());
    }

    #[test]
    fn test_invalid_port() {
        let err = EnvironmentConfig::from_lookup(lookup(&[(SPROUT_PORT_MIN, "high")])).unwrap_err();
        match err {
            Error::Validation { field, .. } => assert_eq!(field, SPROUT_PORT_MIN),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(EnvironmentConfig::from_lookup(lookup(&[(SPROUT_PORT_MAX, "70000")])).is_err());
    }

    #[test]
    #[serial]
    fn test_apply_overrides_reads_process_env() {
        env::set_var(SPROUT_DIR, "from-env");
        let mut config = Config::defaults();
        let result = EnvironmentConfig::apply_overrides(&mut config);
        env::remove_var(SPROUT_DIR);

        result.unwrap();
        assert_eq!(config.directory(), Path::new("from-env"));
    }
}
