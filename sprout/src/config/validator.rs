//! Configuration validation.

use std::path::Component;

use crate::config::schema::{Config, PortConfig};
use crate::error::{Error, Result};
use crate::port::Port;

/// Validates a configuration after all layers are merged.
///
/// # Examples
///
/// ```
/// use sprout::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::defaults()).unwrap();
///
/// let escaping: Config = serde_yaml::from_str("directory: ../elsewhere\n").unwrap();
/// assert!(ConfigValidator::validate(&escaping).is_err());
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first offending field.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(ref directory) = config.directory {
            Self::validate_directory(directory)?;
        }
        if let Some(ref ports) = config.ports {
            Self::validate_port_config(ports)?;
        }
        if let Some(ref token) = config.branch_token {
            Self::validate_branch_token(token)?;
        }
        Ok(())
    }

    /// The workspace directory must stay inside the repository.
    fn validate_directory(directory: &std::path::Path) -> Result<()> {
        let invalid = |message: &str| Error::Validation {
            field: "directory".into(),
            message: message.into(),
        };

        if directory.as_os_str().is_empty() {
            return Err(invalid("Cannot be empty"));
        }
        for component in directory.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => return Err(invalid("Cannot contain '..'")),
                Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid("Must be relative to the repository root"))
                }
            }
        }
        if directory.components().all(|c| c == Component::CurDir) {
            return Err(invalid("Cannot be the repository root itself"));
        }
        Ok(())
    }

    /// Configured bounds may only narrow the default range, 1024-65535.
    fn validate_port_config(config: &PortConfig) -> Result<()> {
        let check = |field: &str, value: Option<u16>| -> Result<()> {
            match value {
                Some(port) if port < Port::FIRST_UNPRIVILEGED => Err(Error::Validation {
                    field: field.into(),
                    message: format!(
                        "Port {port} is below {}; privileged ports are never allocated",
                        Port::FIRST_UNPRIVILEGED
                    ),
                }),
                _ => Ok(()),
            }
        };
        check("ports.min", config.min)?;
        check("ports.max", config.max)?;

        if let (Some(min), Some(max)) = (config.min, config.max) {
            if max < min {
                return Err(Error::Validation {
                    field: "ports".into(),
                    message: format!("max ({max}) must be greater than or equal to min ({min})"),
                });
            }
        }
        Ok(())
    }

    /// The branch token is used as a template variable name.
    fn validate_branch_token(token: &str) -> Result<()> {
        let mut chars = token.chars();
        let valid = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

        if valid {
            Ok(())
        } else {
            Err(Error::Validation {
                field: "branch_token".into(),
                message: format!("'{token}' is not a valid variable name"),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn with_directory(dir: &str) -> Config {
        Config {
            directory: Some(PathBuf::from(dir)),
            ..Config::default()
        }
    }

    fn assert_field(result: Result<()>, expected: &str) {
        match result {
            Err(Error::Validation { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected validation error for {expected}, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_empty_config() {
        ConfigValidator::validate(&Config::default()).unwrap();
    }

    #[test]
    fn test_validate_directory() {
        ConfigValidator::validate(&with_directory(".sprout")).unwrap();
        ConfigValidator::validate(&with_directory("build/trees")).unwrap();
        ConfigValidator::validate(&with_directory("./trees")).unwrap();

        assert_field(ConfigValidator::validate(&with_directory("")), "directory");
        assert_field(ConfigValidator::validate(&with_directory(".")), "directory");
        assert_field(ConfigValidator::validate(&with_directory("../x")), "directory");
        assert_field(ConfigValidator::validate(&with_directory("/tmp/x")), "directory");
    }

    #[test]
    fn test_validate_ports() {
        let ports = |min, max| Config {
            ports: Some(PortConfig { min, max }),
            ..Config::default()
        };
        ConfigValidator::validate(&ports(Some(5000), Some(5000))).unwrap();
        ConfigValidator::validate(&ports(None, Some(2000))).unwrap();

        assert_field(ConfigValidator::validate(&ports(Some(0), None)), "ports.min");
        assert_field(ConfigValidator::validate(&ports(None, Some(0))), "ports.max");
        assert_field(ConfigValidator::validate(&ports(Some(6000), Some(5000))), "ports");
    }

    #[test]
    fn test_validate_ports_rejects_privileged_range() {
        let ports = |min, max| Config {
            ports: Some(PortConfig { min, max }),
            ..Config::default()
        };
        ConfigValidator::validate(&ports(Some(1024), Some(1024))).unwrap();

        assert_field(ConfigValidator::validate(&ports(Some(80), Some(80))), "ports.min");
        assert_field(ConfigValidator::validate(&ports(Some(1023), None)), "ports.min");
        assert_field(ConfigValidator::validate(&ports(None, Some(443))), "ports.max");
    }

    #[test]
    fn test_validate_branch_token() {
        let token = |t: &str| Config {
            branch_token: Some(t.to_string()),
            ..Config::default()
        };
        ConfigValidator::validate(&token("GIT_BRANCH")).unwrap();
        ConfigValidator::validate(&token("_b1")).unwrap();
        assert_field(ConfigValidator::validate(&token("1ABC")), "branch_token");
        assert_field(ConfigValidator::validate(&token("A-B")), "branch_token");
        assert_field(ConfigValidator::validate(&token("")), "branch_token");
    }
}
