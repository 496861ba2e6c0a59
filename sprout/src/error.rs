//! Error types for the sprout library.
//!
//! Every fallible operation in the library returns [`Result`], whose error
//! side is the [`Error`] enum below. Errors raised while rendering a single
//! env file are caught by the env-file processor and recorded in its report.
//! Everything else propagates to the caller.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a sprout error.
///
/// # Examples
///
/// ```
/// use sprout::{Error, Result};
///
/// fn example_operation() -> Result<u16> {
///     Ok(8080)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the sprout library.
#[derive(Debug, Error)]
pub enum Error {
    /// An invalid port number was provided.
    #[error("invalid port {value}: {reason}")]
    InvalidPort {
        /// The invalid port value.
        value: u16,
        /// The reason the port is invalid.
        reason: String,
    },

    /// An invalid port range was specified.
    #[error("invalid port range {min}-{max}: {reason}")]
    InvalidPortRange {
        /// The minimum port in the range.
        min: u16,
        /// The maximum port in the range.
        max: u16,
        /// The reason the range is invalid.
        reason: String,
    },

    /// No free port is left for an `auto_port()` placeholder.
    #[error("no free port left in range {range} ({claimed} already claimed in this run)")]
    PortExhausted {
        /// The range that was searched.
        range: crate::port::PortRange,
        /// How many ports this run had already claimed.
        claimed: usize,
    },

    /// A template file could not be read.
    #[error("failed to read template {}: {source}", path.display())]
    TemplateRead {
        /// The template path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A rendered file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// The target path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Reading an interactive answer failed.
    #[error("failed to read input: {0}")]
    Prompt(#[source] std::io::Error),

    /// The working directory is not inside a git repository.
    #[error("Not in a git repository")]
    NotARepository {
        /// The directory that was searched from.
        path: PathBuf,
    },

    /// The root template required to create a workspace is missing.
    #[error(".env.example file not found at {}", path.display())]
    TemplateNotFound {
        /// The expected template location.
        path: PathBuf,
    },

    /// A workspace for the branch already exists.
    #[error("Worktree for branch '{branch}' already exists")]
    WorkspaceExists {
        /// The branch name.
        branch: String,
    },

    /// No workspace exists for the branch.
    #[error("Worktree for branch '{branch}' does not exist")]
    WorkspaceNotFound {
        /// The branch name.
        branch: String,
    },

    /// A git command failed.
    #[error("git {command} failed: {message}")]
    Git {
        /// The git subcommand that was run.
        command: String,
        /// Git's error output.
        message: String,
    },

    /// A configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<crate::port::InvalidPortError> for Error {
    fn from(err: crate::port::InvalidPortError) -> Self {
        Self::InvalidPort {
            value: err.value,
            reason: err.reason,
        }
    }
}

impl From<crate::port::InvalidPortRangeError> for Error {
    fn from(err: crate::port::InvalidPortRangeError) -> Self {
        Self::InvalidPortRange {
            min: err.min.value(),
            max: err.max.value(),
            reason: err.reason,
        }
    }
}
