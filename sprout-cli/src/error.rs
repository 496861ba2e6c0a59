//! CLI-specific error types with exit codes.
//!
//! This module defines error types specific to the CLI layer,
//! wrapping library errors and providing appropriate exit codes.

use sprout::Error as LibError;
use std::fmt;

/// CLI-specific error type with exit code mapping.
#[derive(Debug)]
pub enum CliError {
    /// Library error (wrapped).
    Library(LibError),

    /// Invalid command-line arguments.
    InvalidArguments(String),

    /// I/O error.
    Io(std::io::Error),

    /// Configuration error.
    Config(String),

    /// The command ran but did not fully succeed, e.g. some env files
    /// failed to render.
    SemanticFailure(String),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: Failure (not a repository, missing workspace, git error,
    ///   failed files)
    /// - 4: Invalid arguments
    /// - 5: I/O error
    /// - 7: Configuration error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Library(lib_err) => match lib_err {
                LibError::Configuration(_) | LibError::Validation { .. } => 7,
                LibError::Io(_) | LibError::Prompt(_) => 5,
                _ => 1,
            },
            CliError::SemanticFailure(_) => 1,
            CliError::InvalidArguments(_) => 4,
            CliError::Io(_) => 5,
            CliError::Config(_) => 7,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e}"),
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
            CliError::Config(msg) => write!(f, "Configuration error: {msg}"),
            CliError::SemanticFailure(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        CliError::Library(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_codes() {
        let not_repo = CliError::from(LibError::NotARepository {
            path: PathBuf::from("/tmp"),
        });
        assert_eq!(not_repo.exit_code(), 1);

        let validation = CliError::from(LibError::Validation {
            field: "ports".into(),
            message: "inverted".into(),
        });
        assert_eq!(validation.exit_code(), 7);

        assert_eq!(CliError::InvalidArguments("x".into()).exit_code(), 4);
        assert_eq!(
            CliError::Io(std::io::Error::other("disk")).exit_code(),
            5
        );
        assert_eq!(CliError::Config("bad".into()).exit_code(), 7);
        assert_eq!(CliError::SemanticFailure("1 failed".into()).exit_code(), 1);
    }

    #[test]
    fn test_display_passes_library_message_through() {
        let err = CliError::from(LibError::WorkspaceNotFound {
            branch: "feat".into(),
        });
        assert_eq!(err.to_string(), "Worktree for branch 'feat' does not exist");
    }
}
