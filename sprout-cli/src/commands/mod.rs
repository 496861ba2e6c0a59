//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `create`: Create a workspace and render its env files
//! - `ls`: List workspaces
//! - `rm`: Remove a workspace and optionally its branch
//! - `path`: Print the path of a workspace
//! - `env`: Render `.env.example` templates below the current directory
//! - `completions`: Generate shell completion scripts

pub mod completions;
pub mod create;
pub mod env;
pub mod ls;
pub mod path;
pub mod rm;

pub use completions::CompletionsCommand;
pub use create::CreateCommand;
pub use env::EnvCommand;
pub use ls::LsCommand;
pub use path::PathCommand;
pub use rm::RmCommand;
