#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # sprout
//!
//! A library for managing per-branch git worktree workspaces.
//!
//! Each workspace is a git worktree below the repository root whose `.env`
//! files are rendered from the repository's `.env.example` templates.
//! Templates may reference environment variables with `{{ NAME }}` and ask
//! for a free local port with `{{ auto_port() }}`.
//!
//! ## Core Types
//!
//! - [`Template`] and [`render()`]: Parsing and rendering env-file templates
//! - [`ResolutionContext`] and [`Resolver`]: Placeholder resolution
//! - [`Port`] and [`PortRange`]: Network port types with validation
//! - [`WorkspaceManager`]: Creating, listing and removing workspaces
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use sprout::port::allocator::PortAllocator;
//! use sprout::port::registry::FixedPortSource;
//! use sprout::template::{parse, Environment, ScriptedPrompter};
//! use sprout::{render, PortRange, ResolutionContext, Resolver};
//!
//! let template = parse("API_KEY={{ API_KEY }}\nPORT={{ auto_port() }}\n");
//!
//! let allocator = PortAllocator::new(FixedPortSource::empty(), PortRange::unprivileged());
//! let mut resolver = Resolver::new(allocator, ScriptedPrompter::default());
//! let mut ctx = ResolutionContext::new(Environment::from_pairs([("API_KEY", "secret")]));
//!
//! let text = render(&template, &mut ctx, &mut resolver).unwrap();
//! assert!(text.starts_with("API_KEY=secret\nPORT="));
//! ```

pub mod config;
pub mod envfile;
pub mod error;
pub mod git;
pub mod logging;
pub mod port;
pub mod template;
pub mod workspace;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigBuilder};
pub use envfile::{EnvFilePlan, EnvFileProcessor, EnvFileReport, FileOutcome, TemplateDiscovery};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use port::{Port, PortRange};
pub use template::{render, Environment, ResolutionContext, Resolver, Template};
pub use workspace::{CreatedWorkspace, Workspace, WorkspaceManager};
