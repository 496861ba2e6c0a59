//! Configuration for sprout.
//!
//! Settings come from up to four layers, highest precedence first:
//!
//! 1. Programmatic overrides (via [`ConfigBuilder::with_config`])
//! 2. Environment variables (`SPROUT_DIR`, `SPROUT_PORT_MIN`, `SPROUT_PORT_MAX`)
//! 3. `sprout.yaml` at the repository root
//! 4. Built-in defaults
//!
//! # Examples
//!
//! ```no_run
//! use sprout::config::ConfigBuilder;
//! use std::path::Path;
//!
//! let config = ConfigBuilder::new()
//!     .with_root(Path::new("/path/to/repo"))
//!     .build()
//!     .unwrap();
//!
//! println!("workspaces live in {}", config.directory().display());
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod schema;
pub mod validator;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::ConfigLoader;
pub use schema::{Config, PortConfig, CONFIG_FILE_NAME, DEFAULT_DIRECTORY};
pub use validator::ConfigValidator;
