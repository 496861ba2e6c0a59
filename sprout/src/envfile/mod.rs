//! Provisioning `.env` files from `.env.example` templates.
//!
//! The flow follows a plan-then-execute split:
//!
//! 1. [`discovery`] finds every template below a root directory.
//! 2. [`plan`] decides, per template, whether its `.env` is created,
//!    overwritten or skipped, without touching the file system.
//! 3. [`executor`] renders and writes the planned files, recording a
//!    [`FileOutcome`] per file. A failing file never stops the batch.

pub mod atomic;
pub mod discovery;
pub mod executor;
pub mod plan;

pub use atomic::atomic_write;
pub use discovery::TemplateDiscovery;
pub use executor::{EnvFileProcessor, EnvFileReport, FileOutcome};
pub use plan::{EnvFileAction, EnvFilePlan, EnvFileTask, TargetLayout};

/// File name of a template.
pub const TEMPLATE_FILE_NAME: &str = ".env.example";

/// File name a template renders to.
pub const OUTPUT_FILE_NAME: &str = ".env";
