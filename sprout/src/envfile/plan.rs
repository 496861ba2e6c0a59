//! Planning which `.env` files to write.

use std::fmt;
use std::path::{Path, PathBuf};

use super::OUTPUT_FILE_NAME;

/// What happens to one target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvFileAction {
    /// The target does not exist yet.
    Create,
    /// The target exists and `force` was given.
    Overwrite,
    /// The target exists and is left alone.
    Skip,
}

impl fmt::Display for EnvFileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Overwrite => write!(f, "overwrite"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

/// Where rendered files go.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TargetLayout {
    /// Next to the template: `dir/.env.example` renders to `dir/.env`.
    #[default]
    Sibling,
    /// Into another tree at the same relative location: a template at
    /// `from/app/.env.example` renders to `to/app/.env`.
    Relocated {
        /// Root the templates were discovered under.
        from: PathBuf,
        /// Root the files are written under.
        to: PathBuf,
    },
}

impl TargetLayout {
    /// The `.env` path for `template`.
    ///
    /// A template outside `from` falls back to its sibling path.
    ///
    /// # Examples
    ///
    /// ```
    /// use sprout::envfile::TargetLayout;
    /// use std::path::Path;
    ///
    /// let layout = TargetLayout::Relocated {
    ///     from: "/repo".into(),
    ///     to: "/repo/.sprout/feature".into(),
    /// };
    /// assert_eq!(
    ///     layout.target_for(Path::new("/repo/api/.env.example")),
    ///     Path::new("/repo/.sprout/feature/api/.env"),
    /// );
    /// ```
    #[must_use]
    pub fn target_for(&self, template: &Path) -> PathBuf {
        let dir = template.parent().unwrap_or_else(|| Path::new(""));
        match self {
            Self::Sibling => dir.join(OUTPUT_FILE_NAME),
            Self::Relocated { from, to } => match dir.strip_prefix(from) {
                Ok(relative) => to.join(relative).join(OUTPUT_FILE_NAME),
                Err(_) => dir.join(OUTPUT_FILE_NAME),
            },
        }
    }
}

/// One planned template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFileTask {
    /// The `.env.example` to render.
    pub template: PathBuf,
    /// The `.env` to write.
    pub target: PathBuf,
    /// What will happen to `target`.
    pub action: EnvFileAction,
}

impl EnvFileTask {
    /// Returns a human-readable description of this task.
    #[must_use]
    pub fn description(&self) -> String {
        match self.action {
            EnvFileAction::Create => format!("Create {}", self.target.display()),
            EnvFileAction::Overwrite => format!("Overwrite {}", self.target.display()),
            EnvFileAction::Skip => format!("Skip {} (already exists)", self.target.display()),
        }
    }
}

/// The full set of tasks for one invocation, in template order.
///
/// # Examples
///
/// ```
/// use sprout::envfile::{EnvFileAction, EnvFilePlan, TargetLayout};
///
/// let dir = tempfile::tempdir().unwrap();
/// let template = dir.path().join(".env.example");
/// std::fs::write(&template, "A=1\n").unwrap();
///
/// let plan = EnvFilePlan::build(vec![template], &TargetLayout::Sibling, false);
/// assert_eq!(plan.tasks[0].action, EnvFileAction::Create);
/// assert_eq!(plan.tasks[0].target, dir.path().join(".env"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFilePlan {
    /// The tasks, one per template.
    pub tasks: Vec<EnvFileTask>,
}

impl EnvFilePlan {
    /// Plans `templates`, checking which targets already exist.
    ///
    /// Existing targets are overwritten with `force` and skipped otherwise.
    #[must_use]
    pub fn build(templates: Vec<PathBuf>, layout: &TargetLayout, force: bool) -> Self {
        let tasks = templates
            .into_iter()
            .map(|template| {
                let target = layout.target_for(&template);
                let action = match (target.exists(), force) {
                    (false, _) => EnvFileAction::Create,
                    (true, true) => EnvFileAction::Overwrite,
                    (true, false) => EnvFileAction::Skip,
                };
                EnvFileTask {
                    template,
                    target,
                    action,
                }
            })
            .collect();
        Self { tasks }
    }

    /// Returns `true` if there is nothing to plan.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }
}
