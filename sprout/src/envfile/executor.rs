//! Rendering and writing planned env files.

use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;

use super::atomic::atomic_write;
use super::plan::{EnvFileAction, EnvFilePlan, EnvFileTask};
use crate::error::{Error, Result};
use crate::port::registry::PortSource;
use crate::template::{parse, render, Prompter, ResolutionContext, Resolver};

/// What happened to one target file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Written; it did not exist before.
    Created {
        /// The written file.
        path: PathBuf,
    },
    /// Written over an existing file.
    Overwritten {
        /// The written file.
        path: PathBuf,
    },
    /// Dry run: would be created.
    WouldCreate {
        /// The target file.
        path: PathBuf,
    },
    /// Dry run: would be overwritten.
    WouldOverwrite {
        /// The target file.
        path: PathBuf,
    },
    /// Left alone because it already exists.
    Skipped {
        /// The existing file.
        path: PathBuf,
    },
    /// Reading, rendering or writing failed.
    Failed {
        /// The target file.
        path: PathBuf,
        /// The error message.
        reason: String,
    },
}

impl FileOutcome {
    /// The target file this outcome is about.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Created { path }
            | Self::Overwritten { path }
            | Self::WouldCreate { path }
            | Self::WouldOverwrite { path }
            | Self::Skipped { path }
            | Self::Failed { path, .. } => path,
        }
    }

    /// Summary label, e.g. `Created` or `Would overwrite`.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Created { .. } => "Created",
            Self::Overwritten { .. } => "Overwritten",
            Self::WouldCreate { .. } => "Would create",
            Self::WouldOverwrite { .. } => "Would overwrite",
            Self::Skipped { .. } => "Skipped",
            Self::Failed { .. } => "Failed",
        }
    }

    /// Returns `true` for [`FileOutcome::Failed`].
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Outcomes of one batch, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFileReport {
    /// Whether the batch was a dry run.
    pub dry_run: bool,
    /// One outcome per planned template.
    pub outcomes: Vec<FileOutcome>,
}

impl EnvFileReport {
    /// Returns `true` if any file failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(FileOutcome::is_failure)
    }

    /// The failed outcomes.
    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }

    /// `(label, count)` rows for the summary, in a fixed order and without
    /// zero counts.
    ///
    /// # Examples
    ///
    /// ```
    /// use sprout::envfile::{EnvFileReport, FileOutcome};
    ///
    /// let report = EnvFileReport {
    ///     dry_run: false,
    ///     outcomes: vec![
    ///         FileOutcome::Created { path: "a/.env".into() },
    ///         FileOutcome::Skipped { path: "b/.env".into() },
    ///         FileOutcome::Created { path: "c/.env".into() },
    ///     ],
    /// };
    /// assert_eq!(report.counts(), vec![("Created", 2), ("Skipped", 1)]);
    /// ```
    #[must_use]
    pub fn counts(&self) -> Vec<(&'static str, usize)> {
        const ORDER: [&str; 6] = [
            "Would create",
            "Would overwrite",
            "Created",
            "Overwritten",
            "Skipped",
            "Failed",
        ];
        ORDER
            .iter()
            .map(|&label| {
                let count = self.outcomes.iter().filter(|o| o.label() == label).count();
                (label, count)
            })
            .filter(|&(_, count)| count > 0)
            .collect()
    }
}

/// Renders and writes the files of an [`EnvFilePlan`].
///
/// All files of a plan share the caller's [`ResolutionContext`], so ports
/// claimed for one file are never handed out again for another, and a
/// value typed at a prompt is reused for every file that needs it.
///
/// In dry-run mode nothing is read, rendered or written: no prompts appear
/// and no ports are claimed.
///
/// # Examples
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use sprout::envfile::{EnvFilePlan, EnvFileProcessor, FileOutcome, TargetLayout};
/// use sprout::port::allocator::PortAllocator;
/// use sprout::port::registry::FixedPortSource;
/// use sprout::template::{Environment, ResolutionContext, Resolver, ScriptedPrompter};
/// use sprout::PortRange;
///
/// let dir = tempfile::tempdir().unwrap();
/// let template = dir.path().join(".env.example");
/// std::fs::write(&template, "KEY={{ KEY }}\n").unwrap();
///
/// let mut resolver = Resolver::new(
///     PortAllocator::with_rng(FixedPortSource::empty(), PortRange::unprivileged(), StdRng::seed_from_u64(0)),
///     ScriptedPrompter::default(),
/// );
/// let mut ctx = ResolutionContext::new(Environment::from_pairs([("KEY", "v")]));
///
/// let plan = EnvFilePlan::build(vec![template], &TargetLayout::Sibling, false);
/// let report = EnvFileProcessor::new(&mut resolver).process(&plan, &mut ctx);
///
/// assert!(matches!(report.outcomes[0], FileOutcome::Created { .. }));
/// assert_eq!(std::fs::read_to_string(dir.path().join(".env")).unwrap(), "KEY=v\n");
/// ```
pub struct EnvFileProcessor<'r, P, S: PortSource, R: Rng> {
    resolver: &'r mut Resolver<P, S, R>,
    dry_run: bool,
}

impl<'r, P: Prompter, S: PortSource, R: Rng> EnvFileProcessor<'r, P, S, R> {
    /// Creates a processor writing through `resolver`.
    pub fn new(resolver: &'r mut Resolver<P, S, R>) -> Self {
        Self {
            resolver,
            dry_run: false,
        }
    }

    /// Sets the processor to dry-run mode.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Processes every task of `plan`.
    #[must_use]
    pub fn process(&mut self, plan: &EnvFilePlan, ctx: &mut ResolutionContext) -> EnvFileReport {
        self.process_with(plan, ctx, |_| {})
    }

    /// Processes every task of `plan`, calling `on_outcome` as soon as each
    /// file is done.
    pub fn process_with(
        &mut self,
        plan: &EnvFilePlan,
        ctx: &mut ResolutionContext,
        mut on_outcome: impl FnMut(&FileOutcome),
    ) -> EnvFileReport {
        let mut report = EnvFileReport {
            dry_run: self.dry_run,
            outcomes: Vec::with_capacity(plan.len()),
        };

        for task in &plan.tasks {
            let outcome = self.process_task(task, ctx);
            on_outcome(&outcome);
            report.outcomes.push(outcome);
        }
        report
    }

    fn process_task(&mut self, task: &EnvFileTask, ctx: &mut ResolutionContext) -> FileOutcome {
        let path = task.target.clone();
        log::debug!("{}", task.description());

        match (task.action, self.dry_run) {
            (EnvFileAction::Skip, _) => FileOutcome::Skipped { path },
            (EnvFileAction::Create, true) => FileOutcome::WouldCreate { path },
            (EnvFileAction::Overwrite, true) => FileOutcome::WouldOverwrite { path },
            (action, false) => match self.write(task, ctx) {
                Ok(()) if action == EnvFileAction::Overwrite => FileOutcome::Overwritten { path },
                Ok(()) => FileOutcome::Created { path },
                Err(e) => {
                    log::debug!("failed to provision {}: {e}", task.target.display());
                    FileOutcome::Failed {
                        path,
                        reason: e.to_string(),
                    }
                }
            },
        }
    }

    fn write(&mut self, task: &EnvFileTask, ctx: &mut ResolutionContext) -> Result<()> {
        let text = fs::read_to_string(&task.template).map_err(|source| Error::TemplateRead {
            path: task.template.clone(),
            source,
        })?;
        let rendered = render(&parse(&text), ctx, &mut *self.resolver)?;
        atomic_write(&task.target, &rendered)
    }
}
