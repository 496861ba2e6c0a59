//! Value resolution for template segments.
//!
//! A [`ResolutionContext`] holds everything one invocation shares across
//! the files it renders: the environment snapshot, the branch name, the
//! silent flag, the port ledger and answers already given at a prompt. The
//! [`Resolver`] owns the collaborators that produce new values, namely the
//! port allocator and the prompter.

use std::borrow::Cow;
use std::collections::HashMap;

use rand::rngs::ThreadRng;
use rand::Rng;

use crate::error::{Error, Result};
use crate::port::allocator::{PortAllocator, PortLedger};
use crate::port::registry::{PortSource, SystemPortSource};

use super::environment::Environment;
use super::parser::Segment;
use super::prompt::Prompter;

/// Variable name that resolves to the workspace's branch.
pub const DEFAULT_BRANCH_TOKEN: &str = "BRANCH_NAME";

/// State shared by every template rendered in one invocation.
///
/// # Examples
///
/// ```
/// use sprout::template::{Environment, ResolutionContext};
///
/// let ctx = ResolutionContext::new(Environment::default())
///     .with_branch("feature/login")
///     .silent(true);
/// assert_eq!(ctx.branch(), Some("feature/login"));
/// assert!(ctx.is_silent());
/// ```
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    environment: Environment,
    branch: Option<String>,
    branch_token: String,
    silent: bool,
    ports: PortLedger,
    answers: HashMap<String, String>,
}

impl ResolutionContext {
    /// Creates a context with no branch, an empty port snapshot and
    /// prompting enabled.
    #[must_use]
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            branch: None,
            branch_token: DEFAULT_BRANCH_TOKEN.to_string(),
            silent: false,
            ports: PortLedger::default(),
            answers: HashMap::new(),
        }
    }

    /// Sets the branch the workspace belongs to.
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Changes the variable name that resolves to the branch.
    #[must_use]
    pub fn with_branch_token(mut self, token: impl Into<String>) -> Self {
        self.branch_token = token.into();
        self
    }

    /// Uses `ledger` as the starting port state, typically a fresh snapshot
    /// of the host.
    #[must_use]
    pub fn with_ports(mut self, ledger: PortLedger) -> Self {
        self.ports = ledger;
        self
    }

    /// Disables prompting; unresolved variables become empty strings.
    #[must_use]
    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// The environment snapshot.
    #[must_use]
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// The branch, if known.
    #[must_use]
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// The variable name bound to the branch.
    #[must_use]
    pub fn branch_token(&self) -> &str {
        &self.branch_token
    }

    /// Returns `true` if prompting is disabled.
    #[must_use]
    pub fn is_silent(&self) -> bool {
        self.silent
    }

    /// The port ledger of this invocation.
    #[must_use]
    pub fn ports(&self) -> &PortLedger {
        &self.ports
    }

    fn lookup(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.environment.get(name) {
            return Some(value);
        }
        if name == self.branch_token {
            if let Some(branch) = self.branch.as_deref() {
                return Some(branch);
            }
        }
        self.answers.get(name).map(String::as_str)
    }
}

/// Produces values for placeholders.
///
/// Variables resolve in this order:
///
/// 1. the environment snapshot, also in silent mode
/// 2. the branch, when the name is the branch token and a branch is known
/// 3. an answer given earlier in the same invocation
/// 4. the empty string in silent mode, otherwise the prompter
///
/// Missing variables are never an error. `auto_port()` claims a fresh port
/// in the context's ledger.
///
/// # Examples
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use sprout::port::allocator::PortAllocator;
/// use sprout::port::registry::FixedPortSource;
/// use sprout::template::{parse, Environment, ResolutionContext, Resolver, ScriptedPrompter};
/// use sprout::PortRange;
///
/// let allocator = PortAllocator::with_rng(
///     FixedPortSource::empty(),
///     PortRange::unprivileged(),
///     StdRng::seed_from_u64(1),
/// );
/// let mut resolver = Resolver::new(allocator, ScriptedPrompter::new(["typed"]));
/// let mut ctx = ResolutionContext::new(Environment::from_pairs([("HOME_DIR", "/home/me")]));
///
/// let template = parse("{{ HOME_DIR }} {{ TOKEN }}");
/// let values: Vec<String> = template
///     .segments()
///     .iter()
///     .map(|segment| resolver.resolve(segment, &mut ctx).unwrap().into_owned())
///     .collect();
/// assert_eq!(values, vec!["/home/me", " ", "typed"]);
/// ```
#[derive(Debug)]
pub struct Resolver<P, S: PortSource = SystemPortSource, R: Rng = ThreadRng> {
    allocator: PortAllocator<S, R>,
    prompter: P,
}

impl<P: Prompter, S: PortSource, R: Rng> Resolver<P, S, R> {
    /// Creates a resolver.
    pub fn new(allocator: PortAllocator<S, R>, prompter: P) -> Self {
        Self {
            allocator,
            prompter,
        }
    }

    /// The port allocator.
    pub fn allocator(&self) -> &PortAllocator<S, R> {
        &self.allocator
    }

    /// Gives the prompter back, e.g. to inspect a scripted one in tests.
    pub fn into_prompter(self) -> P {
        self.prompter
    }

    /// Resolves one segment to its output text.
    ///
    /// # Errors
    ///
    /// - [`Error::Prompt`] if reading an interactive answer fails
    /// - [`Error::PortExhausted`] if no port is left for `auto_port()`
    pub fn resolve<'s>(
        &mut self,
        segment: &'s Segment,
        ctx: &mut ResolutionContext,
    ) -> Result<Cow<'s, str>> {
        match segment {
            Segment::Literal(text) => Ok(Cow::Borrowed(text)),
            Segment::EnvRef { name, .. } => self.variable(name, ctx).map(Cow::Owned),
            Segment::AutoPort { .. } => {
                let port = self.allocator.allocate(&mut ctx.ports)?;
                Ok(Cow::Owned(port.to_string()))
            }
        }
    }

    fn variable(&mut self, name: &str, ctx: &mut ResolutionContext) -> Result<String> {
        if let Some(value) = ctx.lookup(name) {
            return Ok(value.to_string());
        }
        if ctx.silent {
            log::debug!("{name} is not set, using an empty value");
            return Ok(String::new());
        }

        let answer = self.prompter.ask(name).map_err(Error::Prompt)?;
        ctx.answers.insert(name.to_string(), answer.clone());
        Ok(answer)
    }
}
