//! Interactive input.
//!
//! Values missing from the environment are asked for through a [`Prompter`],
//! and the workspace commands use it for yes/no confirmations. Tests supply
//! a [`ScriptedPrompter`] instead of real standard input.

use std::collections::VecDeque;
use std::io::{self, BufRead, Stderr, StdinLock, Write};

/// A source of interactive answers.
pub trait Prompter {
    /// Asks for a value for the variable `label`.
    ///
    /// Returns the entered line without its line terminator. An empty line
    /// is a valid (empty) answer.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the answer fails.
    fn ask(&mut self, label: &str) -> io::Result<String>;

    /// Asks a yes/no question, returning `default` on an empty answer.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the answer fails.
    fn confirm(&mut self, question: &str, default: bool) -> io::Result<bool>;
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn ask(&mut self, label: &str) -> io::Result<String> {
        (**self).ask(label)
    }

    fn confirm(&mut self, question: &str, default: bool) -> io::Result<bool> {
        (**self).confirm(question, default)
    }
}

impl<P: Prompter + ?Sized> Prompter for Box<P> {
    fn ask(&mut self, label: &str) -> io::Result<String> {
        (**self).ask(label)
    }

    fn confirm(&mut self, question: &str, default: bool) -> io::Result<bool> {
        (**self).confirm(question, default)
    }
}

/// Line-based prompter over any reader and writer.
///
/// Prompts are written to `output` (standard error for [`LinePrompter::stdio`],
/// which keeps standard output clean for machine-readable results) and
/// answers are read one line at a time from `input`. End of input counts as
/// an empty answer.
///
/// # Examples
///
/// ```
/// use sprout::template::{LinePrompter, Prompter};
///
/// let mut output = Vec::new();
/// let mut prompter = LinePrompter::new(&b"secret\ny\n"[..], &mut output);
///
/// assert_eq!(prompter.ask("API_KEY").unwrap(), "secret");
/// assert!(prompter.confirm("Continue?", false).unwrap());
/// ```
#[derive(Debug)]
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl LinePrompter<StdinLock<'static>, Stderr> {
    /// Prompter reading standard input and writing prompts to standard error.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    /// Creates a prompter over the given streams.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_answer(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn ask(&mut self, label: &str) -> io::Result<String> {
        self.read_answer(&format!("Enter a value for {label}: "))
    }

    fn confirm(&mut self, question: &str, default: bool) -> io::Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        let answer = self.read_answer(&format!("{question} {hint}: "))?;
        Ok(match answer.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => true,
            "n" | "no" => false,
            _ => default,
        })
    }
}

/// Prompter answering from a fixed script.
///
/// Every question is recorded. Running out of scripted answers is an
/// `UnexpectedEof` error, so a test notices an unexpected prompt.
///
/// # Examples
///
/// ```
/// use sprout::template::{Prompter, ScriptedPrompter};
///
/// let mut prompter = ScriptedPrompter::new(["value"]);
/// assert_eq!(prompter.ask("NAME").unwrap(), "value");
/// assert!(prompter.ask("OTHER").is_err());
/// assert_eq!(prompter.asked(), &["NAME".to_string(), "OTHER".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    confirmations: VecDeque<bool>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    /// Creates a prompter that answers `ask` calls in order.
    #[must_use]
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Adds answers for `confirm` calls, used in order.
    #[must_use]
    pub fn with_confirmations(mut self, confirmations: impl IntoIterator<Item = bool>) -> Self {
        self.confirmations.extend(confirmations);
        self
    }

    /// Every label or question asked so far.
    #[must_use]
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    fn exhausted(what: &str) -> io::Error {
        io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("no scripted answer left for {what}"),
        )
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, label: &str) -> io::Result<String> {
        self.asked.push(label.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| Self::exhausted(label))
    }

    fn confirm(&mut self, question: &str, _default: bool) -> io::Result<bool> {
        self.asked.push(question.to_string());
        self.confirmations
            .pop_front()
            .ok_or_else(|| Self::exhausted(question))
    }
}
