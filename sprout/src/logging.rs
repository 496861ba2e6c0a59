//! Logging for sprout.
//!
//! A small stderr logger with three verbosity levels. The same logger also
//! backs the `log` facade once [`Logger::install`] is called, so the
//! `log::debug!` records emitted by the library show up in verbose mode.

use std::env;
use std::fmt;

/// Environment variable consulted when no verbosity flag is given.
pub const LOG_MODE_ENV: &str = "SPROUT_LOG_MODE";

/// Logging level for controlling output verbosity.
///
/// # Examples
///
/// ```
/// use sprout::LogLevel;
///
/// assert!(LogLevel::Quiet < LogLevel::Normal);
/// assert!(LogLevel::Normal < LogLevel::Verbose);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Errors only.
    Quiet,
    /// Errors, warnings and progress.
    Normal,
    /// Everything, including debug records from the library.
    Verbose,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quiet => write!(f, "quiet"),
            Self::Normal => write!(f, "normal"),
            Self::Verbose => write!(f, "verbose"),
        }
    }
}

impl LogLevel {
    /// Parses a log level, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not `quiet`, `normal` or `verbose`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sprout::LogLevel;
    ///
    /// assert_eq!(LogLevel::parse("VERBOSE").unwrap(), LogLevel::Verbose);
    /// assert!(LogLevel::parse("loud").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "quiet" => Ok(Self::Quiet),
            "normal" => Ok(Self::Normal),
            "verbose" => Ok(Self::Verbose),
            _ => Err(format!("invalid log level: {s}")),
        }
    }

    /// The `log` crate filter matching this level.
    #[must_use]
    pub const fn level_filter(self) -> log::LevelFilter {
        match self {
            Self::Quiet => log::LevelFilter::Error,
            Self::Normal => log::LevelFilter::Warn,
            Self::Verbose => log::LevelFilter::Debug,
        }
    }
}

/// A stderr logger.
///
/// Errors are always printed. Warnings and progress lines need
/// [`LogLevel::Normal`], info and debug lines need [`LogLevel::Verbose`].
///
/// # Examples
///
/// ```
/// use sprout::{LogLevel, Logger};
///
/// let logger = Logger::new(LogLevel::Quiet);
/// logger.error("shown even when quiet");
/// logger.progress("Processing .env.example files...");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Logger {
    level: LogLevel,
}

impl Logger {
    /// Creates a logger with the given level.
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self { level }
    }

    /// Returns the configured level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// Returns `true` if messages at `level` are printed.
    #[must_use]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.level >= level
    }

    /// Logs an error.
    pub fn error(&self, message: &str) {
        eprintln!("ERROR: {message}");
    }

    /// Logs a warning.
    pub fn warn(&self, message: &str) {
        if self.enabled(LogLevel::Normal) {
            eprintln!("WARN: {message}");
        }
    }

    /// Prints an unprefixed progress line.
    pub fn progress(&self, message: &str) {
        if self.enabled(LogLevel::Normal) {
            eprintln!("{message}");
        }
    }

    /// Logs an informational message.
    pub fn info(&self, message: &str) {
        if self.enabled(LogLevel::Verbose) {
            eprintln!("INFO: {message}");
        }
    }

    /// Logs a debug message.
    pub fn debug(&self, message: &str) {
        if self.enabled(LogLevel::Verbose) {
            eprintln!("DEBUG: {message}");
        }
    }

    /// Routes `log` records through a copy of this logger.
    ///
    /// Only the first call in a process takes effect.
    pub fn install(&self) {
        if log::set_boxed_logger(Box::new(*self)).is_ok() {
            log::set_max_level(self.level.level_filter());
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogLevel::Normal)
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= self.level.level_filter()
    }

    fn log(&self, record: &log::Record<'_>) {
        if !log::Log::enabled(self, record.metadata()) {
            return;
        }
        let message = record.args().to_string();
        match record.level() {
            log::Level::Error => self.error(&message),
            log::Level::Warn => self.warn(&message),
            log::Level::Info => self.info(&message),
            log::Level::Debug | log::Level::Trace => self.debug(&message),
        }
    }

    fn flush(&self) {}
}

/// Chooses the log level from CLI flags and the environment.
///
/// Priority: `verbose`, then `quiet`, then [`LOG_MODE_ENV`], then
/// [`LogLevel::Normal`]. An unparsable environment value is ignored.
///
/// # Examples
///
/// ```
/// use sprout::{init_logger, LogLevel};
///
/// assert_eq!(init_logger(true, true).level(), LogLevel::Verbose);
/// assert_eq!(init_logger(false, true).level(), LogLevel::Quiet);
/// ```
#[must_use]
pub fn init_logger(verbose: bool, quiet: bool) -> Logger {
    if verbose {
        return Logger::new(LogLevel::Verbose);
    }
    if quiet {
        return Logger::new(LogLevel::Quiet);
    }

    env::var(LOG_MODE_ENV)
        .ok()
        .and_then(|value| LogLevel::parse(&value).ok())
        .map_or_else(Logger::default, Logger::new)
}
