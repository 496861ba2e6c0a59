//! The env-file templating engine.
//!
//! Templates are parsed into [`Segment`]s ([`parser`]), each segment is
//! resolved against a [`ResolutionContext`] ([`resolver`]) and the results
//! are concatenated into the rendered file ([`render()`]).

pub mod environment;
pub mod parser;
pub mod prompt;
pub mod render;
pub mod resolver;

#[cfg(test)]
mod proptests;

pub use environment::Environment;
pub use parser::{parse, Segment, Template};
pub use prompt::{LinePrompter, Prompter, ScriptedPrompter};
pub use render::render;
pub use resolver::{ResolutionContext, Resolver, DEFAULT_BRANCH_TOKEN};
