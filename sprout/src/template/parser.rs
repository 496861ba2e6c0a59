//! Template parsing.
//!
//! A template is split into literal text and two kinds of placeholder,
//! both written between double curly braces:
//!
//! - `{{ NAME }}`: a variable reference, where `NAME` is an identifier
//! - `{{ auto_port() }}`: a request for a fresh port
//!
//! Anything else between braces, an opener without a closer, and
//! shell-style `${VAR:-default}` expansions are kept as literal text, so
//! files shared with other tools pass through untouched. Parsing never
//! fails.

use std::fmt;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const AUTO_PORT: &str = "auto_port";

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied to the output unchanged.
    Literal(String),
    /// A `{{ NAME }}` reference.
    EnvRef {
        /// The trimmed variable name.
        name: String,
        /// The placeholder exactly as written.
        raw: String,
    },
    /// A `{{ auto_port() }}` call.
    AutoPort {
        /// The placeholder exactly as written.
        raw: String,
    },
}

impl Segment {
    /// The source text this segment was parsed from.
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            Self::Literal(text) => text,
            Self::EnvRef { raw, .. } | Self::AutoPort { raw } => raw,
        }
    }

    /// Returns `true` for placeholder segments.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        !matches!(self, Self::Literal(_))
    }
}

/// A parsed template: an ordered list of segments.
///
/// Adjacent literal text is always merged into a single segment, and the
/// raw text of all segments concatenated is exactly the parsed input.
///
/// # Examples
///
/// ```
/// use sprout::template::{parse, Segment};
///
/// let template = parse("PORT={{ auto_port() }}\nKEEP=${KEEP:-x}\n");
/// assert_eq!(template.segments().len(), 3);
/// assert!(matches!(template.segments()[1], Segment::AutoPort { .. }));
/// assert_eq!(template.source(), "PORT={{ auto_port() }}\nKEEP=${KEEP:-x}\n");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// The segments in source order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Reassembles the original text.
    #[must_use]
    pub fn source(&self) -> String {
        self.segments.iter().map(Segment::raw).collect()
    }

    /// Returns `true` if the template has no placeholders.
    #[must_use]
    pub fn is_literal_only(&self) -> bool {
        !self.segments.iter().any(Segment::is_placeholder)
    }

    /// Names referenced by `{{ NAME }}` placeholders, in order of appearance.
    pub fn env_refs(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::EnvRef { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }

    /// Number of `{{ auto_port() }}` placeholders.
    #[must_use]
    pub fn auto_port_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| matches!(segment, Segment::AutoPort { .. }))
            .count()
    }

    fn push_literal(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Segment::Literal(last)) = self.segments.last_mut() {
            last.push_str(text);
        } else {
            self.segments.push(Segment::Literal(text.to_string()));
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.segments
            .iter()
            .try_for_each(|segment| f.write_str(segment.raw()))
    }
}

/// Parses template text into segments.
///
/// # Examples
///
/// ```
/// use sprout::template::{parse, Segment};
///
/// let template = parse("KEY={{ API_KEY }}");
/// assert_eq!(template.env_refs().collect::<Vec<_>>(), vec!["API_KEY"]);
///
/// // Unknown placeholder syntax stays literal.
/// assert!(parse("{{ upper(NAME) }}").is_literal_only());
/// ```
#[must_use]
pub fn parse(text: &str) -> Template {
    let mut template = Template::default();
    let mut rest = text;

    while let Some(open) = rest.find(OPEN) {
        template.push_literal(&rest[..open]);
        let after_open = &rest[open + OPEN.len()..];

        let Some(close) = after_open.find(CLOSE) else {
            template.push_literal(&rest[open..]);
            return template;
        };

        let inner = &after_open[..close];
        let end = open + OPEN.len() + close + CLOSE.len();
        let raw = &rest[open..end];

        match classify(inner, raw) {
            Some(segment) => {
                template.segments.push(segment);
                rest = &rest[end..];
            }
            None => {
                // Keep the opener and rescan right after it, so a valid
                // placeholder nested in unknown syntax is still found.
                template.push_literal(OPEN);
                rest = after_open;
            }
        }
    }

    template.push_literal(rest);
    template
}

fn classify(inner: &str, raw: &str) -> Option<Segment> {
    if inner.contains('\n') {
        return None;
    }
    let body = inner.trim();

    if is_auto_port_call(body) {
        return Some(Segment::AutoPort {
            raw: raw.to_string(),
        });
    }

    is_identifier(body).then(|| Segment::EnvRef {
        name: body.to_string(),
        raw: raw.to_string(),
    })
}

fn is_auto_port_call(body: &str) -> bool {
    body.strip_prefix(AUTO_PORT)
        .and_then(|args| args.trim_start().strip_prefix('('))
        .is_some_and(|args| args.trim() == ")")
}

fn is_identifier(body: &str) -> bool {
    let mut chars = body.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
