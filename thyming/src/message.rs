//! The messages a [`Timer`] writes to its sink.
//!
//! Every click may be accompanied by a message before and after the body line; each of them is a
//! [`TimerMessage`]. The body line itself is rendered from a [`MessageTemplate`] containing the
//! elapsed number of seconds.

use std::borrow::Cow;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::time::format_seconds;
use crate::time::local_now;

#[cfg(doc)]
use crate::Timer;

/// The context of a default message; determines the prefix of the generated timestamp line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefaultMessage {
    /// `START: <timestamp>`
    Start,
    /// `MEASURED: <timestamp>`
    Measure,
    /// `END: <timestamp>`
    End,
}

impl DefaultMessage {
    fn prefix(self) -> &'static str {
        match self {
            DefaultMessage::Start => "START",
            DefaultMessage::Measure => "MEASURED",
            DefaultMessage::End => "END",
        }
    }

    /// Renders the line for this context at the given local time, with second precision.
    pub fn render_at(self, timestamp: &NaiveDateTime) -> String {
        format!("{}: {}", self.prefix(), format_seconds(timestamp))
    }

    /// Renders the line for this context at the current local time.
    pub fn render(self) -> String {
        self.render_at(&local_now())
    }
}

/// An instruction for what a [`Timer`] should log at a given point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TimerMessage {
    /// Log nothing.
    #[default]
    Omitted,
    /// Log the text verbatim; embedded newlines produce separate lines.
    Literal(String),
    /// Log the timestamp line appropriate for the context.
    Default(DefaultMessage),
}

impl TimerMessage {
    /// Resolves the message to the text it stands for, or `None` if nothing should be logged.
    ///
    /// Note that an empty literal resolves to an empty string rather than `None`.
    pub fn resolve(&self) -> Option<Cow<'_, str>> {
        match self {
            TimerMessage::Omitted => None,
            TimerMessage::Literal(text) => Some(Cow::Borrowed(text)),
            TimerMessage::Default(context) => Some(Cow::Owned(context.render())),
        }
    }

    /// Like [`TimerMessage::resolve`], but empty literals also resolve to `None`.
    pub(crate) fn resolve_non_empty(&self) -> Option<Cow<'_, str>> {
        self.resolve().filter(|text| !text.is_empty())
    }
}

impl From<&str> for TimerMessage {
    fn from(text: &str) -> Self {
        TimerMessage::Literal(text.to_owned())
    }
}

impl From<String> for TimerMessage {
    fn from(text: String) -> Self {
        TimerMessage::Literal(text)
    }
}

impl From<DefaultMessage> for TimerMessage {
    fn from(context: DefaultMessage) -> Self {
        TimerMessage::Default(context)
    }
}

impl<T: Into<TimerMessage>> From<Option<T>> for TimerMessage {
    fn from(message: Option<T>) -> Self {
        message.map_or(TimerMessage::Omitted, Into::into)
    }
}

/// The errors which can occur while parsing a [`MessageTemplate`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A brace which is neither escaped nor part of a placeholder.
    #[error("unmatched `{brace}` at byte {position} of the message template")]
    UnmatchedBrace {
        /// The offending brace.
        brace: char,
        /// Byte offset of the brace in the template.
        position: usize,
    },
    /// A placeholder with an argument or format specification which is not supported.
    #[error("unsupported placeholder `{{{0}}}`, expected `{{}}`, `{{0}}` or `{{:.N}}`")]
    UnsupportedPlaceholder(String),
    /// The template does not contain exactly one placeholder.
    #[error("the message template must contain exactly one placeholder, found {0}")]
    PlaceholderCount(usize),
}

/// The body line of a click: a text with exactly one placeholder for the elapsed seconds.
///
/// Supported placeholders are `{}` and `{0}`, which render the shortest representation of the
/// value, and `{:.N}`, `{0:.N}` or `{:W.Nf}`, which render it with `N` decimals (the width `W` is
/// accepted but ignored). An `f` without a precision, as in `{:f}`, renders six decimals. Literal
/// braces are written as `{{` and `}}`.
///
/// A precision always counts decimals, as in Rust's `format!`, also when the `f` is left out;
/// `{:.2}` renders `12.3456` as `12.35`, not as two significant digits.
///
/// ```
/// use thyming::MessageTemplate;
///
/// let template: MessageTemplate = "took {:.2}s".parse().expect("valid template");
/// assert_eq!(template.render(1.23456), "took 1.23s");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    source: String,
    prefix: String,
    precision: Option<usize>,
    suffix: String,
}

impl MessageTemplate {
    /// The template used by a [`Timer`] unless configured otherwise.
    pub const DEFAULT: &'static str = "Elapsed time: {:0.4f} seconds.";

    /// Parses a template, see the type documentation for the accepted syntax.
    pub fn parse(source: &str) -> Result<MessageTemplate, TemplateError> {
        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut precision = None;
        let mut num_placeholders = 0;

        let mut chars = source.char_indices().peekable();
        while let Some((position, c)) = chars.next() {
            let text = if num_placeholders == 0 {
                &mut prefix
            } else {
                &mut suffix
            };

            match c {
                '{' if chars.next_if(|&(_, next)| next == '{').is_some() => text.push('{'),
                '}' if chars.next_if(|&(_, next)| next == '}').is_some() => text.push('}'),
                '{' => {
                    let mut placeholder = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((_, inner)) => placeholder.push(inner),
                            None => {
                                return Err(TemplateError::UnmatchedBrace {
                                    brace: '{',
                                    position,
                                })
                            }
                        }
                    }
                    precision = parse_placeholder(&placeholder)?;
                    num_placeholders += 1;
                }
                '}' => return Err(TemplateError::UnmatchedBrace { brace: '}', position }),
                _ => text.push(c),
            }
        }

        if num_placeholders != 1 {
            return Err(TemplateError::PlaceholderCount(num_placeholders));
        }

        Ok(MessageTemplate {
            source: source.to_owned(),
            prefix,
            precision,
            suffix,
        })
    }

    /// The template as it was written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Renders the template with the given number of seconds.
    pub fn render(&self, seconds: f64) -> String {
        match self.precision {
            Some(precision) => format!("{}{seconds:.precision$}{}", self.prefix, self.suffix),
            None => format!("{}{seconds:?}{}", self.prefix, self.suffix),
        }
    }
}

/// Parses the text between the braces of a placeholder into its (optional) precision.
fn parse_placeholder(placeholder: &str) -> Result<Option<usize>, TemplateError> {
    let unsupported = || TemplateError::UnsupportedPlaceholder(placeholder.to_owned());

    let (index, format_spec) = placeholder
        .split_once(':')
        .unwrap_or((placeholder, ""));
    if !(index.is_empty() || index == "0") {
        return Err(unsupported());
    }

    let (format_spec, fixed_point) = match format_spec.strip_suffix('f') {
        Some(format_spec) => (format_spec, true),
        None => (format_spec, false),
    };
    let (width, precision) = match format_spec.split_once('.') {
        Some((width, precision)) => (width, Some(precision)),
        None => (format_spec, None),
    };
    if !width.chars().all(|c| c.is_ascii_digit()) {
        return Err(unsupported());
    }

    match precision {
        Some(precision) => precision
            .parse::<usize>()
            .map(Some)
            .map_err(|_| unsupported()),
        None if fixed_point => Ok(Some(DEFAULT_FIXED_POINT_PRECISION)),
        None => Ok(None),
    }
}

/// The number of decimals of an `f` placeholder without an explicit precision.
const DEFAULT_FIXED_POINT_PRECISION: usize = 6;

impl Default for MessageTemplate {
    fn default() -> Self {
        MessageTemplate {
            source: MessageTemplate::DEFAULT.to_owned(),
            prefix: "Elapsed time: ".to_owned(),
            precision: Some(4),
            suffix: " seconds.".to_owned(),
        }
    }
}

impl FromStr for MessageTemplate {
    type Err = TemplateError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        MessageTemplate::parse(source)
    }
}

impl TryFrom<&str> for MessageTemplate {
    type Error = TemplateError;

    fn try_from(source: &str) -> Result<Self, Self::Error> {
        MessageTemplate::parse(source)
    }
}

impl Display for MessageTemplate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}
