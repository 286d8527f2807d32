use std::borrow::Cow;
use std::fmt;

use super::error::RenderError;
use super::value::Value;

/// Render a loosely-typed value into its quoted configuration form.
///
/// A string that both starts and ends with a single quote is an already
/// delimited regular expression and is emitted verbatim. Any other string,
/// integer, or boolean is emitted inside double quotes, with no escaping.
///
/// ```
/// use dispatcher_farms::{render, Value};
///
/// assert_eq!(render(&Value::from("*")).unwrap(), "\"*\"");
/// assert_eq!(render(&Value::from("'.*'")).unwrap(), "'.*'");
/// assert_eq!(render(&Value::from(true)).unwrap(), "\"1\"");
/// ```
///
/// # Errors
///
/// Returns [`RenderError::InvalidValueKind`] for null, arrays and records.
pub fn render(value: &Value) -> Result<String, RenderError> {
    match value {
        Value::String(s) => Ok(quote(s)),
        Value::Int(i) => Ok(quote(&i.to_string())),
        Value::Bool(b) => Ok(quote(if *b { "1" } else { "0" })),
        other => Err(RenderError::InvalidValueKind {
            kind: other.kind_name(),
        }),
    }
}

pub(crate) fn is_pattern(text: &str) -> bool {
    text.starts_with('\'') && text.ends_with('\'')
}

pub(crate) fn quote(text: &str) -> String {
    if is_pattern(text) {
        text.to_owned()
    } else {
        format!("\"{text}\"")
    }
}

/// How a toggle or log level was spelled by the caller. Output preserves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spelling {
    Numeric,
    Named,
}

/// A `0`/`1` option, optionally spelled `off`/`on`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Toggle {
    on: bool,
    spelling: Spelling,
}

impl Toggle {
    #[must_use]
    pub const fn numeric(on: bool) -> Self {
        Self {
            on,
            spelling: Spelling::Numeric,
        }
    }

    #[must_use]
    pub const fn named(on: bool) -> Self {
        Self {
            on,
            spelling: Spelling::Named,
        }
    }

    #[must_use]
    pub fn is_on(self) -> bool {
        self.on
    }

    #[must_use]
    pub fn spelling(self) -> Spelling {
        self.spelling
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match (self.spelling, self.on) {
            (Spelling::Numeric, false) => "0",
            (Spelling::Numeric, true) => "1",
            (Spelling::Named, false) => "off",
            (Spelling::Named, true) => "on",
        }
    }
}

/// Dispatcher log verbosity, numbered `0` (error) through `4` (trace).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub(crate) const NAMES: [&'static str; 5] = ["error", "warn", "info", "debug", "trace"];

    #[must_use]
    pub fn from_number(n: i64) -> Option<Self> {
        match n {
            0 => Some(LogLevel::Error),
            1 => Some(LogLevel::Warn),
            2 => Some(LogLevel::Info),
            3 => Some(LogLevel::Debug),
            4 => Some(LogLevel::Trace),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .position(|n| *n == name)
            .and_then(|i| Self::from_number(i64::try_from(i).ok()?))
    }

    #[must_use]
    pub fn number(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        Self::NAMES[self as usize]
    }
}

/// A log level together with the spelling the caller used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Level {
    pub level: LogLevel,
    pub spelling: Spelling,
}

/// A validated leaf value ready for output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scalar {
    /// A literal, or a `'regex'` when wrapped in single quotes.
    Text(String),
    Int(i64),
    Toggle(Toggle),
    Level(Level),
}

impl Scalar {
    /// Canonical unquoted text of this value.
    #[must_use]
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Scalar::Text(s) => Cow::Borrowed(s),
            Scalar::Int(i) => Cow::Owned(i.to_string()),
            Scalar::Toggle(t) => Cow::Borrowed(t.as_str()),
            Scalar::Level(l) => match l.spelling {
                Spelling::Numeric => Cow::Owned(l.level.number().to_string()),
                Spelling::Named => Cow::Borrowed(l.level.name()),
            },
        }
    }

    /// The quoted form, as it appears in a farm document.
    #[must_use]
    pub fn render(&self) -> String {
        quote(&self.as_text())
    }

    /// Whether this is a single-quoted regex pattern.
    #[must_use]
    pub fn is_pattern(&self) -> bool {
        matches!(self, Scalar::Text(s) if is_pattern(s))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<Toggle> for Scalar {
    fn from(v: Toggle) -> Self {
        Scalar::Toggle(v)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn glob_is_double_quoted() {
        assert_eq!(render(&Value::from("*")).unwrap(), "\"*\"");
    }

    #[test]
    fn regex_passes_through() {
        assert_eq!(render(&Value::from("'.*'")).unwrap(), "'.*'");
        assert_eq!(
            render(&Value::from("'(content|apps).*'")).unwrap(),
            "'(content|apps).*'"
        );
    }

    #[test]
    fn quote_detection_edges() {
        assert_eq!(render(&Value::from("'")).unwrap(), "'");
        assert_eq!(render(&Value::from("'open")).unwrap(), "\"'open\"");
    }

    #[test]
    fn interior_quotes_are_not_escaped() {
        assert_eq!(render(&Value::from("a\"b")).unwrap(), "\"a\"b\"");
    }

    #[test]
    fn integers_and_booleans() {
        assert_eq!(render(&Value::Int(4503)).unwrap(), "\"4503\"");
        assert_eq!(render(&Value::Bool(false)).unwrap(), "\"0\"");
        assert_eq!(render(&Value::Bool(true)).unwrap(), "\"1\"");
    }

    #[test]
    fn containers_are_rejected() {
        assert_eq!(
            render(&Value::List(vec![])),
            Err(RenderError::InvalidValueKind { kind: "array" })
        );
        assert_eq!(
            render(&Value::Map(BTreeMap::new())),
            Err(RenderError::InvalidValueKind { kind: "record" })
        );
        assert_eq!(
            render(&Value::Null),
            Err(RenderError::InvalidValueKind { kind: "null" })
        );
    }

    #[test]
    fn render_is_idempotent_on_patterns() {
        let once = render(&Value::from("'^/x$'")).unwrap();
        let twice = render(&Value::from(once.as_str())).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn toggle_spellings() {
        assert_eq!(Scalar::from(Toggle::numeric(true)).render(), "\"1\"");
        assert_eq!(Scalar::from(Toggle::numeric(false)).render(), "\"0\"");
        assert_eq!(Scalar::from(Toggle::named(true)).render(), "\"on\"");
        assert_eq!(Toggle::named(false).as_str(), "off");
    }

    #[test]
    fn log_level_lookup() {
        assert_eq!(LogLevel::from_name("warn"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_number(4), Some(LogLevel::Trace));
        assert_eq!(LogLevel::from_number(5), None);
        assert_eq!(LogLevel::from_name("verbose"), None);
        assert_eq!(LogLevel::Debug.number(), 3);
        assert_eq!(LogLevel::Info.name(), "info");
    }

    #[test]
    fn level_keeps_spelling() {
        let named = Scalar::Level(Level {
            level: LogLevel::Warn,
            spelling: Spelling::Named,
        });
        let numeric = Scalar::Level(Level {
            level: LogLevel::Warn,
            spelling: Spelling::Numeric,
        });
        assert_eq!(named.to_string(), "warn");
        assert_eq!(numeric.to_string(), "1");
    }

    #[test]
    fn scalar_pattern_detection() {
        assert!(Scalar::from("'[0-9]+'").is_pattern());
        assert!(!Scalar::from("thumb").is_pattern());
        assert!(!Scalar::Int(7).is_pattern());
    }
}
