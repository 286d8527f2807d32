use std::fmt;

use thiserror::Error;

/// Category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Wrong container type for a field (record vs. array vs. scalar).
    Shape,
    /// A required key is absent.
    RequiredFieldMissing,
    /// Value outside its enumerated set or numeric bound.
    Domain,
    /// Two options that must not coexist were both supplied.
    MutualExclusion,
    /// A key the option's schema does not define.
    UnknownField,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiagnosticKind::Shape => "shape error",
            DiagnosticKind::RequiredFieldMissing => "required field missing",
            DiagnosticKind::Domain => "domain error",
            DiagnosticKind::MutualExclusion => "mutual exclusion",
            DiagnosticKind::UnknownField => "unknown field",
        };
        f.write_str(s)
    }
}

/// One validation failure, qualified by the path of the offending field
/// (e.g. `filters[1].type` or `session_management.directory`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub path: String,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(path: impl Into<String>, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.path, self.kind, self.message)
    }
}

/// Every failure found while validating one parameter set.
///
/// Never empty when returned as an error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Whether any diagnostic of `kind` was recorded.
    #[must_use]
    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.items.iter().any(|d| d.kind == kind)
    }

    /// The first diagnostic recorded against `path`, if any.
    #[must_use]
    pub fn at(&self, path: &str) -> Option<&Diagnostic> {
        self.items.iter().find(|d| d.path == path)
    }

    pub(crate) fn into_result<T>(self, value: T) -> Result<T, Diagnostics> {
        if self.items.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.len())?;
        for d in self.iter() {
            write!(f, "\n  {d}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}

impl From<Diagnostic> for Diagnostics {
    fn from(d: Diagnostic) -> Self {
        Self { items: vec![d] }
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Contract violations raised by the renderers when called directly with
/// data that did not pass through the validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("cannot render a {kind} as a scalar value")]
    InvalidValueKind { kind: &'static str },

    #[error("field '{field}' is not defined for {section}")]
    UnknownField { section: &'static str, field: String },
}

impl From<RenderError> for Diagnostic {
    fn from(err: RenderError) -> Self {
        match &err {
            RenderError::InvalidValueKind { .. } => {
                Diagnostic::new("<render>", DiagnosticKind::Shape, err.to_string())
            }
            RenderError::UnknownField { section, field } => Diagnostic::new(
                format!("{section}.{field}"),
                DiagnosticKind::UnknownField,
                err.to_string(),
            ),
        }
    }
}
