use std::fmt;

/// Errors produced when reading configuration text.
#[derive(Debug)]
pub struct ParseError {
    offset: usize,
    message: String,
}

impl ParseError {
    pub(crate) fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }

    /// Byte offset into the input where parsing stopped.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "parse error at byte {}", self.offset)
        } else {
            write!(f, "parse error at byte {}: {}", self.offset, self.message)
        }
    }
}

impl std::error::Error for ParseError {}
