mod error;
mod grammar;

pub use error::ParseError;

use crate::Document;

/// Parse configuration text into a [`Document`].
///
/// Accepts everything the writer produces, plus `#` line comments, unquoted
/// values and arbitrary whitespace, so hand-written farm files can be read
/// for comparison.
///
/// ```
/// use dispatcher_farms::parse;
///
/// let doc = parse("/farms {\n  $include \"dispatcher.*.inc.any\"\n}\n").unwrap();
/// assert_eq!(doc.nodes.len(), 1);
/// ```
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not valid configuration syntax.
pub fn parse(input: &str) -> Result<Document, ParseError> {
    use winnow::Parser;
    grammar::document
        .parse(input)
        .map_err(|e| ParseError::new(e.offset(), e.inner().to_string()))
}
