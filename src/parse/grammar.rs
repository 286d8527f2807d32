use winnow::ascii::till_line_ending;
use winnow::combinator::{alt, cut_err, opt, preceded, repeat, terminated};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{take_till, take_while};

use crate::{Document, Node};

// -- Whitespace & comments --------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    let _: () = repeat(
        0..,
        alt((
            take_while(1.., |c: char| c.is_whitespace()).void(),
            ('#', till_line_ending).void(),
        )),
    )
    .parse_next(input)?;
    Ok(())
}

fn expected(what: &'static str) -> StrContext {
    StrContext::Expected(StrContextValue::Description(what))
}

// -- Names & values ---------------------------------------------------------

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '{' | '}' | '#')
}

fn starts_token(c: char) -> bool {
    !is_delimiter(c) && !matches!(c, '"' | '\'' | '/' | '$')
}

fn name<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| starts_token(c)).parse_next(input)
}

/// A quoted value, kept with its delimiters: `"literal"` or `'regex'`.
fn quoted<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    alt((
        ('"', take_till(0.., '"'), cut_err('"')).take(),
        ('\'', take_till(0.., '\''), cut_err('\'')).take(),
    ))
    .parse_next(input)
}

/// An unquoted value as found in hand-written files, e.g. `/port 4503`.
fn bare<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1, starts_token),
        take_while(0.., |c: char| !is_delimiter(c)),
    )
        .take()
        .parse_next(input)
}

fn value<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    alt((quoted, bare)).context(expected("value")).parse_next(input)
}

/// An unquoted path such as `/var/www`. Only valid after a property name,
/// where a value is mandatory and `/` cannot open a sibling.
fn path<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    ('/', take_while(0.., |c: char| !is_delimiter(c)))
        .take()
        .parse_next(input)
}

fn property_value<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    alt((quoted, path, bare))
        .context(expected("value"))
        .parse_next(input)
}

// -- Nodes ------------------------------------------------------------------

fn include(input: &mut &str) -> ModalResult<Node> {
    preceded(("$include", ws), cut_err(value))
        .map(|pattern: &str| Node::Include(pattern.to_owned()))
        .parse_next(input)
}

fn named(input: &mut &str) -> ModalResult<Node> {
    '/'.parse_next(input)?;
    let name = cut_err(name)
        .context(expected("name"))
        .parse_next(input)?
        .to_owned();
    ws.parse_next(input)?;

    if opt('{').parse_next(input)?.is_some() {
        let children = entries.parse_next(input)?;
        ws.parse_next(input)?;
        cut_err('}').context(expected("'}'")).parse_next(input)?;
        Ok(Node::Block { name, children })
    } else {
        let value = cut_err(property_value).parse_next(input)?;
        Ok(Node::Property {
            name,
            value: value.to_owned(),
        })
    }
}

fn entry(input: &mut &str) -> ModalResult<Node> {
    ws.parse_next(input)?;
    alt((
        include,
        named,
        value.map(|v: &str| Node::Value(v.to_owned())),
    ))
    .parse_next(input)
}

fn entries(input: &mut &str) -> ModalResult<Vec<Node>> {
    repeat(0.., entry).parse_next(input)
}

// -- Top-level parser -------------------------------------------------------

pub fn document(input: &mut &str) -> ModalResult<Document> {
    terminated(entries, ws).map(Document::new).parse_next(input)
}
