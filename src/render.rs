use std::collections::BTreeMap;

use crate::sort::order;
use crate::{Node, RenderError, RuleEntry, RuleKind, Scalar};

/// Render one rule entry as `/<index> { /<field> <value> ... }`.
///
/// Only present fields are written, in the kind's schema order regardless of
/// the order they were supplied in.
///
/// # Errors
///
/// Returns [`RenderError::UnknownField`] when the entry carries a field the
/// kind's schema does not define.
pub fn render_block(kind: RuleKind, entry: &RuleEntry, index: usize) -> Result<Node, RenderError> {
    check_fields(kind, entry)?;
    let children = kind
        .schema()
        .iter()
        .filter_map(|field| entry.get(field).map(|v| Node::property(*field, v)))
        .collect();
    Ok(Node::block(index.to_string(), children))
}

/// Render a whole ranked collection as its named section block.
///
/// An empty collection falls back to the kind's catch-all entry; kinds with
/// no catch-all yield `None`.
///
/// # Errors
///
/// Propagates the first [`RenderError`] from [`render_block`].
pub fn render_section(kind: RuleKind, entries: &[RuleEntry]) -> Result<Option<Node>, RenderError> {
    if kind == RuleKind::Statistics {
        return render_statistics(entries);
    }
    let fallback;
    let entries = if entries.is_empty() {
        match kind.default_entry() {
            Some(entry) => {
                fallback = [entry];
                &fallback[..]
            }
            None => return Ok(None),
        }
    } else {
        entries
    };

    let children = order(entries)
        .into_iter()
        .map(|ranked| render_block(kind, ranked.item, ranked.index))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(Node::block(kind.section(), children)))
}

/// Render statistics categories as
/// `/statistics { /categories { /<category> { /glob <value> } } }`.
///
/// Categories are written in lexicographic order. Rank is ignored, and when a
/// category repeats the last glob declared for it wins. Entries missing either
/// field are skipped.
///
/// # Errors
///
/// Returns [`RenderError::UnknownField`] for a field other than `category`
/// or `glob`.
pub fn render_statistics(entries: &[RuleEntry]) -> Result<Option<Node>, RenderError> {
    let mut categories: BTreeMap<String, &Scalar> = BTreeMap::new();
    for entry in entries {
        check_fields(RuleKind::Statistics, entry)?;
        if let (Some(category), Some(glob)) = (entry.get("category"), entry.get("glob")) {
            categories.insert(category.as_text().into_owned(), glob);
        }
    }
    if categories.is_empty() {
        return Ok(None);
    }
    let children = categories
        .into_iter()
        .map(|(category, glob)| Node::block(category, vec![Node::property("glob", glob)]))
        .collect();
    Ok(Some(Node::block(
        RuleKind::Statistics.section(),
        vec![Node::block("categories", children)],
    )))
}

fn check_fields(kind: RuleKind, entry: &RuleEntry) -> Result<(), RenderError> {
    match entry.fields.iter().find(|(name, _)| !kind.allows(name)) {
        Some((name, _)) => Err(RenderError::UnknownField {
            section: kind.section(),
            field: name.clone(),
        }),
        None => Ok(()),
    }
}
