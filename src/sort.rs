use std::cmp::Ordering;

use crate::RuleEntry;

/// Anything that may carry an optional ordering rank.
pub trait Rank {
    fn rank(&self) -> Option<i64>;
}

impl Rank for RuleEntry {
    fn rank(&self) -> Option<i64> {
        self.rank
    }
}

impl Rank for Option<i64> {
    fn rank(&self) -> Option<i64> {
        *self
    }
}

/// An entry together with the zero-based output index it is rendered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranked<T> {
    pub index: usize,
    pub item: T,
}

/// Deterministically order a ranked collection.
///
/// Unranked entries come first in their original order, followed by ranked
/// entries ascending by rank. Ties keep their original order. An unranked
/// entry precedes every ranked one, whatever the rank's magnitude or sign.
///
/// ```
/// use dispatcher_farms::order;
///
/// let ranks: [Option<i64>; 4] = [Some(3), None, Some(1), None];
/// let out: Vec<_> = order(&ranks).into_iter().map(|r| *r.item).collect();
/// assert_eq!(out, [None, None, Some(1), Some(3)]);
/// ```
pub fn order<T: Rank>(entries: &[T]) -> Vec<Ranked<&T>> {
    let mut positions: Vec<usize> = (0..entries.len()).collect();
    positions.sort_by(|&a, &b| compare(entries[a].rank(), a, entries[b].rank(), b));

    tracing::trace!(
        entries = entries.len(),
        ranked = entries.iter().filter(|e| e.rank().is_some()).count(),
        "ordered rule collection"
    );

    positions
        .into_iter()
        .enumerate()
        .map(|(index, position)| Ranked {
            index,
            item: &entries[position],
        })
        .collect()
}

fn compare(a: Option<i64>, a_pos: usize, b: Option<i64>, b_pos: usize) -> Ordering {
    (a.is_some(), a, a_pos).cmp(&(b.is_some(), b, b_pos))
}
