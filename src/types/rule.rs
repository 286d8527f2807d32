use super::scalar::Scalar;

const ACL_FIELDS: &[&str] = &["type", "glob", "url"];
const FILTER_FIELDS: &[&str] = &[
    "type",
    "glob",
    "method",
    "url",
    "query",
    "protocol",
    "path",
    "selectors",
    "extension",
    "suffix",
];
const GLOB_FIELDS: &[&str] = &["type", "glob"];
const STATISTICS_FIELDS: &[&str] = &["category", "glob"];

/// The fixed categories of rule entry, each with its own field schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    AllowedClient,
    Filter,
    CacheRule,
    IgnoreUrlParam,
    Invalidate,
    Statistics,
}

impl RuleKind {
    pub const ALL: [RuleKind; 6] = [
        RuleKind::AllowedClient,
        RuleKind::Filter,
        RuleKind::CacheRule,
        RuleKind::IgnoreUrlParam,
        RuleKind::Invalidate,
        RuleKind::Statistics,
    ];

    /// Fields an entry of this kind may carry, in output order. `rank` is
    /// accepted on every kind and is not part of the schema.
    #[must_use]
    pub fn schema(self) -> &'static [&'static str] {
        match self {
            RuleKind::AllowedClient => ACL_FIELDS,
            RuleKind::Filter => FILTER_FIELDS,
            RuleKind::CacheRule | RuleKind::IgnoreUrlParam | RuleKind::Invalidate => GLOB_FIELDS,
            RuleKind::Statistics => STATISTICS_FIELDS,
        }
    }

    /// Fields that must be present on every entry.
    #[must_use]
    pub fn required(self) -> &'static [&'static str] {
        match self {
            RuleKind::Statistics => STATISTICS_FIELDS,
            _ => &["type"],
        }
    }

    /// Parameter name the collection is supplied under.
    #[must_use]
    pub fn option(self) -> &'static str {
        match self {
            RuleKind::AllowedClient => "allowed_clients",
            RuleKind::Filter => "filters",
            RuleKind::CacheRule => "cache_rules",
            RuleKind::IgnoreUrlParam => "ignore_parameters",
            RuleKind::Invalidate => "invalidate",
            RuleKind::Statistics => "statistics",
        }
    }

    /// Block name of the rendered section.
    #[must_use]
    pub fn section(self) -> &'static str {
        match self {
            RuleKind::AllowedClient => "allowedClients",
            RuleKind::Filter => "filter",
            RuleKind::CacheRule => "rules",
            RuleKind::IgnoreUrlParam => "ignoreUrlParams",
            RuleKind::Invalidate => "invalidate",
            RuleKind::Statistics => "statistics",
        }
    }

    #[must_use]
    pub fn allows(self, field: &str) -> bool {
        self.schema().contains(&field)
    }

    /// The catch-all entry emitted when the caller supplies none.
    #[must_use]
    pub fn default_entry(self) -> Option<RuleEntry> {
        let verdict = match self {
            RuleKind::AllowedClient | RuleKind::Filter | RuleKind::Invalidate => "allow",
            RuleKind::CacheRule => "deny",
            RuleKind::IgnoreUrlParam | RuleKind::Statistics => return None,
        };
        Some(
            RuleEntry::new(self)
                .with("type", verdict)
                .with("glob", "*"),
        )
    }
}

/// One line item of a rule collection.
///
/// `rank` is kept apart from the schema fields: an absent rank is a distinct
/// state, not zero, and drives ordering in [`order`](crate::order).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleEntry {
    pub kind: RuleKind,
    pub rank: Option<i64>,
    pub fields: Vec<(String, Scalar)>,
}

impl RuleEntry {
    #[must_use]
    pub fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            rank: None,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn ranked(mut self, rank: i64) -> Self {
        self.rank = Some(rank);
        self
    }

    /// Set a field, replacing any earlier value for the same name.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
        self
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Scalar> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, v)| v)
    }
}
