use std::fmt;

use super::rule::{RuleEntry, RuleKind};
use super::scalar::Toggle;

/// URL the dispatcher polls for the vanity URL list.
pub const VANITY_URL_ENDPOINT: &str = "/libs/granite/dispatcher/content/vanityUrls.html";

pub(crate) fn file_name(priority: u8, name: &str) -> String {
    format!("dispatcher.{priority:02}-{name}.inc.any")
}

/// A backend the dispatcher forwards uncached requests to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renderer {
    pub hostname: String,
    pub port: u16,
    pub timeout: Option<i64>,
    pub receive_timeout: Option<i64>,
    pub ipv4: Option<Toggle>,
}

impl Renderer {
    /// The renderer used when a farm declares none.
    #[must_use]
    pub fn default_publish() -> Self {
        Self {
            hostname: "localhost".to_owned(),
            port: 4503,
            timeout: None,
            receive_timeout: None,
            ipv4: None,
        }
    }
}

/// Hash used to encode session cache directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Md5,
    Hex,
}

impl Encoding {
    pub(crate) const NAMES: [&'static str; 2] = ["md5", "hex"];

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "md5" => Some(Encoding::Md5),
            "hex" => Some(Encoding::Hex),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Encoding::Md5 => "md5",
            Encoding::Hex => "hex",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-session cache of authorised content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionManagement {
    pub directory: String,
    pub encode: Option<Encoding>,
    pub header: Option<String>,
    pub timeout: Option<i64>,
}

/// Vanity URL list fetched from the publish tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VanityUrls {
    pub file: String,
    pub delay: Option<i64>,
}

/// One complete, validated cache/dispatch routing policy for a site.
///
/// Produced by the validator. Empty collections mean "not supplied"; the
/// compiler substitutes catch-all defaults where the dialect needs one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Farm {
    pub name: String,
    pub docroot: String,
    pub priority: Option<u8>,

    pub allowed_clients: Vec<RuleEntry>,
    pub filters: Vec<RuleEntry>,
    pub cache_rules: Vec<RuleEntry>,
    pub ignore_parameters: Vec<RuleEntry>,
    pub invalidate: Vec<RuleEntry>,
    pub statistics: Vec<RuleEntry>,

    pub renders: Vec<Renderer>,
    pub cache_headers: Vec<String>,
    pub client_headers: Vec<String>,
    pub virtualhosts: Vec<String>,
    pub sticky_connections: Vec<String>,

    pub allow_authorized: Option<Toggle>,
    pub cache_ttl: Option<Toggle>,
    pub failover: Option<Toggle>,
    pub propagate_synd_post: Option<Toggle>,
    pub serve_stale: Option<Toggle>,

    pub grace_period: Option<i64>,
    pub retries: Option<i64>,
    pub retry_delay: Option<i64>,
    pub unavailable_penalty: Option<i64>,
    pub stat_files_level: Option<i64>,

    pub stat_file: Option<String>,
    pub health_check_url: Option<String>,
    pub invalidate_handler: Option<String>,

    pub session_management: Option<SessionManagement>,
    pub vanity_urls: Option<VanityUrls>,
}

impl Farm {
    /// Effective ordering priority; an unset priority sorts as `0`.
    #[must_use]
    pub fn priority(&self) -> u8 {
        self.priority.unwrap_or(0)
    }

    /// File name the collaborator stores this farm under. The two-digit
    /// prefix makes a glob include pick farms up in priority order.
    #[must_use]
    pub fn file_name(&self) -> String {
        file_name(self.priority(), &self.name)
    }

    #[must_use]
    pub fn rules(&self, kind: RuleKind) -> &[RuleEntry] {
        match kind {
            RuleKind::AllowedClient => &self.allowed_clients,
            RuleKind::Filter => &self.filters,
            RuleKind::CacheRule => &self.cache_rules,
            RuleKind::IgnoreUrlParam => &self.ignore_parameters,
            RuleKind::Invalidate => &self.invalidate,
            RuleKind::Statistics => &self.statistics,
        }
    }

    pub(crate) fn rules_mut(&mut self, kind: RuleKind) -> &mut Vec<RuleEntry> {
        match kind {
            RuleKind::AllowedClient => &mut self.allowed_clients,
            RuleKind::Filter => &mut self.filters,
            RuleKind::CacheRule => &mut self.cache_rules,
            RuleKind::IgnoreUrlParam => &mut self.ignore_parameters,
            RuleKind::Invalidate => &mut self.invalidate,
            RuleKind::Statistics => &mut self.statistics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_pads_priority() {
        let mut farm = Farm {
            name: "aem-site".into(),
            docroot: "/var/www".into(),
            ..Farm::default()
        };
        assert_eq!(farm.file_name(), "dispatcher.00-aem-site.inc.any");
        farm.priority = Some(1);
        assert_eq!(farm.file_name(), "dispatcher.01-aem-site.inc.any");
        farm.priority = Some(99);
        assert_eq!(farm.file_name(), "dispatcher.99-aem-site.inc.any");
    }

    #[test]
    fn rules_by_kind() {
        let mut farm = Farm::default();
        farm.rules_mut(RuleKind::Filter)
            .push(RuleEntry::new(RuleKind::Filter).with("type", "deny"));
        assert_eq!(farm.rules(RuleKind::Filter).len(), 1);
        assert!(farm.rules(RuleKind::CacheRule).is_empty());
    }

    #[test]
    fn encoding_names() {
        assert_eq!(Encoding::from_name("md5"), Some(Encoding::Md5));
        assert_eq!(Encoding::from_name("hex"), Some(Encoding::Hex));
        assert_eq!(Encoding::from_name("sha1"), None);
        assert_eq!(Encoding::Hex.to_string(), "hex");
    }

    #[test]
    fn default_renderer_is_local_publish() {
        let r = Renderer::default_publish();
        assert_eq!(r.hostname, "localhost");
        assert_eq!(r.port, 4503);
    }
}
