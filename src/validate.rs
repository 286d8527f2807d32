use std::collections::{BTreeMap, HashSet};

use crate::{
    Diagnostic, DiagnosticKind, Diagnostics, DispatcherConfig, Encoding, Farm, FarmSet, Level,
    LogLevel, Params, PassError, Renderer, RuleEntry, RuleKind, Scalar, SessionManagement,
    Spelling, Toggle, Value, VanityUrls,
};

const FARM_OPTIONS: &[&str] = &[
    "docroot",
    "priority",
    "allowed_clients",
    "filters",
    "cache_rules",
    "ignore_parameters",
    "invalidate",
    "statistics",
    "renders",
    "cache_headers",
    "client_headers",
    "virtualhosts",
    "sticky_connections",
    "allow_authorized",
    "cache_ttl",
    "failover",
    "propagate_synd_post",
    "serve_stale",
    "grace_period",
    "retries",
    "retry_delay",
    "unavailable_penalty",
    "stat_files_level",
    "stat_file",
    "health_check_url",
    "invalidate_handler",
    "session_management",
    "vanity_urls",
];

const DISPATCHER_OPTIONS: &[&str] = &[
    "config_file",
    "log_file",
    "log_level",
    "module_file",
    "decline_root",
    "pass_error",
    "use_processed_url",
    "no_server_header",
];

const RENDERER_FIELDS: &[&str] = &["hostname", "port", "timeout", "receiveTimeout", "ipv4"];
const SESSION_FIELDS: &[&str] = &["directory", "encode", "header", "timeout"];
const VANITY_FIELDS: &[&str] = &["file", "delay"];

/// Validate one farm's parameters and convert them into a typed [`Farm`].
///
/// Every failure is collected. Only a structural failure of a field stops
/// interpretation of that field; the remaining fields are still checked.
///
/// # Errors
///
/// Returns every [`Diagnostic`] found, qualified by field path.
pub fn farm(name: &str, params: &Params) -> Result<Farm, Diagnostics> {
    let mut c = Checker::default();
    c.farm_name("name", name);
    c.known_keys("", params.keys(), FARM_OPTIONS);

    let mut farm = Farm {
        name: name.to_owned(),
        ..Farm::default()
    };

    match params.get("docroot") {
        Some(v) => farm.docroot = c.absolute("docroot", v).unwrap_or_default(),
        None => c.fail(
            "docroot",
            DiagnosticKind::RequiredFieldMissing,
            "docroot is required",
        ),
    }
    farm.priority = c.opt(params, "priority", |c, p, v| {
        c.within(p, v, 0, 99).and_then(|n| u8::try_from(n).ok())
    });

    for kind in RuleKind::ALL {
        if let Some(v) = params.get(kind.option()) {
            *farm.rules_mut(kind) = c.rule_entries(kind, v);
        }
    }

    if let Some(v) = params.get("renders") {
        farm.renders = c
            .records("renders", v, true)
            .into_iter()
            .filter_map(|(path, map)| c.renderer(&path, map))
            .collect();
    }

    farm.cache_headers = c.opt(params, "cache_headers", Checker::string_list).unwrap_or_default();
    farm.client_headers = c.opt(params, "client_headers", Checker::string_list).unwrap_or_default();
    farm.virtualhosts = c.opt(params, "virtualhosts", Checker::string_list).unwrap_or_default();
    farm.sticky_connections = c
        .opt(params, "sticky_connections", Checker::string_list)
        .unwrap_or_default();

    farm.allow_authorized = c.opt(params, "allow_authorized", Checker::flag);
    farm.cache_ttl = c.opt(params, "cache_ttl", Checker::flag);
    farm.failover = c.opt(params, "failover", Checker::flag);
    farm.propagate_synd_post = c.opt(params, "propagate_synd_post", Checker::flag);
    farm.serve_stale = c.opt(params, "serve_stale", Checker::flag);

    farm.grace_period = c.opt(params, "grace_period", Checker::positive);
    farm.retries = c.opt(params, "retries", Checker::positive);
    farm.retry_delay = c.opt(params, "retry_delay", Checker::positive);
    farm.unavailable_penalty = c.opt(params, "unavailable_penalty", Checker::positive);
    farm.stat_files_level = c.opt(params, "stat_files_level", |c, p, v| c.at_least(p, v, 0));

    farm.stat_file = c.opt(params, "stat_file", Checker::absolute);
    farm.health_check_url = c.opt(params, "health_check_url", Checker::string);
    farm.invalidate_handler = c.opt(params, "invalidate_handler", Checker::absolute);

    if supplied(params, "invalidate") && supplied(params, "invalidate_handler") {
        c.fail(
            "invalidate",
            DiagnosticKind::MutualExclusion,
            "Both invalidate and invalidate_handler can not be set.",
        );
    }

    farm.session_management = c.opt(params, "session_management", Checker::session);
    if supplied(params, "session_management") && supplied(params, "allow_authorized") {
        c.fail(
            "session_management",
            DiagnosticKind::MutualExclusion,
            "Both session_management and allow_authorized can not be set.",
        );
    }

    farm.vanity_urls = c.opt(params, "vanity_urls", Checker::vanity);

    c.finish(farm).inspect_err(|d| {
        tracing::warn!(farm = name, errors = d.len(), "farm parameters rejected");
    })
}

/// Validate the module-level parameters shared by every farm.
///
/// `config_file`, `log_file` and `module_file` are required absolute paths;
/// everything else falls back to the defaults of [`DispatcherConfig::new`].
///
/// # Errors
///
/// Returns every [`Diagnostic`] found, qualified by field path.
pub fn dispatcher(params: &Params) -> Result<DispatcherConfig, Diagnostics> {
    let mut c = Checker::default();
    c.known_keys("", params.keys(), DISPATCHER_OPTIONS);

    let required = |c: &mut Checker, key: &str| match params.get(key) {
        Some(v) => c.absolute(key, v).unwrap_or_default(),
        None => {
            c.fail(
                key,
                DiagnosticKind::RequiredFieldMissing,
                format!("{key} is required"),
            );
            String::new()
        }
    };
    let config_file = required(&mut c, "config_file");
    let log_file = required(&mut c, "log_file");
    let module_file = required(&mut c, "module_file");

    let mut config = DispatcherConfig::new(config_file, log_file, module_file);
    if let Some(level) = c.opt(params, "log_level", Checker::log_level) {
        config.log_level = level;
    }
    if let Some(t) = c.opt(params, "decline_root", Checker::switch) {
        config.decline_root = t;
    }
    if let Some(p) = c.opt(params, "pass_error", Checker::pass_error) {
        config.pass_error = p;
    }
    if let Some(t) = c.opt(params, "use_processed_url", Checker::switch) {
        config.use_processed_url = t;
    }
    if let Some(t) = c.opt(params, "no_server_header", Checker::switch) {
        config.no_server_header = t;
    }

    c.finish(config).inspect_err(|d| {
        tracing::warn!(errors = d.len(), "dispatcher parameters rejected");
    })
}

/// Validate a whole set: the dispatcher parameters, every farm, and the
/// uniqueness of farm names. Farm diagnostics are prefixed `farms[<i>].`,
/// dispatcher ones `dispatcher.`.
pub(crate) fn farm_set(set: &FarmSet) -> Result<(DispatcherConfig, Vec<Farm>), Diagnostics> {
    let mut all = Diagnostics::new();

    let config = dispatcher(&set.dispatcher)
        .map_err(|d| all.extend(prefixed("dispatcher", d)))
        .ok();

    let mut seen = HashSet::new();
    let mut farms = Vec::with_capacity(set.farms.len());
    for (i, entry) in set.farms.iter().enumerate() {
        if !seen.insert(entry.name.as_str()) {
            all.push(Diagnostic::new(
                format!("farms[{i}].name"),
                DiagnosticKind::Domain,
                format!("farm '{}' is declared more than once", entry.name),
            ));
        }
        match farm(&entry.name, &entry.params) {
            Ok(f) => farms.push(f),
            Err(d) => all.extend(prefixed(&format!("farms[{i}]"), d)),
        }
    }

    match config {
        Some(config) if all.is_empty() => Ok((config, farms)),
        _ => Err(all),
    }
}

fn prefixed(prefix: &str, diagnostics: Diagnostics) -> Diagnostics {
    let mut out = Diagnostics::new();
    for mut d in diagnostics {
        d.path = format!("{prefix}.{}", d.path);
        out.push(d);
    }
    out
}

/// A key counts as supplied unless it is missing or null.
fn supplied(params: &Params, key: &str) -> bool {
    !matches!(params.get(key), None | Some(Value::Null))
}

fn is_status_codes(text: &str) -> bool {
    let code = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    text.split(',').all(|part| match part.split_once('-') {
        Some((from, to)) => code(from) && code(to),
        None => code(part),
    })
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}.{key}")
    }
}

#[derive(Default)]
struct Checker {
    diagnostics: Diagnostics,
}

impl Checker {
    fn fail(&mut self, path: impl Into<String>, kind: DiagnosticKind, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::new(path, kind, message));
    }

    fn expected(&mut self, path: &str, what: &str, found: &Value) {
        self.fail(
            path,
            DiagnosticKind::Shape,
            format!("expected {what}, found {}", found.kind_name()),
        );
    }

    fn finish<T>(self, value: T) -> Result<T, Diagnostics> {
        self.diagnostics.into_result(value)
    }

    /// Run `check` on an optional parameter. A missing or null value is
    /// treated as not supplied.
    fn opt<T>(
        &mut self,
        params: &Params,
        key: &str,
        check: impl FnOnce(&mut Self, &str, &Value) -> Option<T>,
    ) -> Option<T> {
        match params.get(key) {
            None | Some(Value::Null) => None,
            Some(v) => check(self, key, v),
        }
    }

    fn known_keys<'k>(
        &mut self,
        prefix: &str,
        keys: impl Iterator<Item = &'k String>,
        allowed: &[&str],
    ) {
        for key in keys {
            if !allowed.contains(&key.as_str()) {
                self.fail(
                    join(prefix, key),
                    DiagnosticKind::UnknownField,
                    format!("'{key}' is not a recognised option"),
                );
            }
        }
    }

    fn farm_name(&mut self, path: &str, name: &str) {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
        if !valid {
            self.fail(
                path,
                DiagnosticKind::Domain,
                format!("'{name}' is not a valid farm name"),
            );
        }
    }

    fn string(&mut self, path: &str, v: &Value) -> Option<String> {
        let s = v.as_str().map(str::to_owned);
        if s.is_none() {
            self.expected(path, "a string", v);
        }
        s
    }

    fn absolute(&mut self, path: &str, v: &Value) -> Option<String> {
        let s = self.string(path, v)?;
        if s.starts_with('/') {
            Some(s)
        } else {
            self.fail(
                path,
                DiagnosticKind::Domain,
                format!("'{s}' is not an absolute path"),
            );
            None
        }
    }

    fn integer(&mut self, path: &str, v: &Value) -> Option<i64> {
        let i = v.as_int();
        if i.is_none() {
            self.expected(path, "an integer", v);
        }
        i
    }

    fn at_least(&mut self, path: &str, v: &Value, min: i64) -> Option<i64> {
        let n = self.integer(path, v)?;
        if n >= min {
            Some(n)
        } else {
            self.fail(
                path,
                DiagnosticKind::Domain,
                format!("{n} must be greater or equal to {min}"),
            );
            None
        }
    }

    fn positive(&mut self, path: &str, v: &Value) -> Option<i64> {
        self.at_least(path, v, 1)
    }

    fn within(&mut self, path: &str, v: &Value, min: i64, max: i64) -> Option<i64> {
        let n = self.integer(path, v)?;
        if (min..=max).contains(&n) {
            Some(n)
        } else {
            self.fail(
                path,
                DiagnosticKind::Domain,
                format!("{n} must be between {min} and {max}"),
            );
            None
        }
    }

    fn toggle(&mut self, path: &str, v: &Value, aliases: bool) -> Option<Toggle> {
        let parsed = match v {
            Value::Bool(b) => Some(Toggle::numeric(*b)),
            Value::Int(0) => Some(Toggle::numeric(false)),
            Value::Int(1) => Some(Toggle::numeric(true)),
            Value::String(s) => match s.as_str() {
                "0" => Some(Toggle::numeric(false)),
                "1" => Some(Toggle::numeric(true)),
                "off" if aliases => Some(Toggle::named(false)),
                "on" if aliases => Some(Toggle::named(true)),
                _ => None,
            },
            Value::Int(_) => None,
            other => {
                self.expected(path, "0 or 1", other);
                return None;
            }
        };
        if parsed.is_none() {
            let allowed = if aliases { "0, 1, on or off" } else { "0 or 1" };
            self.fail(
                path,
                DiagnosticKind::Domain,
                format!("{v} is not one of {allowed}"),
            );
        }
        parsed
    }

    fn flag(&mut self, path: &str, v: &Value) -> Option<Toggle> {
        self.toggle(path, v, false)
    }

    fn switch(&mut self, path: &str, v: &Value) -> Option<Toggle> {
        self.toggle(path, v, true)
    }

    fn log_level(&mut self, path: &str, v: &Value) -> Option<Level> {
        let parsed = match v {
            Value::Int(n) => LogLevel::from_number(*n).map(|level| Level {
                level,
                spelling: Spelling::Numeric,
            }),
            Value::String(s) => match s.parse::<i64>() {
                Ok(n) => LogLevel::from_number(n).map(|level| Level {
                    level,
                    spelling: Spelling::Numeric,
                }),
                Err(_) => LogLevel::from_name(s).map(|level| Level {
                    level,
                    spelling: Spelling::Named,
                }),
            },
            other => {
                self.expected(path, "a log level", other);
                return None;
            }
        };
        if parsed.is_none() {
            self.fail(
                path,
                DiagnosticKind::Domain,
                format!(
                    "{v} is not a log level (0-4 or {})",
                    LogLevel::NAMES.join(", ")
                ),
            );
        }
        parsed
    }

    fn pass_error(&mut self, path: &str, v: &Value) -> Option<PassError> {
        match v {
            Value::String(s) if s != "0" && s != "1" => {
                if is_status_codes(s) {
                    Some(PassError::Codes(s.clone()))
                } else {
                    self.fail(
                        path,
                        DiagnosticKind::Domain,
                        format!("'{s}' is not 0, 1 or a list of status codes"),
                    );
                    None
                }
            }
            other => self.flag(path, other).map(PassError::Toggle),
        }
    }

    fn string_list(&mut self, path: &str, v: &Value) -> Option<Vec<String>> {
        let Value::List(items) = v else {
            self.expected(path, "an array of strings", v);
            return None;
        };
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            if let Some(s) = self.string(&format!("{path}[{i}]"), item) {
                out.push(s);
            }
        }
        Some(out)
    }

    /// Elements of an array-of-records option, with their paths. A bare
    /// record is accepted only when `single` is set.
    fn records<'v>(
        &mut self,
        path: &str,
        v: &'v Value,
        single: bool,
    ) -> Vec<(String, &'v BTreeMap<String, Value>)> {
        match v {
            Value::List(items) => items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| {
                    let item_path = format!("{path}[{i}]");
                    match item {
                        Value::Map(map) => Some((item_path, map)),
                        other => {
                            self.expected(&item_path, "a record", other);
                            None
                        }
                    }
                })
                .collect(),
            Value::Map(map) if single => vec![(format!("{path}[0]"), map)],
            other => {
                self.expected(path, "an array of records", other);
                Vec::new()
            }
        }
    }

    fn rule_value(&mut self, path: &str, v: &Value) -> Option<Scalar> {
        match v {
            Value::String(s) => Some(Scalar::Text(s.clone())),
            Value::Int(i) => Some(Scalar::Int(*i)),
            Value::Bool(b) => Some(Scalar::Toggle(Toggle::numeric(*b))),
            other => {
                self.expected(path, "a string or integer", other);
                None
            }
        }
    }

    fn rule_entries(&mut self, kind: RuleKind, v: &Value) -> Vec<RuleEntry> {
        let mut entries = Vec::new();
        for (path, map) in self.records(kind.option(), v, false) {
            let mut entry = RuleEntry::new(kind);
            for (key, value) in map {
                let field_path = format!("{path}.{key}");
                if key == "rank" {
                    entry.rank = self.integer(&field_path, value);
                } else if !kind.allows(key) {
                    self.fail(
                        field_path,
                        DiagnosticKind::UnknownField,
                        format!("'{key}' is not defined for {}", kind.section()),
                    );
                } else if let Some(scalar) = self.rule_value(&field_path, value) {
                    entry.fields.push((key.clone(), scalar));
                }
            }
            for field in kind.required() {
                if !map.contains_key(*field) {
                    self.fail(
                        format!("{path}.{field}"),
                        DiagnosticKind::RequiredFieldMissing,
                        format!("'{field}' is required"),
                    );
                }
            }
            if let Some(verdict) = entry.get("type") {
                let text = verdict.as_text();
                if text != "allow" && text != "deny" {
                    self.fail(
                        format!("{path}.type"),
                        DiagnosticKind::Domain,
                        format!("'{text}' is not one of allow or deny"),
                    );
                }
            }
            entries.push(entry);
        }
        entries
    }

    fn port(&mut self, path: &str, v: &Value) -> Option<u16> {
        let n = match v {
            Value::Int(n) => *n,
            Value::String(s) => match s.parse::<i64>() {
                Ok(n) => n,
                Err(_) => {
                    self.fail(
                        path,
                        DiagnosticKind::Domain,
                        format!("'{s}' is not a port number"),
                    );
                    return None;
                }
            },
            other => {
                self.expected(path, "a port number", other);
                return None;
            }
        };
        match u16::try_from(n) {
            Ok(port) if port > 0 => Some(port),
            _ => {
                self.fail(
                    path,
                    DiagnosticKind::Domain,
                    format!("{n} must be between 1 and 65535"),
                );
                None
            }
        }
    }

    fn renderer(&mut self, path: &str, map: &BTreeMap<String, Value>) -> Option<Renderer> {
        self.known_keys(path, map.keys(), RENDERER_FIELDS);
        let hostname = self.required(path, map, "hostname", Self::string);
        let port = self.required(path, map, "port", Self::port);
        let timeout = self.sub(path, map, "timeout", |c, p, v| c.at_least(p, v, 0));
        let receive_timeout = self.sub(path, map, "receiveTimeout", |c, p, v| c.at_least(p, v, 0));
        let ipv4 = self.sub(path, map, "ipv4", Self::flag);
        Some(Renderer {
            hostname: hostname?,
            port: port?,
            timeout,
            receive_timeout,
            ipv4,
        })
    }

    fn session(&mut self, path: &str, v: &Value) -> Option<SessionManagement> {
        let Value::Map(map) = v else {
            self.expected(path, "a record", v);
            return None;
        };
        self.known_keys(path, map.keys(), SESSION_FIELDS);
        let directory = self.required(path, map, "directory", Self::absolute);
        let encode = self.sub(path, map, "encode", |c, p, v| {
            let name = c.string(p, v)?;
            let encoding = Encoding::from_name(&name);
            if encoding.is_none() {
                c.fail(
                    p,
                    DiagnosticKind::Domain,
                    format!("'{name}' is not one of {}", Encoding::NAMES.join(", ")),
                );
            }
            encoding
        });
        let header = self.sub(path, map, "header", Self::string);
        let timeout = self.sub(path, map, "timeout", |c, p, v| c.at_least(p, v, 0));
        Some(SessionManagement {
            directory: directory?,
            encode,
            header,
            timeout,
        })
    }

    fn vanity(&mut self, path: &str, v: &Value) -> Option<VanityUrls> {
        let Value::Map(map) = v else {
            self.expected(path, "a record", v);
            return None;
        };
        self.known_keys(path, map.keys(), VANITY_FIELDS);
        let file = self.required(path, map, "file", Self::absolute);
        let delay = self.sub(path, map, "delay", |c, p, v| c.at_least(p, v, 0));
        Some(VanityUrls { file: file?, delay })
    }

    fn sub<T>(
        &mut self,
        prefix: &str,
        map: &BTreeMap<String, Value>,
        key: &str,
        check: impl FnOnce(&mut Self, &str, &Value) -> Option<T>,
    ) -> Option<T> {
        map.get(key).and_then(|v| check(self, &join(prefix, key), v))
    }

    fn required<T>(
        &mut self,
        prefix: &str,
        map: &BTreeMap<String, Value>,
        key: &str,
        check: impl FnOnce(&mut Self, &str, &Value) -> Option<T>,
    ) -> Option<T> {
        if !map.contains_key(key) {
            self.fail(
                join(prefix, key),
                DiagnosticKind::RequiredFieldMissing,
                format!("'{key}' is required"),
            );
            return None;
        }
        self.sub(prefix, map, key, check)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Params {
        Params::from([("docroot".to_owned(), Value::from("/var/www"))])
    }

    fn with(key: &str, value: impl Into<Value>) -> Params {
        let mut p = base();
        p.insert(key.to_owned(), value.into());
        p
    }

    fn kind_at(params: &Params, path: &str) -> DiagnosticKind {
        let err = farm("site", params).unwrap_err();
        err.at(path)
            .unwrap_or_else(|| panic!("no diagnostic at {path}: {err}"))
            .kind
    }

    #[test]
    fn minimal_farm_is_valid() {
        let f = farm("site", &base()).unwrap();
        assert_eq!(f.docroot, "/var/www");
        assert!(f.filters.is_empty());
        assert_eq!(f.priority, None);
    }

    #[test]
    fn docroot_required_and_absolute() {
        assert_eq!(
            kind_at(&Params::new(), "docroot"),
            DiagnosticKind::RequiredFieldMissing
        );
        assert_eq!(
            kind_at(&with("docroot", "relative/path"), "docroot"),
            DiagnosticKind::Domain
        );
        assert_eq!(kind_at(&with("docroot", 3), "docroot"), DiagnosticKind::Shape);
    }

    #[test]
    fn list_options_need_arrays_of_records() {
        let single = with("filters", Value::record([("type", "allow")]));
        assert_eq!(kind_at(&single, "filters"), DiagnosticKind::Shape);
        assert_eq!(kind_at(&with("cache_rules", "x"), "cache_rules"), DiagnosticKind::Shape);
        assert_eq!(
            kind_at(&with("allowed_clients", Value::Null), "allowed_clients"),
            DiagnosticKind::Shape
        );
        let mixed = with(
            "invalidate",
            Value::List(vec![Value::record([("type", "allow")]), Value::from("x")]),
        );
        assert_eq!(kind_at(&mixed, "invalidate[1]"), DiagnosticKind::Shape);
    }

    #[test]
    fn entry_checks() {
        let params = with(
            "filters",
            Value::List(vec![
                Value::record([("type", "allow"), ("glob", "*")]),
                Value::record([("type", "maybe")]),
                Value::record([("glob", "*")]),
                Value::record([("type", "deny"), ("color", "red")]),
            ]),
        );
        let err = farm("site", &params).unwrap_err();
        assert_eq!(err.at("filters[1].type").unwrap().kind, DiagnosticKind::Domain);
        assert_eq!(
            err.at("filters[2].type").unwrap().kind,
            DiagnosticKind::RequiredFieldMissing
        );
        assert_eq!(
            err.at("filters[3].color").unwrap().kind,
            DiagnosticKind::UnknownField
        );
        assert!(err.at("filters[0].type").is_none());
    }

    #[test]
    fn rank_must_be_integer() {
        let params = with(
            "cache_rules",
            vec![Value::record([
                ("rank", Value::from("1")),
                ("type", Value::from("allow")),
            ])],
        );
        assert_eq!(kind_at(&params, "cache_rules[0].rank"), DiagnosticKind::Shape);
    }

    #[test]
    fn statistics_require_category_and_glob() {
        let params = with("statistics", vec![Value::record([("glob", "*")])]);
        assert_eq!(
            kind_at(&params, "statistics[0].category"),
            DiagnosticKind::RequiredFieldMissing
        );
    }

    #[test]
    fn invalidate_and_handler_exclude_each_other() {
        let mut params = with("invalidate", Value::List(vec![]));
        params.insert("invalidate_handler".into(), Value::from("/path/to/script"));
        assert_eq!(kind_at(&params, "invalidate"), DiagnosticKind::MutualExclusion);
        let err = farm("site", &params).unwrap_err();
        assert_eq!(
            err.at("invalidate").unwrap().message,
            "Both invalidate and invalidate_handler can not be set."
        );
    }

    #[test]
    fn null_handler_does_not_conflict() {
        let mut params = with(
            "invalidate",
            Value::List(vec![Value::record([("type", "allow"), ("glob", "*.html")])]),
        );
        params.insert("invalidate_handler".into(), Value::Null);
        let f = farm("site", &params).unwrap();
        assert_eq!(f.invalidate.len(), 1);
        assert_eq!(f.invalidate_handler, None);
    }

    #[test]
    fn invalidate_handler_must_be_absolute() {
        assert_eq!(
            kind_at(&with("invalidate_handler", "script.sh"), "invalidate_handler"),
            DiagnosticKind::Domain
        );
    }

    #[test]
    fn session_management_checks() {
        let bad = with(
            "session_management",
            Value::record([
                ("directory", Value::from("relative")),
                ("encode", Value::from("sha1")),
                ("timeout", Value::from(-1)),
            ]),
        );
        let err = farm("site", &bad).unwrap_err();
        assert_eq!(
            err.at("session_management.directory").unwrap().kind,
            DiagnosticKind::Domain
        );
        assert_eq!(
            err.at("session_management.encode").unwrap().kind,
            DiagnosticKind::Domain
        );
        assert_eq!(
            err.at("session_management.timeout").unwrap().kind,
            DiagnosticKind::Domain
        );

        let missing = with("session_management", Value::record([("encode", "md5")]));
        assert_eq!(
            kind_at(&missing, "session_management.directory"),
            DiagnosticKind::RequiredFieldMissing
        );
        assert_eq!(
            kind_at(&with("session_management", "x"), "session_management"),
            DiagnosticKind::Shape
        );
    }

    #[test]
    fn session_management_excludes_allow_authorized() {
        let mut params = with(
            "session_management",
            Value::record([("directory", "/cache")]),
        );
        params.insert("allow_authorized".into(), Value::from(1));
        assert_eq!(
            kind_at(&params, "session_management"),
            DiagnosticKind::MutualExclusion
        );
    }

    #[test]
    fn null_session_does_not_conflict() {
        let mut params = with("session_management", Value::Null);
        params.insert("allow_authorized".into(), Value::from(1));
        let f = farm("site", &params).unwrap();
        assert!(f.session_management.is_none());
        assert!(f.allow_authorized.is_some());

        let mut params = with(
            "session_management",
            Value::record([("directory", "/cache")]),
        );
        params.insert("allow_authorized".into(), Value::Null);
        assert!(farm("site", &params).is_ok());
    }

    #[test]
    fn vanity_urls_checks() {
        let missing = with("vanity_urls", Value::record([("not_file", "a value")]));
        let err = farm("site", &missing).unwrap_err();
        assert_eq!(
            err.at("vanity_urls.file").unwrap().kind,
            DiagnosticKind::RequiredFieldMissing
        );
        assert_eq!(
            err.at("vanity_urls.not_file").unwrap().kind,
            DiagnosticKind::UnknownField
        );
        let negative = with(
            "vanity_urls",
            Value::record([("file", Value::from("/path")), ("delay", Value::from(-1))]),
        );
        let err = farm("site", &negative).unwrap_err();
        assert!(err.at("vanity_urls.delay").unwrap().message.contains("greater or equal"));
    }

    #[test]
    fn renderer_checks() {
        let params = with(
            "renders",
            vec![
                Value::record([("hostname", Value::from("a")), ("port", Value::from("8080"))]),
                Value::record([("hostname", Value::from("b")), ("port", Value::from(0))]),
                Value::record([("port", Value::from(80))]),
                Value::record([
                    ("hostname", Value::from("c")),
                    ("port", Value::from(80)),
                    ("ipv4", Value::from(2)),
                ]),
            ],
        );
        let err = farm("site", &params).unwrap_err();
        assert!(err.at("renders[0].port").is_none());
        assert_eq!(err.at("renders[1].port").unwrap().kind, DiagnosticKind::Domain);
        assert_eq!(
            err.at("renders[2].hostname").unwrap().kind,
            DiagnosticKind::RequiredFieldMissing
        );
        assert_eq!(err.at("renders[3].ipv4").unwrap().kind, DiagnosticKind::Domain);
    }

    #[test]
    fn single_renderer_record_is_accepted() {
        let params = with(
            "renders",
            Value::record([("hostname", Value::from("publish")), ("port", Value::from(4503))]),
        );
        let f = farm("site", &params).unwrap();
        assert_eq!(f.renders.len(), 1);
        assert_eq!(f.renders[0].port, 4503);
    }

    #[test]
    fn toggles() {
        for ok in [Value::from(0), Value::from(1), Value::from("1"), Value::from(true)] {
            assert!(farm("site", &with("cache_ttl", ok)).is_ok());
        }
        assert_eq!(kind_at(&with("failover", 2), "failover"), DiagnosticKind::Domain);
        assert_eq!(kind_at(&with("failover", -1), "failover"), DiagnosticKind::Domain);
        assert_eq!(kind_at(&with("serve_stale", "on"), "serve_stale"), DiagnosticKind::Domain);
    }

    #[test]
    fn priority_bounds() {
        assert_eq!(farm("site", &with("priority", 99)).unwrap().priority, Some(99));
        assert_eq!(farm("site", &with("priority", 0)).unwrap().priority, Some(0));
        assert_eq!(kind_at(&with("priority", 100), "priority"), DiagnosticKind::Domain);
        assert_eq!(kind_at(&with("priority", -1), "priority"), DiagnosticKind::Domain);
        assert_eq!(kind_at(&with("priority", "1"), "priority"), DiagnosticKind::Shape);
    }

    #[test]
    fn strictly_positive_numbers() {
        for key in ["grace_period", "retries", "retry_delay", "unavailable_penalty"] {
            assert_eq!(kind_at(&with(key, 0), key), DiagnosticKind::Domain);
            assert!(farm("site", &with(key, 1)).is_ok());
        }
        assert!(farm("site", &with("stat_files_level", 0)).is_ok());
    }

    #[test]
    fn string_lists() {
        assert_eq!(
            kind_at(&with("cache_headers", "A-Header"), "cache_headers"),
            DiagnosticKind::Shape
        );
        let params = with(
            "sticky_connections",
            Value::List(vec![Value::record([("not", "string")])]),
        );
        assert_eq!(kind_at(&params, "sticky_connections[0]"), DiagnosticKind::Shape);
    }

    #[test]
    fn unknown_option_and_bad_name() {
        assert_eq!(kind_at(&with("colour", "red"), "colour"), DiagnosticKind::UnknownField);
        let err = farm("bad name", &base()).unwrap_err();
        assert_eq!(err.at("name").unwrap().kind, DiagnosticKind::Domain);
    }

    #[test]
    fn failures_are_collected() {
        let mut params = with("docroot", "relative");
        params.insert("retries".into(), Value::from(0));
        params.insert("filters".into(), Value::from("x"));
        assert_eq!(farm("site", &params).unwrap_err().len(), 3);
    }

    fn dispatcher_base() -> Params {
        Params::from([
            ("config_file".to_owned(), Value::from("/etc/httpd/dispatcher.farms.any")),
            ("log_file".to_owned(), Value::from("/var/log/httpd/dispatcher.log")),
            ("module_file".to_owned(), Value::from("/etc/httpd/modules/mod_dispatcher.so")),
        ])
    }

    #[test]
    fn dispatcher_defaults() {
        let cfg = dispatcher(&dispatcher_base()).unwrap();
        assert_eq!(cfg.log_level.level, LogLevel::Warn);
        assert_eq!(cfg.decline_root.as_str(), "off");
        assert_eq!(cfg.pass_error.as_str(), "0");
    }

    #[test]
    fn dispatcher_requires_paths() {
        let err = dispatcher(&Params::new()).unwrap_err();
        for key in ["config_file", "log_file", "module_file"] {
            assert_eq!(err.at(key).unwrap().kind, DiagnosticKind::RequiredFieldMissing);
        }
    }

    #[test]
    fn dispatcher_switches_keep_spelling() {
        let mut p = dispatcher_base();
        p.insert("decline_root".into(), Value::from("on"));
        p.insert("use_processed_url".into(), Value::from(1));
        p.insert("log_level".into(), Value::from(3));
        let cfg = dispatcher(&p).unwrap();
        assert_eq!(cfg.decline_root.as_str(), "on");
        assert_eq!(cfg.use_processed_url.as_str(), "1");
        assert_eq!(cfg.log_level.spelling, Spelling::Numeric);
    }

    #[test]
    fn dispatcher_domains() {
        for (key, value) in [
            ("decline_root", Value::from(2)),
            ("decline_root", Value::from("invalid")),
            ("log_level", Value::from(5)),
            ("log_level", Value::from(-1)),
            ("log_level", Value::from("invalid")),
            ("pass_error", Value::from("40x")),
        ] {
            let mut p = dispatcher_base();
            p.insert(key.into(), value);
            let err = dispatcher(&p).unwrap_err();
            assert_eq!(err.at(key).unwrap().kind, DiagnosticKind::Domain, "{key}");
        }
    }

    #[test]
    fn pass_error_codes() {
        let mut p = dispatcher_base();
        p.insert("pass_error".into(), Value::from("400-404,500"));
        assert_eq!(
            dispatcher(&p).unwrap().pass_error,
            PassError::Codes("400-404,500".into())
        );
        assert!(is_status_codes("500"));
        assert!(!is_status_codes("400-"));
        assert!(!is_status_codes(""));
    }
}
