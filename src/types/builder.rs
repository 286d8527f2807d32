use std::collections::BTreeMap;

use super::compiled::{CompiledFarm, CompiledFarmSet};
use super::error::Diagnostics;
use super::farm_set::{FarmParams, FarmSet};
use super::value::{Params, Value};

/// Builder for one farm's parameter set.
///
/// Produces the same loosely-typed [`Params`] a JSON document would, so
/// everything built here still goes through validation.
///
/// # Example
///
/// ```
/// use dispatcher_farms::FarmBuilder;
///
/// let farm = FarmBuilder::new("aem-site")
///     .docroot("/var/www/html")
///     .filter(|f| f.deny().glob("*"))
///     .filter(|f| f.allow().field("url", "/content*").rank(10))
///     .renderer(|r| r.field("hostname", "publish").field("port", 4503))
///     .compile()
///     .unwrap();
///
/// assert!(farm.text().contains("/1 { /type \"allow\" /url \"/content*\" }"));
/// ```
#[derive(Debug, Clone)]
pub struct FarmBuilder {
    name: String,
    params: Params,
}

/// Intermediate builder passed to rule and renderer closures.
#[derive(Debug, Clone, Default)]
pub struct EntryBuilder {
    fields: BTreeMap<String, Value>,
}

impl FarmBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Params::new(),
        }
    }

    #[must_use]
    pub fn docroot(self, path: impl Into<String>) -> Self {
        self.set("docroot", path.into())
    }

    #[must_use]
    pub fn priority(self, priority: i64) -> Self {
        self.set("priority", priority)
    }

    /// Set any option, replacing an earlier value.
    #[must_use]
    pub fn set(mut self, option: &str, value: impl Into<Value>) -> Self {
        self.params.insert(option.to_owned(), value.into());
        self
    }

    /// Append to a list option. A missing or non-list value starts a new list.
    #[must_use]
    pub fn push(mut self, option: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        match self.params.get_mut(option) {
            Some(Value::List(items)) => items.push(value),
            _ => {
                self.params.insert(option.to_owned(), Value::List(vec![value]));
            }
        }
        self
    }

    #[must_use]
    pub fn filter(self, f: impl FnOnce(EntryBuilder) -> EntryBuilder) -> Self {
        self.entry("filters", f)
    }

    #[must_use]
    pub fn allowed_client(self, f: impl FnOnce(EntryBuilder) -> EntryBuilder) -> Self {
        self.entry("allowed_clients", f)
    }

    #[must_use]
    pub fn cache_rule(self, f: impl FnOnce(EntryBuilder) -> EntryBuilder) -> Self {
        self.entry("cache_rules", f)
    }

    #[must_use]
    pub fn ignore_parameter(self, f: impl FnOnce(EntryBuilder) -> EntryBuilder) -> Self {
        self.entry("ignore_parameters", f)
    }

    #[must_use]
    pub fn invalidate(self, f: impl FnOnce(EntryBuilder) -> EntryBuilder) -> Self {
        self.entry("invalidate", f)
    }

    #[must_use]
    pub fn statistic(self, category: &str, glob: &str) -> Self {
        self.entry("statistics", |s| s.field("category", category).glob(glob))
    }

    #[must_use]
    pub fn renderer(self, f: impl FnOnce(EntryBuilder) -> EntryBuilder) -> Self {
        self.entry("renders", f)
    }

    fn entry(self, option: &str, f: impl FnOnce(EntryBuilder) -> EntryBuilder) -> Self {
        let entry = f(EntryBuilder::default());
        self.push(option, Value::Map(entry.fields))
    }

    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    #[must_use]
    pub fn build(self) -> FarmParams {
        FarmParams::new(self.name, self.params)
    }

    /// Validate and compile this farm on its own.
    ///
    /// # Errors
    ///
    /// Returns [`Diagnostics`] if validation fails.
    pub fn compile(self) -> Result<CompiledFarm, Diagnostics> {
        crate::compile::compile(&self.name, &self.params)
    }
}

impl EntryBuilder {
    #[must_use]
    pub fn allow(self) -> Self {
        self.field("type", "allow")
    }

    #[must_use]
    pub fn deny(self) -> Self {
        self.field("type", "deny")
    }

    #[must_use]
    pub fn glob(self, glob: &str) -> Self {
        self.field("glob", glob)
    }

    #[must_use]
    pub fn rank(self, rank: i64) -> Self {
        self.field("rank", rank)
    }

    #[must_use]
    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_owned(), value.into());
        self
    }
}

/// Builder for the module-level parameters.
#[derive(Debug, Clone)]
pub struct DispatcherBuilder {
    params: Params,
}

impl DispatcherBuilder {
    #[must_use]
    pub fn new(config_file: &str, log_file: &str, module_file: &str) -> Self {
        Self {
            params: Params::from([
                ("config_file".to_owned(), Value::from(config_file)),
                ("log_file".to_owned(), Value::from(log_file)),
                ("module_file".to_owned(), Value::from(module_file)),
            ]),
        }
    }

    #[must_use]
    pub fn set(mut self, option: &str, value: impl Into<Value>) -> Self {
        self.params.insert(option.to_owned(), value.into());
        self
    }

    #[must_use]
    pub fn log_level(self, level: impl Into<Value>) -> Self {
        self.set("log_level", level)
    }

    #[must_use]
    pub fn build(self) -> Params {
        self.params
    }
}

/// Builder for a whole [`FarmSet`].
#[derive(Debug, Clone)]
pub struct FarmSetBuilder {
    set: FarmSet,
}

impl FarmSetBuilder {
    #[must_use]
    pub fn new(dispatcher: DispatcherBuilder) -> Self {
        Self {
            set: FarmSet::new(dispatcher.build()),
        }
    }

    /// Declare a farm. Declaration order breaks priority ties.
    #[must_use]
    pub fn farm(mut self, name: &str, f: impl FnOnce(FarmBuilder) -> FarmBuilder) -> Self {
        self.set.farms.push(f(FarmBuilder::new(name)).build());
        self
    }

    #[must_use]
    pub fn build(self) -> FarmSet {
        self.set
    }

    /// # Errors
    ///
    /// Returns [`Diagnostics`] if any parameter set is invalid.
    pub fn compile(self) -> Result<CompiledFarmSet, Diagnostics> {
        self.set.compile()
    }
}
