use super::compiled::CompiledFarmSet;
use super::error::Diagnostics;
use super::value::Params;

/// Unvalidated parameters for one named farm.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FarmParams {
    pub name: String,
    pub params: Params,
}

impl FarmParams {
    #[must_use]
    pub fn new(name: impl Into<String>, params: Params) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

/// The full input of one compilation: the shared dispatcher parameters and
/// every farm, in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FarmSet {
    pub dispatcher: Params,
    pub farms: Vec<FarmParams>,
}

impl FarmSet {
    #[must_use]
    pub fn new(dispatcher: Params) -> Self {
        Self {
            dispatcher,
            farms: Vec::new(),
        }
    }

    #[must_use]
    pub fn farm(mut self, farm: FarmParams) -> Self {
        self.farms.push(farm);
        self
    }

    /// Validate and compile every farm. See [`compile_set`](crate::compile_set).
    ///
    /// # Errors
    ///
    /// Returns [`Diagnostics`] when any parameter set is invalid.
    pub fn compile(&self) -> Result<CompiledFarmSet, Diagnostics> {
        crate::compile::compile_set(self)
    }

    /// Read a set from JSON of the form
    /// `{ "dispatcher": { ... }, "farms": [{ "name": "...", ... }] }`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatcherError::Json`](crate::DispatcherError::Json) for
    /// malformed JSON and [`DispatcherError::Invalid`](crate::DispatcherError::Invalid)
    /// when the document does not have that shape.
    #[cfg(feature = "json")]
    pub fn from_json(input: &str) -> Result<Self, crate::DispatcherError> {
        let raw: json::RawSet = serde_json::from_str(input)?;
        Ok(raw.into_set()?)
    }

    /// Read a JSON file. See [`from_json`](Self::from_json).
    ///
    /// # Errors
    ///
    /// Returns [`DispatcherError`](crate::DispatcherError) on I/O, JSON, or
    /// shape failure.
    #[cfg(feature = "json")]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::DispatcherError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_json(&input)
    }
}

#[cfg(feature = "json")]
mod json {
    use serde::Deserialize;

    use super::{FarmParams, FarmSet};
    use crate::{Diagnostic, DiagnosticKind, Diagnostics, Params, Value};

    #[derive(Deserialize)]
    pub(super) struct RawSet {
        #[serde(default)]
        dispatcher: Params,
        #[serde(default)]
        farms: Vec<Params>,
    }

    impl RawSet {
        pub(super) fn into_set(self) -> Result<FarmSet, Diagnostics> {
            let mut errors = Diagnostics::new();
            let mut set = FarmSet::new(self.dispatcher);
            for (i, mut params) in self.farms.into_iter().enumerate() {
                match params.remove("name") {
                    Some(Value::String(name)) => set.farms.push(FarmParams::new(name, params)),
                    Some(other) => errors.push(Diagnostic::new(
                        format!("farms[{i}].name"),
                        DiagnosticKind::Shape,
                        format!("expected a string, found {}", other.kind_name()),
                    )),
                    None => errors.push(Diagnostic::new(
                        format!("farms[{i}].name"),
                        DiagnosticKind::RequiredFieldMissing,
                        "farm name is required",
                    )),
                }
            }
            errors.into_result(set)
        }
    }
}
