mod builder;
mod compiled;
mod dispatcher;
mod document;
mod error;
mod farm;
mod farm_set;
mod rule;
mod scalar;
mod value;

pub use builder::{DispatcherBuilder, EntryBuilder, FarmBuilder, FarmSetBuilder};
pub use compiled::{CompiledFarm, CompiledFarmSet, FARM_INCLUDE_GLOB};
pub use dispatcher::{DispatcherConfig, PassError};
pub use document::{Document, Node};
pub use error::{Diagnostic, DiagnosticKind, Diagnostics, RenderError};
pub use farm::{Encoding, Farm, Renderer, SessionManagement, VANITY_URL_ENDPOINT, VanityUrls};
pub use farm_set::{FarmParams, FarmSet};
pub use rule::{RuleEntry, RuleKind};
pub use scalar::{Level, LogLevel, Scalar, Spelling, Toggle, render};
pub use value::{Params, Value};
