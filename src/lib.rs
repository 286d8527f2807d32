mod compile;
mod error;
pub mod parse;
mod render;
mod sort;
mod types;
pub mod validate;

pub use compile::{compile, compile_farm, compile_set};
pub use error::DispatcherError;
pub use parse::{ParseError, parse};
pub use render::{render_block, render_section, render_statistics};
pub use sort::{Rank, Ranked, order};
pub use types::{
    CompiledFarm, CompiledFarmSet, Diagnostic, DiagnosticKind, Diagnostics, DispatcherBuilder,
    DispatcherConfig, Document, Encoding, EntryBuilder, FARM_INCLUDE_GLOB, Farm, FarmBuilder,
    FarmParams, FarmSet, FarmSetBuilder, Level, LogLevel, Node, Params, PassError, RenderError,
    Renderer, RuleEntry, RuleKind, Scalar, SessionManagement, Spelling, Toggle,
    VANITY_URL_ENDPOINT, Value, VanityUrls, render,
};
