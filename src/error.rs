use thiserror::Error;

use crate::parse::ParseError;
use crate::{Diagnostics, RenderError};

/// Unified error type covering validation, rendering, parsing, and I/O.
///
/// Returned by the loaders at the crate edge, such as
/// [`FarmSet::from_file()`](crate::FarmSet::from_file) and
/// [`Document::from_file()`](crate::Document::from_file).
#[derive(Debug, Error)]
pub enum DispatcherError {
    #[error(transparent)]
    Invalid(#[from] Diagnostics),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "json")]
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
