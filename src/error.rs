//! Failure results of extraction and rendering.

use thiserror::Error;

/// The two ways a module can fail to produce documentation.
///
/// Everything else (missing tags, missing defaults, odd comment text) is
/// absorbed by the extractor's backfill rules and never surfaces here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocError {
    /// The module text could not be resolved to function declarations.
    #[error("Failed to parse {path}: {message}")]
    ExtractionUnavailable { path: String, message: String },

    /// The renderer was handed zero functions.
    #[error("No functions found")]
    NoContent,
}

pub type Result<T> = std::result::Result<T, DocError>;
