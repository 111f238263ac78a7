//! Error types for parameter editing, field generation, and presets.

use std::path::PathBuf;

use crate::config::ParamField;

/// A parameter value that violates its legal range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    /// Value lies outside the legal range of the field.
    #[error("{field} = {value} is out of range (expected {expected})")]
    OutOfRange {
        field: ParamField,
        value: f64,
        expected: &'static str,
    },
    /// Value is NaN or infinite.
    #[error("{field} must be finite")]
    NotFinite { field: ParamField },
    /// Value of the wrong kind for the field (e.g. a color for `count`).
    #[error("wrong value kind for {field}")]
    WrongKind { field: ParamField },
    /// Color string that is not `#rrggbb`.
    #[error("invalid color {0:?} (expected #rrggbb)")]
    BadColor(String),
}

/// Errors surfaced by the generator and the lifecycle controller.
#[derive(Debug, thiserror::Error)]
pub enum GalaxyError {
    /// Parameters were rejected before any allocation.
    #[error("invalid parameters: {0}")]
    InvalidParams(#[from] ParamError),
    /// The particle buffers could not be allocated.
    #[error("cannot allocate buffers for {count} particles ({bytes} bytes)")]
    ResourceExhausted { count: u32, bytes: usize },
    /// A regeneration was requested while another one was still in flight.
    #[error("a regeneration is already in progress")]
    Busy,
}

/// Errors from saving or loading parameter presets.
#[derive(Debug, thiserror::Error)]
pub enum PresetError {
    #[error("preset i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed preset json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("preset holds invalid parameters: {0}")]
    Invalid(#[from] ParamError),
}
