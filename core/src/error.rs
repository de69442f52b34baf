//! Error types for `ronin-compiler-core`.

use thiserror::Error;

/// Errors that can occur while encoding a value or assembling raw SQL text.
///
/// Model/field/instruction-level errors (the ones a caller actually sees most
/// often) live in the dialect crate, since they need catalog context this
/// crate doesn't have.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A value could not be encoded as a bindable SQL parameter.
    #[error("cannot encode value as a SQL parameter: {0}")]
    Unencodable(String),

    /// JSON serialization of a nested object/array value failed.
    #[error("failed to encode value as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, CoreError>;
