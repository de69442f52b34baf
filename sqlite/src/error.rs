//! Compiler error taxonomy (see spec §7).

use ronin_compiler_core::CoreError;
use thiserror::Error;

/// Stable, machine-readable error codes, surfaced alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ModelNotFound,
    FieldNotFound,
    PresetNotFound,
    InvalidQuery,
    InvalidInstruction,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::ModelNotFound => "MODEL_NOT_FOUND",
            ErrorCode::FieldNotFound => "FIELD_NOT_FOUND",
            ErrorCode::PresetNotFound => "PRESET_NOT_FOUND",
            ErrorCode::InvalidQuery => "INVALID_QUERY",
            ErrorCode::InvalidInstruction => "INVALID_INSTRUCTION",
        }
    }
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("model `{0}` does not exist in the catalog")]
    ModelNotFound(String),

    #[error("field `{path}` could not be resolved while compiling `{instruction}`")]
    FieldNotFound { path: String, instruction: String },

    #[error("preset `{preset}` is not defined on model `{model}`")]
    PresetNotFound { preset: String, model: String },

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("invalid `{instruction}` instruction: {reason}")]
    InvalidInstruction { instruction: String, reason: String },

    #[error(transparent)]
    Value(#[from] CoreError),
}

impl CompileError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CompileError::ModelNotFound(_) => ErrorCode::ModelNotFound,
            CompileError::FieldNotFound { .. } => ErrorCode::FieldNotFound,
            CompileError::PresetNotFound { .. } => ErrorCode::PresetNotFound,
            CompileError::InvalidQuery(_) => ErrorCode::InvalidQuery,
            CompileError::InvalidInstruction { .. } => ErrorCode::InvalidInstruction,
            CompileError::Value(_) => ErrorCode::InvalidInstruction,
        }
    }
}

pub type Result<T> = core::result::Result<T, CompileError>;
