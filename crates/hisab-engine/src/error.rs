//! Error types for the Hisab engine.

use thiserror::Error;

/// Errors raised by formula parsing and aggregate operations.
///
/// Division by zero and writes past the last grid column are not errors;
/// they are resolved silently by the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid operation format '{input}'. Use format like: C*D, A+B, etc.")]
    Format { input: String },

    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(char),

    #[error("Invalid value for operation: {0}")]
    InvalidOperand(String),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Invalid cell reference: {0}")]
    InvalidCellRef(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
