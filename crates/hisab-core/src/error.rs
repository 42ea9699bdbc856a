//! Error types for Hisab core.

use hisab_engine::EngineError;
use thiserror::Error;

/// Errors that can occur while working with a Hisab document
#[derive(Error, Debug)]
pub enum HisabError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("{what} {index} is outside the grid (limit {limit})")]
    OutOfBounds {
        what: &'static str,
        index: String,
        limit: String,
    },

    #[error("No values to share")]
    NothingToShare,

    #[error("No file path set")]
    NoFilePath,
}

pub type Result<T> = std::result::Result<T, HisabError>;
