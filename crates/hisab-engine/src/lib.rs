//! hisab_engine - Cell evaluation engine for the Hisab calculator.

pub mod engine;
pub mod error;

pub use error::{EngineError, Result};
