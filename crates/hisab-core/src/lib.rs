//! hisab-core - UI-agnostic document model, CSV storage and share bundles.

pub mod document;
pub mod error;
pub mod share;
pub mod storage;

pub use document::Document;
pub use error::{HisabError, Result};
pub use share::{ShareBundle, create_bundle};

pub use hisab_engine::engine::{CellRef, CellValue, GridSize};
