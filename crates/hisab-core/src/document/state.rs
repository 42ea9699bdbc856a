use crate::error::Result;
use hisab_engine::engine::{CellStore, GridSize};
use std::path::PathBuf;

/// UI-agnostic document state for the calculator.
///
/// The document is the only owner of the cell store. Engine calls receive a
/// shared borrow of it and hand back update sets that the document merges.
pub struct Document {
    /// The sparse cell store
    pub(crate) store: CellStore,
    /// Grid bounds used for every engine call
    pub(crate) size: GridSize,
    /// CSV file the grid was loaded from, if any
    pub file_path: Option<PathBuf>,
    /// Whether the grid has been modified since load/save
    pub modified: bool,
}

impl Document {
    /// Create an empty document with the default 20 x 10 grid.
    pub fn new() -> Self {
        Self::with_size(GridSize::default())
    }

    pub fn with_size(size: GridSize) -> Self {
        Document {
            store: CellStore::new(),
            size,
            file_path: None,
            modified: false,
        }
    }

    /// Create a new document and load a CSV file if provided.
    pub fn with_file(path: Option<PathBuf>, size: GridSize) -> Result<Self> {
        let mut doc = Self::with_size(size);
        if let Some(ref p) = path {
            if p.exists() {
                doc.import_csv(p)?;
            }
            doc.file_path = Some(p.clone());
            doc.modified = false;
        }
        Ok(doc)
    }

    /// Read-only snapshot of the cell store.
    pub fn store(&self) -> &CellStore {
        &self.store
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Version of the cell store; bumps on every change.
    pub fn version(&self) -> u64 {
        self.store.version()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
