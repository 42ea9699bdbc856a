use super::Document;
use crate::error::{HisabError, Result};
use crate::storage::{CsvLayout, parse_csv, write_csv};
use std::path::{Path, PathBuf};

const MAX_CSV_FILE_BYTES: u64 = 4 * 1_048_576; // 4 MiB

impl Document {
    /// Replace the grid with the contents of a CSV file.
    ///
    /// The load is transactional: if any cell falls outside the grid the
    /// document is left unchanged. Column totals written below the last row
    /// are kept.
    pub fn import_csv(&mut self, path: &Path) -> Result<usize> {
        let meta = std::fs::metadata(path)?;
        if meta.len() > MAX_CSV_FILE_BYTES {
            return Err(HisabError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "Refusing to read {}: file too large ({} bytes, max {})",
                    path.display(),
                    meta.len(),
                    MAX_CSV_FILE_BYTES
                ),
            )));
        }

        let cells = parse_csv(path)?;
        for (cell_ref, _) in &cells {
            self.check_loaded_cell(cell_ref)?;
        }

        let count = cells.len();
        self.store.replace(cells);
        self.modified = true;
        tracing::info!(path = %path.display(), cells = count, "imported CSV");
        Ok(count)
    }

    /// Write the grid to a CSV file.
    pub fn export_csv(&self, path: &Path, layout: CsvLayout) -> Result<()> {
        write_csv(path, &self.store, layout)?;
        tracing::info!(path = %path.display(), ?layout, "exported CSV");
        Ok(())
    }

    /// Save to the file the grid was loaded from.
    /// Returns the path saved to.
    pub fn save_file(&mut self) -> Result<PathBuf> {
        let Some(path) = self.file_path.clone() else {
            return Err(HisabError::NoFilePath);
        };

        self.export_csv(&path, CsvLayout::Plain)?;
        self.modified = false;
        Ok(path)
    }
}
