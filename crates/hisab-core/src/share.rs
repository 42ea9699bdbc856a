//! Share bundles: a zip holding a labeled CSV export and a short README,
//! plus a ready-to-send message describing it.

use crate::document::Document;
use crate::error::{HisabError, Result};
use crate::storage::{CsvLayout, render_csv};
use chrono::NaiveDateTime;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;

/// A share bundle written to disk.
#[derive(Debug, Clone)]
pub struct ShareBundle {
    /// Path of the zip file
    pub path: PathBuf,
    /// Name of the CSV entry inside the zip
    pub csv_name: String,
    pub size_bytes: u64,
    /// Text to paste alongside the attachment
    pub message: String,
}

impl ShareBundle {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}

fn readme(csv_name: &str, now: NaiveDateTime) -> String {
    format!(
        "Hisab Spreadsheet Data\n\
         ======================\n\
         \n\
         This zip file contains Hisab spreadsheet data exported on {}.\n\
         \n\
         Files included:\n\
         - {}: spreadsheet data in CSV format\n\
         \n\
         To open the CSV file:\n\
         - Use Microsoft Excel, Google Sheets, LibreOffice or any spreadsheet application\n\
         - Import as CSV with comma separator\n",
        now.format("%Y-%m-%d %H:%M:%S"),
        csv_name
    )
}

fn share_message(zip_name: &str, size_kb: f64, now: NaiveDateTime) -> String {
    format!(
        "Sharing my Hisab spreadsheet data!\n\
         \n\
         File: {}\n\
         Size: {:.1} KB\n\
         Created: {}\n\
         \n\
         Open the attached CSV file in any spreadsheet app.",
        zip_name,
        size_kb,
        now.format("%Y-%m-%d %H:%M")
    )
}

/// Write a share bundle for the document into `dir`.
///
/// File names carry the `now` timestamp (`Hisab_Data_20240908_143052.zip`).
/// An empty grid has nothing to share.
pub fn create_bundle(doc: &Document, dir: &Path, now: NaiveDateTime) -> Result<ShareBundle> {
    if doc.store().is_empty() {
        return Err(HisabError::NothingToShare);
    }

    let stamp = now.format("%Y%m%d_%H%M%S");
    let csv_name = format!("Hisab_Spreadsheet_{}.csv", stamp);
    let path = dir.join(format!("Hisab_Data_{}.zip", stamp));

    let csv = render_csv(doc.store(), CsvLayout::Labeled);

    std::fs::create_dir_all(dir)?;
    let file = File::create(&path)?;
    let mut zip = zip::ZipWriter::new(file);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file(csv_name.as_str(), options)?;
    zip.write_all(csv.as_bytes())?;

    zip.start_file("README.txt", options)?;
    zip.write_all(readme(&csv_name, now).as_bytes())?;

    zip.finish()?;

    let size_bytes = std::fs::metadata(&path)?.len();
    let mut bundle = ShareBundle {
        path,
        csv_name,
        size_bytes,
        message: String::new(),
    };
    bundle.message = share_message(&bundle.file_name(), bundle.size_kb(), now);

    tracing::info!(
        path = %bundle.path.display(),
        bytes = bundle.size_bytes,
        "share bundle written"
    );
    Ok(bundle)
}
