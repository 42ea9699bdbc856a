//! Storage module for CSV import/export

mod csv;

pub use csv::{CsvLayout, parse_csv, parse_csv_str, render_csv, write_csv};
