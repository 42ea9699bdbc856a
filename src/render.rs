//! Plain-text rendering of the grid for the terminal.

use hisab_core::{CellRef, Document};
use std::fmt::Write;

/// Render the populated area of the grid (from A1) as an aligned table with
/// column letters across the top and row numbers down the side.
pub fn render_grid(doc: &Document) -> String {
    let Some((max_row, max_col)) = doc.store().extent() else {
        return "(empty grid)\n".to_string();
    };

    let cells: Vec<Vec<String>> = (0..=max_row)
        .map(|row| {
            (0..=max_col)
                .map(|col| doc.get_cell_display(&CellRef::new(col, row)))
                .collect()
        })
        .collect();

    let label_width = (max_row + 1).to_string().len();
    let widths: Vec<usize> = (0..=max_col)
        .map(|col| {
            cells
                .iter()
                .map(|row| row[col].chars().count())
                .chain(std::iter::once(CellRef::col_to_letters(col).len()))
                .max()
                .unwrap_or(1)
        })
        .collect();

    let mut out = String::new();
    let _ = write!(out, "{:>w$}", "", w = label_width);
    for (col, width) in widths.iter().enumerate() {
        let _ = write!(out, " | {:>w$}", CellRef::col_to_letters(col), w = width);
    }
    out.push('\n');

    for (row, values) in cells.iter().enumerate() {
        let _ = write!(out, "{:>w$}", row + 1, w = label_width);
        for (value, width) in values.iter().zip(&widths) {
            let _ = write!(out, " | {:>w$}", value, w = width);
        }
        out.push('\n');
    }
    out
}
