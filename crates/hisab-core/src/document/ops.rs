//! Cell edits, formulas and row/column operations on a [`Document`].
//!
//! Clearing a row or column removes the cells at exactly that index, so
//! clearing row 1 leaves row 11 alone.

use super::Document;
use crate::error::{HisabError, Result};
use hisab_engine::engine::{
    AggregateRequest, Axis, COLUMN_TOTAL_OFFSET, CellRef, CellValue, Operation, UpdateSet, apply,
    execute_with_size, format_value, parse, value_of,
};

impl Document {
    pub(crate) fn check_cell(&self, cell_ref: &CellRef) -> Result<()> {
        if self.size.contains(cell_ref) {
            Ok(())
        } else {
            Err(HisabError::OutOfBounds {
                what: "cell",
                index: cell_ref.to_string(),
                limit: CellRef::new(
                    self.size.cols.saturating_sub(1),
                    self.size.rows.saturating_sub(1),
                )
                .to_string(),
            })
        }
    }

    /// Bounds check for loaded files. Rows past the grid are accepted as far
    /// as a column total can reach, so exported totals load back.
    pub(crate) fn check_loaded_cell(&self, cell_ref: &CellRef) -> Result<()> {
        let rows = self.size.rows + COLUMN_TOTAL_OFFSET;
        if cell_ref.col < self.size.cols && cell_ref.row < rows {
            return Ok(());
        }
        Err(HisabError::OutOfBounds {
            what: "cell",
            index: cell_ref.to_string(),
            limit: CellRef::new(self.size.cols.saturating_sub(1), rows.saturating_sub(1))
                .to_string(),
        })
    }

    fn check_axis(&self, axis: Axis, index: usize) -> Result<()> {
        let limit = match axis {
            Axis::Column => self.size.cols,
            Axis::Row => self.size.rows,
        };
        if index < limit {
            return Ok(());
        }
        Err(match axis {
            Axis::Column => HisabError::OutOfBounds {
                what: "column",
                index: CellRef::col_to_letters(index),
                limit: CellRef::col_to_letters(limit.saturating_sub(1)),
            },
            Axis::Row => HisabError::OutOfBounds {
                what: "row",
                index: (index + 1).to_string(),
                limit: limit.to_string(),
            },
        })
    }

    /// Set a cell from user input. Blank input clears the cell.
    pub fn set_cell_from_input(&mut self, cell_ref: CellRef, input: &str) -> Result<()> {
        self.check_cell(&cell_ref)?;
        match CellValue::from_input(input) {
            Some(value) => self.store.insert(cell_ref, value),
            None => {
                self.store.remove(&cell_ref);
            }
        }
        self.modified = true;
        Ok(())
    }

    pub fn clear_cell(&mut self, cell_ref: &CellRef) {
        if self.store.remove(cell_ref).is_some() {
            self.modified = true;
        }
    }

    /// Display string for a cell (empty when absent).
    pub fn get_cell_display(&self, cell_ref: &CellRef) -> String {
        self.store.get(cell_ref).map(format_value).unwrap_or_default()
    }

    /// Numeric value of a cell, `0` for anything non-numeric.
    pub fn get_cell_value(&self, cell_ref: &CellRef) -> f64 {
        value_of(cell_ref, &self.store)
    }

    fn merge(&mut self, updates: &UpdateSet) {
        if !updates.is_empty() {
            self.store.merge(updates);
            self.modified = true;
        }
    }

    /// Run a column formula typed into the formula bar (e.g. `c*d`).
    ///
    /// The text is trimmed and uppercased before parsing. Returns the updates
    /// that were merged.
    pub fn run_formula(&mut self, text: &str) -> Result<UpdateSet> {
        let formula = parse(&text.trim().to_ascii_uppercase())?;
        let updates = execute_with_size(&formula, &self.store, self.size);
        self.merge(&updates);
        tracing::debug!(%formula, version = self.version(), "formula merged");
        Ok(updates)
    }

    /// Run an aggregate against the document and merge the result.
    /// Returns the summary message.
    pub fn apply_aggregate(&mut self, request: &AggregateRequest) -> Result<String> {
        self.check_axis(request.axis, request.index)?;

        if request.operation == Operation::Clear {
            let removed = self.clear_axis(request.axis, request.index);
            tracing::debug!(removed, "axis cleared");
        }

        let outcome = apply(request, &self.store, self.size)?;
        self.merge(&outcome.updates);
        Ok(outcome.message)
    }

    pub fn apply_column(
        &mut self,
        col: usize,
        operation: Operation,
        operand: Option<f64>,
    ) -> Result<String> {
        self.apply_aggregate(&AggregateRequest {
            axis: Axis::Column,
            index: col,
            operation,
            operand,
        })
    }

    pub fn apply_row(
        &mut self,
        row: usize,
        operation: Operation,
        operand: Option<f64>,
    ) -> Result<String> {
        self.apply_aggregate(&AggregateRequest {
            axis: Axis::Row,
            index: row,
            operation,
            operand,
        })
    }

    fn clear_axis(&mut self, axis: Axis, index: usize) -> usize {
        let removed = self.store.remove_where(|cell_ref| match axis {
            Axis::Column => cell_ref.col == index,
            Axis::Row => cell_ref.row == index,
        });
        if removed > 0 {
            self.modified = true;
        }
        removed
    }

    /// Delete every cell in a column. Returns how many cells were removed.
    pub fn clear_column(&mut self, col: usize) -> usize {
        self.clear_axis(Axis::Column, col)
    }

    /// Delete every cell in a row. Returns how many cells were removed.
    pub fn clear_row(&mut self, row: usize) -> usize {
        self.clear_axis(Axis::Row, row)
    }

    pub fn clear_all(&mut self) {
        if !self.store.is_empty() {
            self.store.clear();
            self.modified = true;
        }
    }
}
