//! Cell evaluation engine API.
//!
//! Every operation here takes a read-only [`CellStore`] snapshot and returns
//! the cells to update; nothing in this module mutates the store.
//!
//! - [`CellRef`] - Cell reference parsing (A1 notation ↔ row/col indices)
//! - [`CellValue`], [`CellStore`], [`value_of`] - Sparse cell storage and its numeric view
//! - [`parse`], [`execute`] - Whole-column formulas such as `C*D`
//! - [`apply_column`], [`apply_row`] - Per-axis sums and scalar operations
//! - [`format_number`] - Format values for display

mod aggregate;
mod cell;
mod cell_ref;
mod format;
mod formula;

pub use aggregate::{
    AggregateOutcome, AggregateRequest, Axis, COLUMN_TOTAL_OFFSET, Operation, apply, apply_column,
    apply_row, parse_operand,
};
pub use cell::{CellStore, CellValue, DEFAULT_COLS, DEFAULT_ROWS, GridSize, UpdateSet, value_of};
pub use cell_ref::CellRef;
pub use format::{format_number, format_value};
pub use formula::{Formula, Operator, execute, execute_with_size, parse};
