//! Per-column and per-row aggregate operations.
//!
//! An aggregate either sums the populated cells along one axis or applies a
//! scalar to each of them. Only cells that read as non-zero take part; an
//! explicit `0` is treated the same as an empty cell.

use std::fmt;
use std::str::FromStr;

use super::cell::{CellStore, GridSize, UpdateSet, value_of};
use super::cell_ref::CellRef;
use super::format::format_number;
use crate::error::{EngineError, Result};

/// Dimension an aggregate targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Column,
    Row,
}

impl Axis {
    /// Cell at position `pos` along this axis for the line at `index`.
    fn cell_at(self, index: usize, pos: usize) -> CellRef {
        match self {
            Axis::Column => CellRef::new(index, pos),
            Axis::Row => CellRef::new(pos, index),
        }
    }

    /// Human-readable label: `column A` or `row 3`.
    pub fn label(self, index: usize) -> String {
        match self {
            Axis::Column => format!("column {}", CellRef::col_to_letters(index)),
            Axis::Row => format!("row {}", index + 1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Sum,
    Add,
    Subtract,
    Multiply,
    Divide,
    Clear,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::Sum,
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
        Operation::Clear,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Sum => "sum",
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
            Operation::Clear => "clear",
        }
    }

    /// Whether the operation needs a scalar operand.
    pub fn needs_operand(self) -> bool {
        matches!(
            self,
            Operation::Add | Operation::Subtract | Operation::Multiply | Operation::Divide
        )
    }

    /// Apply a scalar operation to one cell value. `Sum` and `Clear` leave
    /// the value as is; dividing by exactly zero keeps the current value.
    fn scale(self, current: f64, operand: f64) -> f64 {
        match self {
            Operation::Add => current + operand,
            Operation::Subtract => current - operand,
            Operation::Multiply => current * operand,
            Operation::Divide if operand != 0.0 => current / operand,
            Operation::Divide | Operation::Sum | Operation::Clear => current,
        }
    }
}

impl FromStr for Operation {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EngineError::UnknownOperation(s.to_string()))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One aggregate command: an axis, the line on it, the operation and an
/// optional operand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AggregateRequest {
    pub axis: Axis,
    pub index: usize,
    pub operation: Operation,
    pub operand: Option<f64>,
}

/// Result of an aggregate: the cells to write and a summary for the user.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AggregateOutcome {
    pub updates: UpdateSet,
    pub message: String,
}

/// Parse an operand typed by the user.
pub fn parse_operand(text: &str) -> Result<f64> {
    match text.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(EngineError::InvalidOperand(text.to_string())),
    }
}

/// Run an aggregate request against a grid of the given size.
pub fn apply(
    request: &AggregateRequest,
    store: &CellStore,
    size: GridSize,
) -> Result<AggregateOutcome> {
    match request.axis {
        Axis::Column => apply_column(
            request.index,
            request.operation,
            request.operand,
            store,
            size.rows,
        ),
        Axis::Row => apply_row(
            request.index,
            request.operation,
            request.operand,
            store,
            size.cols,
        ),
    }
}

/// Aggregate over column `col` across `row_count` rows.
///
/// `sum` writes the total two rows below the last populated row (row 2 when
/// the column is empty).
pub fn apply_column(
    col: usize,
    operation: Operation,
    operand: Option<f64>,
    store: &CellStore,
    row_count: usize,
) -> Result<AggregateOutcome> {
    apply_on_axis(Axis::Column, col, operation, operand, store, row_count)
}

/// Aggregate over row `row` across `col_count` columns.
///
/// `sum` writes the total in the column after the last populated one, but
/// only when that column is inside the grid.
pub fn apply_row(
    row: usize,
    operation: Operation,
    operand: Option<f64>,
    store: &CellStore,
    col_count: usize,
) -> Result<AggregateOutcome> {
    apply_on_axis(Axis::Row, row, operation, operand, store, col_count)
}

/// Rows between a column's last value and its total. A total can land up
/// to this many rows past the last grid row.
pub const COLUMN_TOTAL_OFFSET: usize = 2;

fn apply_on_axis(
    axis: Axis,
    index: usize,
    operation: Operation,
    operand: Option<f64>,
    store: &CellStore,
    len: usize,
) -> Result<AggregateOutcome> {
    let operand = if operation.needs_operand() {
        match operand {
            Some(n) if n.is_finite() => Some(n),
            Some(n) => return Err(EngineError::InvalidOperand(n.to_string())),
            None => return Err(EngineError::InvalidOperand("missing value".to_string())),
        }
    } else {
        None
    };

    // (position along the axis, value)
    let populated: Vec<(usize, f64)> = (0..len)
        .map(|pos| (pos, value_of(&axis.cell_at(index, pos), store)))
        .filter(|&(_, value)| value != 0.0)
        .collect();

    let label = axis.label(index);
    let mut updates = UpdateSet::new();

    let message = match (operation, operand) {
        (Operation::Sum, _) => {
            let total: f64 = populated.iter().map(|&(_, value)| value).sum();
            let last = populated.last().map(|&(pos, _)| pos);
            match axis {
                Axis::Column => {
                    // One blank row between the data and the total.
                    let target = last.map_or(1, |pos| pos + COLUMN_TOTAL_OFFSET);
                    updates.insert(axis.cell_at(index, target), total);
                }
                Axis::Row => {
                    let target = last.map_or(0, |pos| pos + 1);
                    if target < len {
                        updates.insert(axis.cell_at(index, target), total);
                    } else {
                        tracing::debug!(%label, "no free column for row sum; total not written");
                    }
                }
            }
            format!("Sum of {}: {}", label, format_number(total))
        }
        (Operation::Clear, _) => format!("Cleared {}", label),
        (op, Some(value)) => {
            for &(pos, current) in &populated {
                updates.insert(axis.cell_at(index, pos), op.scale(current, value));
            }
            format!("Applied {} {} to {}", op, format_number(value), label)
        }
        (op, None) => return Err(EngineError::InvalidOperand(format!("{} requires a value", op))),
    };

    tracing::debug!(
        operation = %operation,
        %label,
        populated = populated.len(),
        updates = updates.len(),
        "aggregate computed"
    );

    Ok(AggregateOutcome { updates, message })
}
