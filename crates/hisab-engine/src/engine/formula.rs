//! Whole-column formulas such as `C*D`.
//!
//! A formula names two source columns and one operator. It is applied row by
//! row over the grid and writes into the column just past the greater source
//! column.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use super::cell::{CellStore, GridSize, UpdateSet, value_of};
use super::cell_ref::CellRef;
use crate::error::{EngineError, Result};

static FORMULA_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<left>[A-Z])(?<op>[+\-*/])(?<right>[A-Z])$").expect("formula pattern is valid")
});

/// Binary operator between two columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    /// Apply the operator. Dividing by exactly zero yields `0`.
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operator::Add => lhs + rhs,
            Operator::Subtract => lhs - rhs,
            Operator::Multiply => lhs * rhs,
            Operator::Divide => {
                if rhs != 0.0 {
                    lhs / rhs
                } else {
                    0.0
                }
            }
        }
    }
}

impl TryFrom<char> for Operator {
    type Error = EngineError;

    fn try_from(c: char) -> Result<Self> {
        match c {
            '+' => Ok(Operator::Add),
            '-' => Ok(Operator::Subtract),
            '*' => Ok(Operator::Multiply),
            '/' => Ok(Operator::Divide),
            other => Err(EngineError::UnsupportedOperator(other)),
        }
    }
}

/// A parsed column formula. Columns are zero-indexed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Formula {
    left: usize,
    op: Operator,
    right: usize,
}

impl Formula {
    /// Build a formula from its parts.
    ///
    /// Columns must be single uppercase letters; the operator must be one of
    /// `+ - * /`.
    pub fn new(left: char, op: char, right: char) -> Result<Formula> {
        let column = |c: char| {
            CellRef::col_from_letter(c).ok_or_else(|| EngineError::Format {
                input: format!("{}{}{}", left, op, right),
            })
        };
        let left_col = column(left)?;
        let right_col = column(right)?;
        let op = Operator::try_from(op)?;
        Ok(Formula {
            left: left_col,
            op,
            right: right_col,
        })
    }

    pub fn left(&self) -> usize {
        self.left
    }

    pub fn right(&self) -> usize {
        self.right
    }

    pub fn operator(&self) -> Operator {
        self.op
    }

    /// Column the results are written to: one past the greater source column.
    pub fn destination(&self) -> usize {
        self.left.max(self.right) + 1
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            CellRef::col_to_letters(self.left),
            self.op.symbol(),
            CellRef::col_to_letters(self.right)
        )
    }
}

impl std::str::FromStr for Formula {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

/// Parse formula text of the exact shape letter-operator-letter (`A*B`).
///
/// Input is expected to be uppercased by the caller; lowercase letters,
/// whitespace and multi-letter columns are rejected.
pub fn parse(text: &str) -> Result<Formula> {
    let caps = FORMULA_PATTERN
        .captures(text)
        .ok_or_else(|| EngineError::Format {
            input: text.to_string(),
        })?;
    let first = |name: &str| caps[name].chars().next().unwrap_or_default();
    Formula::new(first("left"), first("op"), first("right"))
}

/// Run a formula over the default 20 x 10 grid.
pub fn execute(formula: &Formula, store: &CellStore) -> UpdateSet {
    execute_with_size(formula, store, GridSize::default())
}

/// Run a formula over every row of a grid of the given size.
///
/// Rows where both operands read as `0` produce no update. Results destined
/// for a column outside the grid are dropped.
pub fn execute_with_size(formula: &Formula, store: &CellStore, size: GridSize) -> UpdateSet {
    let dest = formula.destination();
    let in_bounds = dest < size.cols;
    let mut results = UpdateSet::new();

    for row in 0..size.rows {
        let lhs = value_of(&CellRef::new(formula.left, row), store);
        let rhs = value_of(&CellRef::new(formula.right, row), store);

        if lhs == 0.0 && rhs == 0.0 {
            continue;
        }

        let result = formula.op.apply(lhs, rhs);
        if in_bounds {
            results.insert(CellRef::new(dest, row), result);
        }
    }

    if !in_bounds {
        tracing::debug!(
            formula = %formula,
            dest = %CellRef::col_to_letters(dest),
            "destination column outside grid; results dropped"
        );
    }
    tracing::debug!(formula = %formula, updates = results.len(), "formula executed");
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> CellStore {
        let mut store = CellStore::new();
        for (name, v) in [
            ("A1", 10.0),
            ("B1", 5.0),
            ("A2", 20.0),
            ("B2", 8.0),
            ("A3", 15.0),
            ("B3", 3.0),
        ] {
            store.insert(CellRef::from_str(name).unwrap(), v);
        }
        store
    }

    fn named(updates: &UpdateSet) -> Vec<(String, f64)> {
        updates.iter().map(|(r, v)| (r.to_string(), *v)).collect()
    }

    #[test]
    fn test_parse_valid_shapes() {
        for text in ["A+B", "C*D", "J-A", "Z/Y"] {
            assert!(parse(text).is_ok(), "{} should parse", text);
        }
        let f = parse("C*D").unwrap();
        assert_eq!(f.left(), 2);
        assert_eq!(f.right(), 3);
        assert_eq!(f.operator(), Operator::Multiply);
        assert_eq!(f.destination(), 4);
        assert_eq!(f.to_string(), "C*D");
    }

    #[test]
    fn test_parse_rejects_everything_else() {
        for text in [
            "", "A", "AB", "a+b", "A+b", "A + B", " A+B", "A+B ", "AA+B", "A+BB", "A%B", "A^B",
            "1+2", "A++B", "A+B+C",
        ] {
            assert!(
                matches!(parse(text), Err(EngineError::Format { .. })),
                "{:?} should be rejected",
                text
            );
        }
    }

    #[test]
    fn test_new_rejects_unsupported_operator() {
        assert_eq!(
            Formula::new('A', '%', 'B'),
            Err(EngineError::UnsupportedOperator('%'))
        );
        assert!(matches!(
            Formula::new('a', '+', 'B'),
            Err(EngineError::Format { .. })
        ));
    }

    #[test]
    fn test_multiply_columns() {
        let updates = execute(&parse("A*B").unwrap(), &sample_store());
        assert_eq!(
            named(&updates),
            vec![
                ("C1".to_string(), 50.0),
                ("C2".to_string(), 160.0),
                ("C3".to_string(), 45.0)
            ]
        );
    }

    #[test]
    fn test_add_columns() {
        let updates = execute(&parse("A+B").unwrap(), &sample_store());
        assert_eq!(
            named(&updates),
            vec![
                ("C1".to_string(), 15.0),
                ("C2".to_string(), 28.0),
                ("C3".to_string(), 18.0)
            ]
        );
    }

    #[test]
    fn test_subtract_is_left_minus_right() {
        let updates = execute(&parse("B-A").unwrap(), &sample_store());
        assert_eq!(updates[&CellRef::new(2, 0)], -5.0);
    }

    #[test]
    fn test_empty_rows_are_skipped() {
        let updates = execute(&parse("A+B").unwrap(), &sample_store());
        assert!(!updates.contains_key(&CellRef::new(2, 9)));
        assert_eq!(updates.len(), 3);
    }

    #[test]
    fn test_row_with_one_operand_is_kept() {
        let mut store = CellStore::new();
        store.insert(CellRef::new(1, 4), 6.0); // B5 only
        let updates = execute(&parse("A-B").unwrap(), &store);
        assert_eq!(named(&updates), vec![("C5".to_string(), -6.0)]);
    }

    #[test]
    fn test_divide_by_zero_yields_zero() {
        let mut store = CellStore::new();
        store.insert(CellRef::new(0, 0), 9.0); // A1
        store.insert(CellRef::new(0, 1), 8.0); // A2
        store.insert(CellRef::new(1, 1), 2.0); // B2
        store.insert(CellRef::new(1, 2), "oops"); // B3 (text reads as 0)
        store.insert(CellRef::new(0, 2), 1.0); // A3
        let updates = execute(&parse("A/B").unwrap(), &store);
        assert_eq!(updates[&CellRef::new(2, 0)], 0.0);
        assert_eq!(updates[&CellRef::new(2, 1)], 4.0);
        assert_eq!(updates[&CellRef::new(2, 2)], 0.0);
        assert!(updates.values().all(|v| v.is_finite()));
    }

    #[test]
    fn test_destination_past_last_column_is_dropped() {
        let mut store = CellStore::new();
        store.insert(CellRef::new(0, 0), 1.0); // A1
        store.insert(CellRef::new(9, 0), 2.0); // J1
        let updates = execute(&parse("A+J").unwrap(), &store);
        assert!(updates.is_empty());

        let updates = execute(&parse("I+A").unwrap(), &store);
        assert_eq!(named(&updates), vec![("J1".to_string(), 1.0)]);
    }

    #[test]
    fn test_execute_with_size_honours_bounds() {
        let mut store = CellStore::new();
        store.insert(CellRef::new(0, 24), 3.0); // A25
        store.insert(CellRef::new(1, 24), 4.0); // B25
        let f = parse("A*B").unwrap();
        assert!(execute(&f, &store).is_empty());

        let updates = execute_with_size(&f, &store, GridSize::new(30, 3));
        assert_eq!(named(&updates), vec![("C25".to_string(), 12.0)]);

        assert!(execute_with_size(&f, &store, GridSize::new(30, 2)).is_empty());
    }

    #[test]
    fn test_text_numbers_participate() {
        let mut store = CellStore::new();
        store.insert(CellRef::new(0, 0), "2.5");
        store.insert(CellRef::new(1, 0), 4.0);
        let updates = execute(&parse("A*B").unwrap(), &store);
        assert_eq!(updates[&CellRef::new(2, 0)], 10.0);
    }
}
