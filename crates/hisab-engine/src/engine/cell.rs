//! Cell data structures for the calculator grid.
//!
//! - [`CellValue`] - What a populated cell holds (a number or raw text)
//! - [`CellStore`] - Sparse, versioned storage for cells
//! - [`GridSize`] - Grid bounds passed explicitly to engine calls
//! - [`UpdateSet`] - Cell updates produced by the engine
//! - [`value_of`] - Numeric view of a cell, treating anything unusable as `0`

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use super::cell_ref::CellRef;

/// Default number of rows (1..=20).
pub const DEFAULT_ROWS: usize = 20;
/// Default number of columns (A..=J).
pub const DEFAULT_COLS: usize = 10;

/// The content of a populated cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Parse user input into a cell value.
    /// - Empty string or whitespace -> None (the cell is cleared)
    /// - Valid number -> Number
    /// - Otherwise -> Text
    pub fn from_input(input: &str) -> Option<CellValue> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if !n.is_nan() => Some(CellValue::Number(n)),
            _ => Some(CellValue::Text(trimmed.to_string())),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

/// Cell updates produced by the engine, keyed in row-major order.
pub type UpdateSet = BTreeMap<CellRef, f64>;

/// Grid bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub rows: usize,
    pub cols: usize,
}

impl GridSize {
    pub fn new(rows: usize, cols: usize) -> Self {
        GridSize { rows, cols }
    }

    pub fn contains(&self, cell_ref: &CellRef) -> bool {
        cell_ref.row < self.rows && cell_ref.col < self.cols
    }
}

impl Default for GridSize {
    fn default() -> Self {
        GridSize::new(DEFAULT_ROWS, DEFAULT_COLS)
    }
}

/// Sparse cell storage with a version counter.
///
/// Every mutation bumps `version`, so a caller holding an older snapshot can
/// tell that the grid moved on.
#[derive(Clone, Debug, Default)]
pub struct CellStore {
    cells: HashMap<CellRef, CellValue>,
    version: u64,
}

impl CellStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self, cell_ref: &CellRef) -> Option<&CellValue> {
        self.cells.get(cell_ref)
    }

    pub fn insert(&mut self, cell_ref: CellRef, value: impl Into<CellValue>) {
        self.cells.insert(cell_ref, value.into());
        self.version += 1;
    }

    pub fn remove(&mut self, cell_ref: &CellRef) -> Option<CellValue> {
        let removed = self.cells.remove(cell_ref);
        if removed.is_some() {
            self.version += 1;
        }
        removed
    }

    /// Remove every cell for which `pred` holds. Returns how many were removed.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&CellRef) -> bool) -> usize {
        let before = self.cells.len();
        self.cells.retain(|cell_ref, _| !pred(cell_ref));
        let removed = before - self.cells.len();
        if removed > 0 {
            self.version += 1;
        }
        removed
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.version += 1;
    }

    /// Replace the whole contents as a single version step.
    pub fn replace(&mut self, cells: impl IntoIterator<Item = (CellRef, CellValue)>) {
        self.cells = cells.into_iter().collect();
        self.version += 1;
    }

    /// Merge an update set into the store as a single version step.
    pub fn merge(&mut self, updates: &UpdateSet) {
        if updates.is_empty() {
            return;
        }
        for (cell_ref, value) in updates {
            self.cells.insert(*cell_ref, CellValue::Number(*value));
        }
        self.version += 1;
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CellRef, &CellValue)> {
        self.cells.iter()
    }

    /// Bounding box of populated cells as `(max_row, max_col)`, or None if empty.
    pub fn extent(&self) -> Option<(usize, usize)> {
        self.cells.keys().fold(None, |acc, cell_ref| match acc {
            None => Some((cell_ref.row, cell_ref.col)),
            Some((r, c)) => Some((r.max(cell_ref.row), c.max(cell_ref.col))),
        })
    }
}

impl FromIterator<(CellRef, CellValue)> for CellStore {
    fn from_iter<I: IntoIterator<Item = (CellRef, CellValue)>>(iter: I) -> Self {
        let cells: HashMap<CellRef, CellValue> = iter.into_iter().collect();
        CellStore { cells, version: 0 }
    }
}

static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
        .expect("numeric prefix pattern is valid")
});

/// Numeric value of a cell.
///
/// Text reads as its leading number (`"12abc"` is `12`, `"1,000"` is `1`).
/// Missing cells, blank text and text without a leading number read as `0`.
pub fn value_of(cell_ref: &CellRef, store: &CellStore) -> f64 {
    match store.get(cell_ref) {
        None => 0.0,
        Some(CellValue::Number(n)) => *n,
        Some(CellValue::Text(s)) => leading_number(s).unwrap_or(0.0),
    }
}

fn leading_number(text: &str) -> Option<f64> {
    let prefix = NUMERIC_PREFIX.find(text.trim_start())?;
    prefix.as_str().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a1(name: &str) -> CellRef {
        CellRef::from_str(name).unwrap()
    }

    #[test]
    fn test_value_of_absent_is_zero() {
        let store = CellStore::new();
        assert_eq!(value_of(&a1("A1"), &store), 0.0);
    }

    #[test]
    fn test_value_of_text_variants() {
        let mut store = CellStore::new();
        store.insert(a1("A1"), "");
        store.insert(a1("A2"), "apples");
        store.insert(a1("A3"), "12.5");
        store.insert(a1("A4"), " 7 ");
        store.insert(a1("A5"), "NaN");
        assert_eq!(value_of(&a1("A1"), &store), 0.0);
        assert_eq!(value_of(&a1("A2"), &store), 0.0);
        assert_eq!(value_of(&a1("A3"), &store), 12.5);
        assert_eq!(value_of(&a1("A4"), &store), 7.0);
        assert_eq!(value_of(&a1("A5"), &store), 0.0);
    }

    #[test]
    fn test_value_of_reads_leading_number() {
        let mut store = CellStore::new();
        store.insert(a1("A1"), "12abc");
        store.insert(a1("A2"), "3.5kg");
        store.insert(a1("A3"), "abc12");
        store.insert(a1("A4"), "1,000");
        store.insert(a1("A5"), "  -2e3 units");
        store.insert(a1("A6"), ".5x");
        store.insert(a1("A7"), "-");
        assert_eq!(value_of(&a1("A1"), &store), 12.0);
        assert_eq!(value_of(&a1("A2"), &store), 3.5);
        assert_eq!(value_of(&a1("A3"), &store), 0.0);
        assert_eq!(value_of(&a1("A4"), &store), 1.0);
        assert_eq!(value_of(&a1("A5"), &store), -2000.0);
        assert_eq!(value_of(&a1("A6"), &store), 0.5);
        assert_eq!(value_of(&a1("A7"), &store), 0.0);
    }

    #[test]
    fn test_value_of_number_unchanged() {
        let mut store = CellStore::new();
        store.insert(a1("B2"), -3.25);
        assert_eq!(value_of(&a1("B2"), &store), -3.25);
    }

    #[test]
    fn test_from_input() {
        assert_eq!(CellValue::from_input("   "), None);
        assert_eq!(CellValue::from_input("42"), Some(CellValue::Number(42.0)));
        assert_eq!(
            CellValue::from_input(" rent "),
            Some(CellValue::Text("rent".to_string()))
        );
    }

    #[test]
    fn test_version_bumps_on_mutation_only() {
        let mut store = CellStore::new();
        assert_eq!(store.version(), 0);
        store.insert(a1("A1"), 1.0);
        assert_eq!(store.version(), 1);

        assert!(store.remove(&a1("Z9")).is_none());
        assert_eq!(store.version(), 1);

        store.merge(&UpdateSet::new());
        assert_eq!(store.version(), 1);

        let mut updates = UpdateSet::new();
        updates.insert(a1("A2"), 2.0);
        updates.insert(a1("A3"), 3.0);
        store.merge(&updates);
        assert_eq!(store.version(), 2);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_remove_where_and_extent() {
        let mut store = CellStore::new();
        store.insert(a1("A1"), 1.0);
        store.insert(a1("A11"), 2.0);
        store.insert(a1("C4"), 3.0);
        assert_eq!(store.extent(), Some((10, 2)));

        let removed = store.remove_where(|r| r.col == 0);
        assert_eq!(removed, 2);
        assert_eq!(store.extent(), Some((3, 2)));
    }
}
