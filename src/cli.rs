//! Command-line arguments and the steps they describe.

use clap::{ArgMatches, Parser};
use hisab_core::CellRef;
use hisab_engine::engine::{Axis, Operation};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "hisab")]
#[command(
    author,
    version,
    about = "Spreadsheet-style calculator: column formulas and row/column aggregates"
)]
pub struct Cli {
    /// CSV file to load into the grid
    pub file: Option<PathBuf>,

    /// Set a cell, e.g. A1=10 (repeatable)
    #[arg(short, long, value_name = "CELL=VALUE")]
    pub set: Vec<CellAssignment>,

    /// Run a column formula such as C*D (repeatable)
    #[arg(short, long, value_name = "FORMULA")]
    pub eval: Vec<String>,

    /// Column aggregate, e.g. A:sum or B:multiply:2 (repeatable)
    #[arg(short, long, value_name = "COL:OP[:VALUE]")]
    pub column: Vec<AggregateSpec>,

    /// Row aggregate, e.g. 3:sum or 3:add:5 (repeatable)
    #[arg(short, long, value_name = "ROW:OP[:VALUE]")]
    pub row: Vec<AggregateSpec>,

    /// Write the grid to a CSV file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Use the labeled layout (column letters and row numbers) for --output
    #[arg(long)]
    pub labeled: bool,

    /// Write a share bundle (zip) into DIR (default: config share.dir or the current dir)
    #[arg(long, value_name = "DIR", num_args = 0..=1)]
    pub share: Option<Option<PathBuf>>,

    /// Configuration file (default: config.toml in the user config dir)
    #[arg(long, value_name = "FILE", conflicts_with = "no_config")]
    pub config: Option<PathBuf>,

    /// Ignore any configuration file
    #[arg(long)]
    pub no_config: bool,

    /// Do not print the grid
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug logging (HISAB_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}

/// `A1=10`: a cell and the raw input for it.
#[derive(Clone, Debug, PartialEq)]
pub struct CellAssignment {
    pub cell: CellRef,
    pub input: String,
}

impl FromStr for CellAssignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (cell, input) = s
            .split_once('=')
            .ok_or_else(|| format!("expected CELL=VALUE, got '{}'", s))?;
        let cell = CellRef::from_str(cell.trim())
            .ok_or_else(|| format!("invalid cell reference '{}'", cell.trim()))?;
        Ok(CellAssignment {
            cell,
            input: input.to_string(),
        })
    }
}

/// `A:sum`, `3:add:5`: an axis line, operation and optional operand text.
///
/// The operand is kept as typed; it is validated when the step runs so the
/// engine reports a bad value the same way for every front end.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregateSpec {
    pub target: String,
    pub operation: Operation,
    pub operand: Option<String>,
}

impl FromStr for AggregateSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let target = parts.next().map(str::trim).unwrap_or_default();
        let operation = parts
            .next()
            .ok_or_else(|| format!("expected TARGET:OP[:VALUE], got '{}'", s))?;
        if target.is_empty() {
            return Err(format!("missing column or row in '{}'", s));
        }
        let operation = operation.parse::<Operation>().map_err(|e| e.to_string())?;
        Ok(AggregateSpec {
            target: target.to_string(),
            operation,
            operand: parts.next().map(str::to_string),
        })
    }
}

impl AggregateSpec {
    /// Zero-based index of the targeted column (`A`, `c`) or row (`3`).
    pub fn index(&self, axis: Axis) -> Result<usize, String> {
        match axis {
            Axis::Column => CellRef::from_str(&format!("{}1", self.target))
                .map(|r| r.col)
                .ok_or_else(|| format!("invalid column '{}'", self.target)),
            Axis::Row => self
                .target
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .ok_or_else(|| format!("invalid row '{}'", self.target)),
        }
    }
}

/// One unit of work, in the order it appeared on the command line.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    Set(CellAssignment),
    Formula(String),
    Aggregate(Axis, AggregateSpec),
}

impl Cli {
    /// Interleave the repeatable options back into command-line order.
    pub fn steps(&self, matches: &ArgMatches) -> Vec<Step> {
        fn indexed<T: Clone>(
            matches: &ArgMatches,
            id: &str,
            values: &[T],
            to_step: impl Fn(T) -> Step,
        ) -> Vec<(usize, Step)> {
            matches
                .indices_of(id)
                .map(|indices| {
                    indices
                        .zip(values.iter().cloned())
                        .map(|(idx, value)| (idx, to_step(value)))
                        .collect()
                })
                .unwrap_or_default()
        }

        let mut steps = Vec::new();
        steps.extend(indexed(matches, "set", &self.set, Step::Set));
        steps.extend(indexed(matches, "eval", &self.eval, Step::Formula));
        steps.extend(indexed(matches, "column", &self.column, |spec| {
            Step::Aggregate(Axis::Column, spec)
        }));
        steps.extend(indexed(matches, "row", &self.row, |spec| {
            Step::Aggregate(Axis::Row, spec)
        }));
        steps.sort_by_key(|(idx, _)| *idx);
        steps.into_iter().map(|(_, step)| step).collect()
    }
}
