//! Hisab - spreadsheet-style calculator on the command line.

mod cli;
mod config;
mod render;

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, FromArgMatches};
use cli::{Cli, Step};
use config::Config;
use hisab_core::storage::CsvLayout;
use hisab_core::{Document, create_bundle};
use hisab_engine::engine::{AggregateRequest, Axis, parse_operand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("HISAB_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    init_logging(cli.verbose);

    let config = if cli.no_config {
        Config::default()
    } else {
        let (config, warnings) = config::load_config(cli.config.as_ref());
        for warning in warnings {
            tracing::warn!("{}", warning);
        }
        config
    };

    let mut doc = Document::with_file(cli.file.clone(), config.grid).with_context(|| {
        format!(
            "failed to load {}",
            cli.file.as_deref().unwrap_or(Path::new("grid")).display()
        )
    })?;

    for step in cli.steps(&matches) {
        if let Some(message) = run_step(&mut doc, step)? {
            println!("{}", message);
        }
    }

    if !cli.quiet {
        print!("{}", render::render_grid(&doc));
    }

    if let Some(path) = &cli.output {
        let layout = if cli.labeled {
            CsvLayout::Labeled
        } else {
            CsvLayout::Plain
        };
        doc.export_csv(path, layout)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Exported to {}", path.display());
    }

    if let Some(dir) = &cli.share {
        let dir = dir
            .clone()
            .or_else(|| config.share_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        let bundle = create_bundle(&doc, &dir, chrono::Local::now().naive_local())
            .with_context(|| format!("failed to create share bundle in {}", dir.display()))?;
        println!("Share bundle written to {}", bundle.path.display());
        println!();
        println!("{}", bundle.message);
    }

    Ok(())
}

/// Apply one command-line step to the document. Returns the message to show,
/// if any.
fn run_step(doc: &mut Document, step: Step) -> Result<Option<String>> {
    match step {
        Step::Set(assignment) => {
            doc.set_cell_from_input(assignment.cell, &assignment.input)
                .with_context(|| format!("failed to set {}", assignment.cell))?;
            Ok(None)
        }
        Step::Formula(text) => {
            doc.run_formula(&text)
                .with_context(|| format!("error executing operation {}", text))?;
            Ok(Some(format!(
                "Operation {} executed successfully!",
                text.trim().to_ascii_uppercase()
            )))
        }
        Step::Aggregate(axis, spec) => {
            let index = spec.index(axis).map_err(|e| anyhow!(e))?;
            let operand = match (&spec.operand, spec.operation.needs_operand()) {
                (Some(text), true) => Some(parse_operand(text)?),
                _ => None,
            };
            let request = AggregateRequest {
                axis,
                index,
                operation: spec.operation,
                operand,
            };
            let what = match axis {
                Axis::Column => "column",
                Axis::Row => "row",
            };
            let message = doc
                .apply_aggregate(&request)
                .with_context(|| format!("{} on {} {} failed", spec.operation, what, spec.target))?;
            Ok(Some(message))
        }
    }
}
