//! CLI definition for opselect.
//!
//! Reads a COLVAR file, runs the selector over its columns and prints the
//! chosen order parameter names, one per line.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use crate::colvar::read_colvar;
use crate::selection::{OrderParameterSelector, SelectorConfig, DEFAULT_CAPACITY};

/// Select a small, maximally informative set of order parameters.
#[derive(Parser, Debug)]
#[command(name = "opselect")]
#[command(about = "Select representative order parameters from a COLVAR file")]
#[command(version)]
#[command(
    long_about = "opselect clusters the columns of a COLVAR file under a mutual-information distance and prints the medoids chosen by the jump method, one name per line.\n\nExample usage:\n  opselect COLVAR -n 20\n  opselect COLVAR -n 60 --override --json"
)]
pub struct Cli {
    /// COLVAR file: a header line followed by a time column and one column per order parameter.
    pub colvar: PathBuf,

    /// Largest number of order parameters to keep (default: all columns, capped at 30).
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Allow a count above 30.
    #[arg(long = "override")]
    pub override_cap: bool,

    /// Histogram bins per axis for the information distance.
    #[arg(long)]
    pub bins: Option<usize>,

    /// Iteration cap for each clustering run.
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// YAML file with selector settings; command-line flags take precedence.
    #[arg(long, env = "OPSELECT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the full selection report as JSON.
    #[arg(short = 'j', long)]
    pub json: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

/// Parse CLI arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Parse CLI arguments and run.
pub fn run() -> anyhow::Result<()> {
    run_with_cli(parse_cli())
}

/// Run with parsed arguments, printing to stdout.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with_writer(cli, &mut out)
}

/// Run with parsed arguments, printing to `out`.
pub fn run_with_writer<W: Write>(cli: Cli, out: &mut W) -> anyhow::Result<()> {
    let table = read_colvar(&cli.colvar)
        .with_context(|| format!("Failed to read COLVAR file {}", cli.colvar.display()))?;

    let config = build_config(&cli, table.columns.len())?;
    info!(
        columns = table.columns.len(),
        rows = table.row_count(),
        capacity = config.capacity,
        bins = config.bins,
        "selecting order parameters"
    );

    let selector = OrderParameterSelector::new(config)?;
    let report = selector
        .select_with_report(&table.columns)
        .context("Order parameter selection failed")?;

    if cli.json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        for name in &report.selected {
            writeln!(out, "{}", name)?;
        }
    }

    Ok(())
}

/// Merges the optional config file with command-line flags.
///
/// The capacity always comes from `-n` (or the column count) and the cap. A
/// capacity set in the file is ignored with a warning.
fn build_config(cli: &Cli, columns: usize) -> anyhow::Result<SelectorConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            let config = SelectorConfig::from_yaml_str(&content)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            if let Some(ignored) = file_capacity(&content) {
                warn!(
                    config = %path.display(),
                    capacity = ignored,
                    "capacity in config file is ignored; use -n to set it"
                );
            }
            config
        }
        None => SelectorConfig::default(),
    };

    config.capacity = resolve_capacity(cli.count, columns, cli.override_cap);
    if let Some(bins) = cli.bins {
        config.bins = bins;
    }
    if let Some(max_iterations) = cli.max_iterations {
        config.max_iterations = max_iterations;
    }

    Ok(config)
}

/// Returns the capacity a YAML config explicitly sets, if any.
fn file_capacity(content: &str) -> Option<u64> {
    let value: serde_yaml::Value = serde_yaml::from_str(content).ok()?;
    value.get("capacity")?.as_u64()
}

/// Resolves the matrix capacity from the requested count.
///
/// Defaults to the number of available columns and is capped at
/// [`DEFAULT_CAPACITY`] unless the override flag is set.
pub fn resolve_capacity(requested: Option<usize>, available: usize, allow_override: bool) -> usize {
    let count = requested.unwrap_or(available);
    if count > DEFAULT_CAPACITY && !allow_override {
        DEFAULT_CAPACITY
    } else {
        count
    }
}
