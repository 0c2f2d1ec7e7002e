//! Command-line interface for opselect.

mod commands;

pub use commands::{parse_cli, resolve_capacity, run, run_with_cli, run_with_writer, Cli};
