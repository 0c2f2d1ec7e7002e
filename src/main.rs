//! opselect - select representative order parameters from a COLVAR file.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    let cli = opselect::cli::parse_cli();

    // RUST_LOG takes precedence over --log-level. Logs go to stderr so the
    // selected names on stdout stay pipeable.
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| cli.log_level.clone());

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)))
        .init();

    opselect::cli::run_with_cli(cli)
}
