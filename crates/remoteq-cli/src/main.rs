//! `rq` - apply remoteq query documents to JSON records.
//!
//! Reads a JSON array of records from a file or stdin, decodes the query
//! document passed with `--query`, `--query-b64` or `--query-file`, and
//! prints the matching records (or their count, or the decoded tree).

mod cli;
mod run;

use std::io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let mut stdout = io::stdout().lock();
    run::run(&cli, io::stdin().lock(), &mut stdout)
}
