//! Binary crate for the `xmlweather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Reading optional user defaults
//! - Human-friendly output formatting

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();
    cmd.run()
}
