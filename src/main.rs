//! tagpath - legal filesystem paths from music metadata.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tagpath::cli;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("tagpath=info".parse()?))
        .init();

    cli::run_command(&args)
}
