//! Cheapest command line
//!
//! Reads a price list and its promotions, then prints the cheapest way to buy everything.
//! Set `RUST_LOG=debug` to see solver progress on stderr.

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

use cheapest::cli::{Args, run};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    run(&args, io::stdout().lock())
}
