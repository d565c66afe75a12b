//! Command-line interface for plain-text availability and scheduling
//! calendars.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
