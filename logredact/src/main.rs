// logredact/src/main.rs
//! logredact entry point.
//!
//! Parses arguments, configures logging and dispatches to a subcommand.

use anyhow::Result;
use clap::Parser;

use logredact::cli::{Cli, Commands};
use logredact::commands::{check::run_check, redact::run_redact};
use logredact::logger;

fn main() -> Result<()> {
    let args = Cli::parse();

    if args.quiet {
        logger::init_logger(Some(log::LevelFilter::Off));
    } else if args.debug {
        logger::init_logger(Some(log::LevelFilter::Debug));
    } else {
        logger::init_logger(None);
    }

    match &args.command {
        Commands::Redact(cmd) => run_redact(cmd),
        Commands::Check(cmd) => run_check(cmd),
    }
}
