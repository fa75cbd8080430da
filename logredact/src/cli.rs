// logredact/src/cli.rs
//! This file defines the command-line interface (CLI) for the logredact application,
//! including all available commands and their arguments.
//! License: MIT OR APACHE 2.0

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "logredact",
    author = "Relay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Redact sensitive data from log streams",
    long_about = "logredact rewrites log lines before they are stored, masking credit card numbers, SSNs, passwords and other sensitive values. Rules are ordered (trigger, regex, replacement) entries loaded from a versioned JSON or YAML policy or from inline trigger::regex::mask triples.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', global = true, conflicts_with = "quiet", help = "Enable debug logging.")]
    pub debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `logredact` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Redacts an input file or stdin line by line.
    #[command(about = "Redacts an input file or stdin line by line.")]
    Redact(RedactCommand),

    /// Compiles a rule source and reports what it contains.
    #[command(about = "Validates a rule source and lists its triggers in application order.")]
    Check(CheckCommand),
}

/// Rule selection shared by every command.
#[derive(Parser, Debug)]
pub struct RulesArgs {
    /// A policy/triples file path, an inline JSON policy, or inline triples.
    #[arg(
        long = "rules",
        short = 'r',
        value_name = "SETTING|FILE",
        env = "LOGREDACT_RULES",
        help = "Rule source: a .json/.yaml policy or triples file, an inline JSON policy, or inline trigger::regex::mask triples."
    )]
    pub rules: String,

    /// Log and ignore unknown policy fields instead of rejecting them.
    #[arg(long = "lenient", help = "Ignore unknown policy fields instead of failing.")]
    pub lenient: bool,

    /// Treat rules that do not state `caseSensitive` as case-insensitive.
    #[arg(long = "case-insensitive", help = "Make rules without an explicit caseSensitive setting case-insensitive.")]
    pub case_insensitive: bool,
}

/// Arguments for the `redact` command.
#[derive(Parser, Debug)]
pub struct RedactCommand {
    #[command(flatten)]
    pub rules: RulesArgs,

    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Write redacted output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a specified file instead of stdout.")]
    pub output: Option<PathBuf>,

    /// Flush after every line (useful for streaming data from pipes).
    #[arg(long = "line-buffered", help = "Flush output after every line (useful for streaming data from pipes).")]
    pub line_buffered: bool,
}

/// Arguments for the `check` command.
#[derive(Parser, Debug)]
pub struct CheckCommand {
    #[command(flatten)]
    pub rules: RulesArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_redact_with_all_flags() {
        let cli = Cli::try_parse_from([
            "logredact",
            "-q",
            "redact",
            "--rules",
            "SSN::\\d{9}::X",
            "--lenient",
            "--case-insensitive",
            "-i",
            "in.log",
            "-o",
            "out.log",
            "--line-buffered",
        ])
        .unwrap();
        assert!(cli.quiet);
        match cli.command {
            Commands::Redact(cmd) => {
                assert_eq!(cmd.rules.rules, "SSN::\\d{9}::X");
                assert!(cmd.rules.lenient);
                assert!(cmd.rules.case_insensitive);
                assert_eq!(cmd.input_file, Some(PathBuf::from("in.log")));
                assert_eq!(cmd.output, Some(PathBuf::from("out.log")));
                assert!(cmd.line_buffered);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_quiet_and_debug_conflict() {
        assert!(Cli::try_parse_from(["logredact", "-q", "-d", "check", "--rules", "a::b::c"]).is_err());
    }
}
