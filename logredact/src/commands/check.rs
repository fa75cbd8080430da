// logredact/src/commands/check.rs
//! `check` command: compiles a rule source and reports its shape.

use anyhow::Result;
use std::io::{self, Write};

use logredact_core::{RedactionEngine, RuleTable};

use crate::cli::CheckCommand;
use crate::commands::load_engine;

/// Compiles the rule source and prints a summary to stdout.
pub fn run_check(cmd: &CheckCommand) -> Result<()> {
    let engine = load_engine(&cmd.rules)?;
    let mut stdout = io::stdout().lock();
    write_report(engine.rule_table(), &mut stdout)?;
    Ok(())
}

/// Writes the rule count followed by each trigger, in application order.
pub fn write_report<W: Write>(table: &RuleTable, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "OK: {} rule(s) under {} trigger(s)",
        table.len(),
        table.trigger_count()
    )?;
    for (trigger, rules) in table.buckets() {
        let label = if trigger.is_empty() { "<always>".to_string() } else { format!("{trigger:?}") };
        writeln!(out, "  {label}: {} rule(s)", rules.len())?;
    }
    Ok(())
}
