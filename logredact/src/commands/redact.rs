// logredact/src/commands/redact.rs
//! `redact` command: streams input through the engine line by line.

use anyhow::{Context, Result};
use log::{debug, info};
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

use logredact_core::RedactionEngine;

use crate::cli::RedactCommand;
use crate::commands::load_engine;

/// Runs the `redact` command against stdin/stdout or the files it names.
pub fn run_redact(cmd: &RedactCommand) -> Result<()> {
    let engine = load_engine(&cmd.rules)?;
    info!("Starting logredact operation.");

    let reader: Box<dyn BufRead> = match &cmd.input_file {
        Some(path) => {
            debug!("Reading input from file: {}", path.display());
            let file = File::open(path).with_context(|| format!("Failed to open input file {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(io::stdin().lock())),
    };

    let writer: Box<dyn Write> = match &cmd.output {
        Some(path) => {
            debug!("Writing output to file: {}", path.display());
            let file =
                File::create(path).with_context(|| format!("Failed to create output file {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let lines = redact_stream(&engine, reader, writer, cmd.line_buffered)?;
    info!("Redacted {} line(s).", lines);
    Ok(())
}

/// Redacts every line of `reader` into `writer`, keeping line endings as
/// they were. Returns the number of lines processed.
///
/// Lines need not be valid UTF-8. Invalid sequences are decoded lossily for
/// matching. A line no rule touched is written back byte for byte.
pub fn redact_stream<R: BufRead, W: Write>(
    engine: &dyn RedactionEngine,
    mut reader: R,
    mut writer: W,
    line_buffered: bool,
) -> Result<usize> {
    let mut line = Vec::new();
    let mut count = 0;

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).context("Failed to read input")? == 0 {
            break;
        }
        let body_len = line
            .iter()
            .rposition(|b| *b != b'\n' && *b != b'\r')
            .map_or(0, |i| i + 1);
        let (body, ending) = line.split_at(body_len);

        let text = String::from_utf8_lossy(body);
        match engine.redact(&text) {
            Cow::Borrowed(_) => writer.write_all(body)?,
            Cow::Owned(redacted) => writer.write_all(redacted.as_bytes())?,
        }
        writer.write_all(ending)?;
        if line_buffered {
            writer.flush().context("Failed to flush output")?;
        }
        count += 1;
    }

    writer.flush().context("Failed to flush output")?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use logredact_core::TriggerEngine;

    #[test]
    fn test_redact_stream_preserves_line_endings() {
        let engine = TriggerEngine::from_triples(r"SSN::\d{3}-\d{2}-\d{4}::XXX-XX-XXXX").unwrap();
        let input = "SSN 123-45-6789\r\nplain\nSSN 987-65-4321";
        let mut out = Vec::new();

        let count = redact_stream(&engine, input.as_bytes(), &mut out, false).unwrap();
        assert_eq!(count, 3);
        assert_eq!(String::from_utf8(out).unwrap(), "SSN XXX-XX-XXXX\r\nplain\nSSN XXX-XX-XXXX");
    }

    #[test_log::test]
    fn test_redact_stream_survives_invalid_utf8() {
        let engine = TriggerEngine::from_triples(r"SSN::\d{3}-\d{2}-\d{4}::XXX-XX-XXXX").unwrap();
        let input: &[u8] = b"SSN 123-45-6789\nbad \xff byte\nSSN 987-65-4321 \xfe\nSSN 555-12-3456\n";
        let mut out = Vec::new();

        let count = redact_stream(&engine, input, &mut out, false).unwrap();
        assert_eq!(count, 4);

        let mut expected = b"SSN XXX-XX-XXXX\nbad \xff byte\n".to_vec();
        expected.extend_from_slice("SSN XXX-XX-XXXX \u{FFFD}\nSSN XXX-XX-XXXX\n".as_bytes());
        assert_eq!(out, expected);
    }

    #[test]
    fn test_redact_stream_empty_input() {
        let engine = TriggerEngine::empty();
        let mut out = Vec::new();
        assert_eq!(redact_stream(&engine, "".as_bytes(), &mut out, true).unwrap(), 0);
        assert!(out.is_empty());
    }
}
