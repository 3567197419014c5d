use std::io::{self, Stderr, Stdout, Write};
use tracing::warn;

/// Where commands report to: results on `write`, diagnostics on `write_err`.
pub trait OutErr {
    fn write_err(&mut self, s: &str);
    fn write(&mut self, s: &str);
}

/// Writes command output to a pair of sinks, stdout and stderr by default.
///
/// Every message is flushed as it is written so prompts appear before input
/// is read.
pub struct AuthWriter<O = Stdout, E = Stderr> {
    out: O,
    err: E,
}

impl AuthWriter {
    pub fn new() -> Self {
        AuthWriter::with_sinks(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> AuthWriter<O, E> {
    pub fn with_sinks(out: O, err: E) -> Self {
        AuthWriter { out, err }
    }
}

fn emit(sink: &mut impl Write, s: &str) -> io::Result<()> {
    sink.write_all(s.as_bytes())?;
    sink.flush()
}

impl<O: Write, E: Write> OutErr for AuthWriter<O, E> {
    fn write_err(&mut self, s: &str) {
        if let Err(err) = emit(&mut self.err, s) {
            warn!(error.message = %err, "unable to write to stderr");
        }
    }

    // A closed stdout (`authinator list | head -0`) must not abort the command.
    fn write(&mut self, s: &str) {
        if let Err(err) = emit(&mut self.out, s) {
            warn!(error.message = %err, "unable to write to stdout");
        }
    }
}
