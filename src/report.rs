use std::io::{self, Write};

use crate::compare::Outcome;
use crate::grader::Verdict;

/// Writes one line per verdict: successes to `out`, everything else to `err`.
pub struct Reporter<O: Write, E: Write> {
    out: O,
    err: E,
    debug: bool,
}

impl Reporter<io::Stdout, io::Stderr> {
    pub fn console(debug: bool) -> Self {
        Self::new(io::stdout(), io::stderr(), debug)
    }
}

impl<O: Write, E: Write> Reporter<O, E> {
    pub fn new(out: O, err: E, debug: bool) -> Self {
        Self { out, err, debug }
    }

    pub fn report(&mut self, verdict: &Verdict) -> io::Result<()> {
        let i = verdict.ordinal;
        match &verdict.outcome {
            Outcome::Passed => writeln!(self.out, "Query {i}: Success!")?,
            Outcome::Failed(reason) => writeln!(self.err, "Query {i}: FAIL: {reason}")?,
            Outcome::Missing => writeln!(self.err, "Missing submission for query {i}")?,
        }

        if self.debug && !verdict.outcome.is_passed() {
            writeln!(self.err, "{:#?}", verdict)?;
        }
        Ok(())
    }

    /// Setup failures go to `out`. Debug mode prints the full error and its
    /// causes instead of the one-line message.
    pub fn report_setup_error(&mut self, error: &crate::GraderError) -> io::Result<()> {
        if !self.debug {
            return writeln!(self.out, "{error}");
        }

        writeln!(self.out, "{error:?}")?;
        let mut source = std::error::Error::source(error);
        while let Some(cause) = source {
            writeln!(self.out, "Caused by: {cause}")?;
            source = cause.source();
        }
        Ok(())
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}
