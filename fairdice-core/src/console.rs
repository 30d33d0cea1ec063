use crate::{FairDiceError, Result};
use std::io::{BufRead, Write};
use std::ops::Range;

/// Interactive side of a match: asks the human for numbers and publishes
/// MACs, reveals and results.
pub trait Console {
    /// Block until a value inside `valid` is supplied. Any error aborts the match.
    fn prompt_integer(&mut self, message: &str, valid: Range<u64>) -> Result<u64>;

    fn announce(&mut self, message: &str);
}

/// Line-oriented console over any reader and writer.
///
/// Invalid or missing input aborts instead of re-prompting, which makes it
/// suitable for piped stdin and scripted tests.
pub struct LineConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> Console for LineConsole<R, W> {
    fn prompt_integer(&mut self, message: &str, valid: Range<u64>) -> Result<u64> {
        write!(self.output, "{}: ", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(FairDiceError::input_aborted("end of input"));
        }

        let answer = line.trim();
        let value: u64 = answer.parse().map_err(|_| {
            FairDiceError::input_aborted(format!("'{}' is not a number", answer))
        })?;

        if !valid.contains(&value) {
            return Err(FairDiceError::input_aborted(format!(
                "{} is outside {}..{}",
                value, valid.start, valid.end
            )));
        }

        Ok(value)
    }

    fn announce(&mut self, message: &str) {
        if let Err(e) = writeln!(self.output, "{}", message) {
            tracing::warn!("Failed to write to console: {}", e);
        }
    }
}
