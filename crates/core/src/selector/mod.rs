//! Interactive choice of a result index.
//!
//! The selector keeps prompting until a line parses to an index inside the
//! ranked list. It reads from any [`BufRead`] and writes prompts to any
//! [`Write`], so it runs the same against a terminal or an in-memory buffer.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::{debug, warn};

/// Consecutive read errors after which input is considered gone.
pub const DEFAULT_MAX_READ_ERRORS: usize = 5;

const PROMPT: &str = "Please select a torrent to download (enter its index): ";
const READ_RETRY: &str = "Could not read your input, please try again (should be an integer):";
const PARSE_RETRY: &str = "Please enter an integer:";

/// Errors that stop the selection.
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("Input closed before a torrent was selected")]
    InputExhausted,

    #[error("There is nothing to select from")]
    NothingToSelect,

    #[error("Failed to write prompt: {0}")]
    Output(#[source] io::Error),
}

/// Outcome of reading one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Selected(usize),
    ReadFailed,
    NotAnInteger,
    OutOfRange,
    Closed,
}

/// Line-based index prompt.
pub struct Selector<R, W> {
    input: R,
    output: W,
    max_read_errors: usize,
}

impl<R: BufRead, W: Write> Selector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            max_read_errors: DEFAULT_MAX_READ_ERRORS,
        }
    }

    /// Give up after `max` consecutive read errors (at least 1).
    pub fn with_max_read_errors(mut self, max: usize) -> Self {
        self.max_read_errors = max.max(1);
        self
    }

    /// Prompt until the user enters an index in `0..len`.
    pub fn select(&mut self, len: usize) -> Result<usize, SelectionError> {
        if len == 0 {
            return Err(SelectionError::NothingToSelect);
        }

        self.say(PROMPT)?;
        let mut read_errors = 0;

        loop {
            match self.attempt(len) {
                Attempt::Selected(index) => {
                    debug!(index = index, "Torrent selected");
                    return Ok(index);
                }
                Attempt::Closed => return Err(SelectionError::InputExhausted),
                Attempt::ReadFailed => {
                    read_errors += 1;
                    if read_errors >= self.max_read_errors {
                        return Err(SelectionError::InputExhausted);
                    }
                    self.say(READ_RETRY)?;
                }
                Attempt::NotAnInteger => {
                    read_errors = 0;
                    self.say(PARSE_RETRY)?;
                }
                Attempt::OutOfRange => {
                    read_errors = 0;
                    self.say(&format!(
                        "Please enter an index between 0 and {}:",
                        len - 1
                    ))?;
                }
            }
        }
    }

    /// Consume the selector, returning its reader and writer.
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn attempt(&mut self, len: usize) -> Attempt {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => Attempt::Closed,
            Ok(_) => parse_index(&line, len),
            // The bad line was consumed; the stream itself is fine
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                debug!(error = %e, "Selection is not valid UTF-8");
                Attempt::NotAnInteger
            }
            Err(e) => {
                warn!(error = %e, "Failed to read selection");
                Attempt::ReadFailed
            }
        }
    }

    fn say(&mut self, message: &str) -> Result<(), SelectionError> {
        writeln!(self.output, "{}", message)
            .and_then(|_| self.output.flush())
            .map_err(SelectionError::Output)
    }
}

fn parse_index(line: &str, len: usize) -> Attempt {
    match line.trim().parse::<i64>() {
        Err(_) => Attempt::NotAnInteger,
        Ok(n) if n < 0 => Attempt::OutOfRange,
        Ok(n) => match usize::try_from(n) {
            Ok(index) if index < len => Attempt::Selected(index),
            _ => Attempt::OutOfRange,
        },
    }
}
