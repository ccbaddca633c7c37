//! Interactive resolution of rows no rule decides.
//!
//! The operator sees the raw row and answers `y` or `n` on the terminal.
//! The answer is remembered by adding the row's value in the interactive
//! column to the include- or exclude-set, so later rows with the same
//! value are decided without asking again.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

use crate::error::TfrError;
use crate::filter::{Decision, FilterSet};

#[cfg(unix)]
pub const TTY_PATH: &str = "/dev/tty";
#[cfg(windows)]
pub const TTY_PATH: &str = "CONIN$";
#[cfg(not(any(unix, windows)))]
compile_error!("interactive filtering needs a terminal device; only unix and windows are supported");

pub const PROMPT: &str = "y/n ";
pub const ACCEPT_MARK: &str = "✓\n";
pub const REJECT_MARK: &str = "✕\n";

/// Request/response port to the operator.
pub trait Prompter {
    /// Show `text` and block until one byte of response arrives.
    fn ask(&mut self, text: &str) -> Result<u8, TfrError>;

    /// Show an acknowledgment of the last answer.
    fn acknowledge(&mut self, text: &str) -> Result<(), TfrError>;
}

impl<P: Prompter + ?Sized> Prompter for Box<P> {
    fn ask(&mut self, text: &str) -> Result<u8, TfrError> {
        (**self).ask(text)
    }

    fn acknowledge(&mut self, text: &str) -> Result<(), TfrError> {
        (**self).acknowledge(text)
    }
}

/// Prompts on a diagnostic stream and reads answers from a terminal device.
pub struct TtyPrompter<W: Write> {
    tty: File,
    diagnostic: W,
}

impl TtyPrompter<io::Stderr> {
    /// Open the controlling terminal, prompting on stderr.
    pub fn open() -> Result<Self, TfrError> {
        Self::with_diagnostic(TTY_PATH, io::stderr())
    }
}

impl<W: Write> TtyPrompter<W> {
    pub fn with_diagnostic(path: impl AsRef<Path>, diagnostic: W) -> Result<Self, TfrError> {
        let tty = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path.as_ref())
            .map_err(|e| TfrError::terminal("open TTY", e))?;
        Ok(Self { tty, diagnostic })
    }

    fn show(&mut self, text: &str) -> Result<(), TfrError> {
        self.diagnostic
            .write_all(text.as_bytes())
            .and_then(|()| self.diagnostic.flush())
            .map_err(|e| TfrError::terminal("write prompt", e))
    }
}

impl<W: Write> Prompter for TtyPrompter<W> {
    /// Show `text`, then take the first byte of the next read from the
    /// terminal.
    ///
    /// A line-buffered terminal delivers a whole line per read and the rest
    /// of that line is discarded, so typing `xxn` and Enter counts as one
    /// invalid answer (`x`) and asks again rather than resolving to `n`.
    fn ask(&mut self, text: &str) -> Result<u8, TfrError> {
        self.show(text)?;

        let mut buf = [0u8; 1024];
        let n = self
            .tty
            .read(&mut buf)
            .map_err(|e| TfrError::terminal("read TTY", e))?;
        if n == 0 {
            return Err(TfrError::terminal(
                "read TTY",
                io::Error::new(io::ErrorKind::UnexpectedEof, "terminal closed"),
            ));
        }
        Ok(buf[0])
    }

    fn acknowledge(&mut self, text: &str) -> Result<(), TfrError> {
        self.show(text)
    }
}

/// Drives the y/n loop for undecided rows.
pub struct Resolver<P> {
    prompter: P,
    column: usize,
}

impl<P: Prompter> Resolver<P> {
    /// `column` is the field whose value gets remembered.
    pub fn new(prompter: P, column: usize) -> Self {
        Self { prompter, column }
    }

    /// Ask about `line` until the operator answers `y` or `n`.
    ///
    /// Rows too narrow to have the interactive column are dropped without
    /// asking. Any other byte, including whitespace, asks again.
    pub fn resolve(
        &mut self,
        line: &str,
        row: &[&str],
        exclude: &mut FilterSet,
        include: &mut FilterSet,
    ) -> Result<Decision, TfrError> {
        let Some(value) = row.get(self.column) else {
            log::warn!(
                "row has {} fields, interactive column {} is missing, dropping: {line}",
                row.len(),
                self.column
            );
            return Ok(Decision::Excluded);
        };
        let value = value.trim();
        let column = self.column as i64;

        let mut answer = self.prompter.ask(&format!("{line}\n{PROMPT}"))?;
        loop {
            match answer {
                b'y' => {
                    include.insert(column, value);
                    self.prompter.acknowledge(ACCEPT_MARK)?;
                    log::debug!("operator included {column}={value}");
                    return Ok(Decision::Included);
                }
                b'n' => {
                    exclude.insert(column, value);
                    self.prompter.acknowledge(REJECT_MARK)?;
                    log::debug!("operator excluded {column}={value}");
                    return Ok(Decision::Excluded);
                }
                _ => answer = self.prompter.ask(PROMPT)?,
            }
        }
    }
}

/// Replays canned answers and records everything shown.
#[cfg(test)]
pub(crate) struct ScriptedPrompter {
    pub answers: std::collections::VecDeque<u8>,
    pub asked: Vec<String>,
    pub acknowledged: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new(answers: &[u8]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            asked: Vec::new(),
            acknowledged: Vec::new(),
        }
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn ask(&mut self, text: &str) -> Result<u8, TfrError> {
        self.asked.push(text.to_string());
        self.answers.pop_front().ok_or_else(|| {
            TfrError::terminal(
                "read TTY",
                io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"),
            )
        })
    }

    fn acknowledge(&mut self, text: &str) -> Result<(), TfrError> {
        self.acknowledged.push(text.to_string());
        Ok(())
    }
}
