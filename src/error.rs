//! Error taxonomy for the transform/filter/remember pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort a run.
///
/// No variant is retried; each one is terminal for the run.
#[derive(Debug, Error)]
pub enum TfrError {
    /// One or more remap/filter specifications were malformed.
    ///
    /// All offending entries are collected before this is returned.
    #[error("{usage}\n{}", .problems.join("\n"))]
    SpecFormat {
        usage: &'static str,
        problems: Vec<String>,
    },

    /// The primary input stream failed for a reason other than end-of-input.
    #[error("couldn't read input: {0}")]
    Read(#[source] io::Error),

    /// The interactive terminal could not be opened, read or written.
    #[error("couldn't {action} for user input: {source}")]
    Terminal {
        action: &'static str,
        #[source]
        source: io::Error,
    },

    /// A filter-state file could not be created or written.
    #[error("couldn't write filter state to '{}': {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The primary output stream failed.
    #[error("couldn't write output: {0}")]
    Write(#[source] io::Error),

    /// The flags are individually valid but cannot be combined.
    #[error("{0}")]
    Usage(String),
}

impl TfrError {
    pub(crate) fn terminal(action: &'static str, source: io::Error) -> Self {
        TfrError::Terminal { action, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_format_lists_every_problem() {
        let err = TfrError::SpecFormat {
            usage: "usage line",
            problems: vec!["first".to_string(), "second".to_string()],
        };
        assert_eq!(err.to_string(), "usage line\nfirst\nsecond");
    }

    #[test]
    fn test_persistence_names_path() {
        let err = TfrError::Persistence {
            path: PathBuf::from("/nowhere/fout.txt"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/nowhere/fout.txt"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn test_terminal_names_action() {
        let err = TfrError::terminal("open TTY", io::Error::other("no tty"));
        assert_eq!(err.to_string(), "couldn't open TTY for user input: no tty");
    }
}
