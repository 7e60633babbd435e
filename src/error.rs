//! Error types for each stage of running a command line.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors found while splitting a word list into an invocation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyntaxError {
    /// A redirection operator was the last word on the line.
    #[error("parse error near `\\n'")]
    MissingRedirectTarget { operator: String },
    /// Nothing was left to run once the line was expanded.
    #[error("empty command")]
    EmptyCommand,
}

/// Errors from looking a command name up on the search path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("{0}: command not found")]
    NotFound(String),
    #[error("{0}: permission denied")]
    PermissionDenied(String),
}

/// Errors from opening a redirection target.
#[derive(Debug, Error)]
pub enum RedirectError {
    #[error("{file}: {source}")]
    Open {
        file: String,
        #[source]
        source: io::Error,
    },
    #[error("{file}: cannot share file handle between streams: {source}")]
    Share {
        file: String,
        #[source]
        source: io::Error,
    },
}

/// Errors from launching an external program.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("{}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: failed waiting for process: {source}", .program.display())]
    Wait {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Redirect(#[from] RedirectError),
}
