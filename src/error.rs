use std::path::PathBuf;

use thiserror::Error;

use crate::model::Origin;

/// Fatal failures while assembling an environment or launching a command.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open environment file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read {origin}: {source}")]
    Read {
        origin: Origin,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Syntax(#[from] ParseError),
    #[error("command not found: {command}: {source}")]
    CommandNotFound {
        command: String,
        #[source]
        source: which::Error,
    },
    #[error("failed to write environment: {0}")]
    Output(#[source] std::io::Error),
    #[error("failed to execute {}: {source}", .program.display())]
    Exec {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A line that is neither ignored nor a valid `NAME=VALUE` entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("environment file syntax error {origin}:{line}")]
pub struct ParseError {
    pub origin: Origin,
    pub line: u32,
}

impl ParseError {
    pub(crate) fn new(origin: Origin, line: u32) -> Self {
        Self { origin, line }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
