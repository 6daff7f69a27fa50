use std::collections::BTreeMap;
use std::convert::Infallible;
use std::ffi::OsString;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

/// Variable name to value. Iteration order carries no meaning for callers.
///
/// Names and values are kept as OS strings so host variables that are not
/// valid UTF-8 pass through to a launched command byte for byte.
pub type EnvMap = BTreeMap<OsString, OsString>;

/// A parsed `NAME=VALUE` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
    pub line: u32,
}

/// One origin of environment definitions.
///
/// Later sources in a list override earlier ones on key collision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// An environment file on disk.
    File(PathBuf),
    /// The process's standard input, written as `-`.
    Stdin,
    /// The invoking process's environment, written as `@`.
    CurrentEnvironment,
}

impl Source {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }
}

impl FromStr for Source {
    type Err = Infallible;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Ok(match token {
            "-" => Self::Stdin,
            "@" => Self::CurrentEnvironment,
            path => Self::File(PathBuf::from(path)),
        })
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdin => write!(f, "-"),
            Self::CurrentEnvironment => write!(f, "@"),
        }
    }
}

/// Where a parsed line came from, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Absolute path of an environment file.
    File(PathBuf),
    Stdin,
    /// Text parsed directly from memory.
    Inline,
}

impl Display for Origin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdin => write!(f, "<stdin>"),
            Self::Inline => write!(f, "<input>"),
        }
    }
}
