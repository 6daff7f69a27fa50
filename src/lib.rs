//! Run a command with an environment merged from `NAME=VALUE` sources.
//!
//! A source is an environment file, standard input (`-`), or the current
//! process environment (`@`). [`EnvLoader`] folds sources in order, later
//! sources overriding earlier ones, and [`Launch`] either prints the result
//! or replaces the current process with a command running under it.
//!
//! The file grammar is deliberately small: blank lines and lines starting
//! with `#` are ignored, every other line must be `NAME=VALUE` with a name
//! matching `[A-Za-z_][A-Za-z0-9_]*`. Values are taken verbatim.

mod env;
mod error;
mod launch;
mod loader;
mod model;
mod parser;

pub use env::HostEnv;
pub use error::{Error, ParseError, Result};
pub use launch::{Launch, Outcome, print_env, resolve_command};
pub use loader::{EnvLoader, load, load_file, load_reader, merge};
pub use model::{EnvMap, Entry, Origin, Source};
pub use parser::{Line, classify_line, parse_reader, parse_str};
