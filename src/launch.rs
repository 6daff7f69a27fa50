use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use log::debug;

use crate::error::{Error, Result};
use crate::loader::EnvLoader;
use crate::model::EnvMap;

/// How a [`Launch`] finished, when it returns at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The combined environment was written out.
    Printed,
    /// The command ran as a child process and exited with this code.
    ///
    /// Only produced where the process image cannot be replaced in place.
    Exited(i32),
}

/// Assemble an environment, then print it or hand it to a command.
#[derive(Debug, Clone)]
pub struct Launch {
    loader: EnvLoader,
    command: Option<OsString>,
    args: Vec<OsString>,
}

impl Launch {
    pub fn new(loader: EnvLoader) -> Self {
        Self {
            loader,
            command: None,
            args: Vec::new(),
        }
    }

    /// Command to run. An empty command means print mode.
    pub fn command(mut self, command: impl Into<OsString>) -> Self {
        let command = command.into();
        self.command = (!command.is_empty()).then_some(command);
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the invocation.
    ///
    /// The host environment is captured once, up front. Every source is loaded
    /// before anything is written or executed, so a bad source leaves `out`
    /// untouched. On unix a successful launch never returns.
    pub fn run<W: Write>(self, out: &mut W) -> Result<Outcome> {
        let snapshot = self.loader.host_env().snapshot();
        let combined = self.loader.assemble_from(&snapshot)?;

        let Some(command) = self.command else {
            print_env(&combined, out).map_err(Error::Output)?;
            return Ok(Outcome::Printed);
        };

        let program = resolve_command(&command, &snapshot)?;
        debug!(
            "launching {} with {} variable(s)",
            program.display(),
            combined.len()
        );

        let mut child = Command::new(&program);
        child.args(&self.args).env_clear().envs(&combined);
        replace_process(child, program)
    }
}

/// Write `NAME=VALUE` lines, one per variable.
pub fn print_env<W: Write>(env: &EnvMap, out: &mut W) -> std::io::Result<()> {
    for (key, value) in env {
        write_os_str(out, key)?;
        out.write_all(b"=")?;
        write_os_str(out, value)?;
        out.write_all(b"\n")?;
    }
    out.flush()
}

#[cfg(unix)]
fn write_os_str<W: Write>(out: &mut W, value: &OsStr) -> std::io::Result<()> {
    use std::os::unix::ffi::OsStrExt;

    out.write_all(value.as_bytes())
}

#[cfg(not(unix))]
fn write_os_str<W: Write>(out: &mut W, value: &OsStr) -> std::io::Result<()> {
    out.write_all(value.to_string_lossy().as_bytes())
}

/// Find `command` on the `PATH` recorded in `snapshot`.
///
/// Commands containing a path separator are resolved relative to the current
/// directory instead.
pub fn resolve_command(command: &OsStr, snapshot: &EnvMap) -> Result<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    which::which_in(command, snapshot.get(OsStr::new("PATH")), cwd).map_err(|source| {
        Error::CommandNotFound {
            command: command.to_string_lossy().into_owned(),
            source,
        }
    })
}

#[cfg(unix)]
fn replace_process(mut command: Command, program: PathBuf) -> Result<Outcome> {
    use std::os::unix::process::CommandExt;

    let source = command.exec();
    Err(Error::Exec { program, source })
}

#[cfg(not(unix))]
fn replace_process(mut command: Command, program: PathBuf) -> Result<Outcome> {
    let status = command
        .status()
        .map_err(|source| Error::Exec { program, source })?;
    Ok(Outcome::Exited(status.code().unwrap_or(1)))
}
