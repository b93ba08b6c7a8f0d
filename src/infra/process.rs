//! External process execution
//!
//! Tool invocations go through [`CommandRunner`] so the splitting logic can be
//! exercised without spawning binutils.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::SplitterError;

/// A fully specified tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    /// Resolved path of the executable
    pub program: PathBuf,
    /// Arguments, in order
    pub args: Vec<OsString>,
}

impl ToolCommand {
    /// Create a command with no arguments
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument
    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Append several arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Program followed by arguments, lossily converted to strings
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(|s| s.to_string_lossy().into_owned())
            .collect()
    }

    /// Shell-quoted command line, suitable for logs and error messages
    pub fn display(&self) -> String {
        self.argv()
            .iter()
            .map(|s| shell_quote(s))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Quote a word for a POSIX shell, leaving plain words untouched
pub fn shell_quote(word: &str) -> String {
    if word.is_empty() {
        return "''".to_string();
    }

    let plain = word
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "@%+=:,./_-".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r#"'"'"'"#))
    }
}

/// Executes tool commands
pub trait CommandRunner: Send + Sync {
    /// Run `command` to completion. A nonzero exit is an error.
    fn run(&self, command: &ToolCommand) -> Result<(), SplitterError>;
}

/// Runs commands as child processes, inheriting stdio and blocking until exit
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ToolCommand) -> Result<(), SplitterError> {
        let status = Command::new(&command.program)
            .args(&command.args)
            .status()
            .map_err(|e| SplitterError::Spawn {
                command: command.display(),
                error: e.to_string(),
            })?;

        if status.success() {
            return Ok(());
        }

        match status.code() {
            Some(code) => Err(SplitterError::ToolFailed {
                command: command.display(),
                code,
            }),
            None => Err(SplitterError::ToolTerminated {
                command: command.display(),
            }),
        }
    }
}

/// Check whether `path` looks runnable
pub fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}
