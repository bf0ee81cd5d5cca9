use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use crate::conda::display_command;

/// Runs `python -m pip install` with the interpreter of an environment.
#[derive(Debug, Clone, Copy)]
pub struct PipInstaller<'a> {
    python: &'a Path,
    extra_args: &'a [String],
}

impl<'a> PipInstaller<'a> {
    /// Creates an installer that uses `python`, appending `extra_args` to
    /// every invocation.
    pub fn new(python: &'a Path, extra_args: &'a [String]) -> Self {
        Self { python, extra_args }
    }

    pub(crate) fn command<I, S>(&self, targets: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(self.python);
        command
            .args(["-m", "pip", "install"])
            .args(self.extra_args)
            .args(targets)
            .stdin(Stdio::null());
        command
    }

    /// Installs all `targets` (requirement specifiers or local directories)
    /// in a single pip invocation and returns how pip exited. Output is not
    /// captured.
    pub fn install<I, S>(&self, targets: I) -> std::io::Result<ExitStatus>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = self.command(targets);
        tracing::debug!("running `{}`", display_command(&command));
        command.status()
    }
}
