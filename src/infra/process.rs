//! Subprocess execution
//!
//! All external tools (git, python, the editor CLI) go through these
//! helpers. Output is suppressed unless the run is verbose, matching the
//! tool's quiet-by-default terminal behavior.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use thiserror::Error;

/// Subprocess errors
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The command could not be spawned at all
    #[error("Failed to run '{command}': {error}")]
    Spawn { command: String, error: String },

    /// The command ran and exited unsuccessfully
    #[error("Command '{command}' failed with {status}")]
    Failed { command: String, status: String },
}

fn render<I, S>(program: &str, args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut parts = vec![program.to_string()];
    parts.extend(
        args.into_iter()
            .map(|a| a.as_ref().to_string_lossy().into_owned()),
    );
    parts.join(" ")
}

/// Run a command to completion, checking its exit status
///
/// Stdout and stderr are inherited when `verbose`, discarded otherwise.
pub fn run<I, S>(program: &str, args: I, cwd: Option<&Path>, verbose: bool) -> Result<(), ProcessError>
where
    I: IntoIterator<Item = S> + Clone,
    S: AsRef<OsStr>,
{
    let command = render(program, args.clone());
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    if !verbose {
        cmd.stdout(Stdio::null()).stderr(Stdio::null());
    }

    let status = cmd.status().map_err(|e| ProcessError::Spawn {
        command: command.clone(),
        error: e.to_string(),
    })?;

    if status.success() {
        Ok(())
    } else {
        Err(ProcessError::Failed {
            command,
            status: status.to_string(),
        })
    }
}

/// Run a command and capture its output, checking the exit status
pub fn output<I, S>(program: &str, args: I, cwd: Option<&Path>) -> Result<Output, ProcessError>
where
    I: IntoIterator<Item = S> + Clone,
    S: AsRef<OsStr>,
{
    let out = output_unchecked(program, args.clone(), cwd)?;
    if out.status.success() {
        Ok(out)
    } else {
        Err(ProcessError::Failed {
            command: render(program, args),
            status: out.status.to_string(),
        })
    }
}

/// Run a command and capture its output without checking the exit status
///
/// Used where a non-zero exit is part of the protocol (stash pop).
pub fn output_unchecked<I, S>(
    program: &str,
    args: I,
    cwd: Option<&Path>,
) -> Result<Output, ProcessError>
where
    I: IntoIterator<Item = S> + Clone,
    S: AsRef<OsStr>,
{
    let command = render(program, args.clone());
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    cmd.output().map_err(|e| ProcessError::Spawn {
        command,
        error: e.to_string(),
    })
}
