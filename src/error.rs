//! Error taxonomy of the interpreter.

use nix::errno::Errno;
use nix::unistd::Pid;
use rustyline::error::ReadlineError;
use std::io;
use thiserror::Error;

/// Everything that can go wrong while reading or running a command line.
///
/// Some failures end the whole interpreter, others only the current cycle;
/// see [`ShellError::is_fatal`].
#[derive(Debug, Error)]
pub enum ShellError {
    /// The raw input stream could not be read.
    #[error("error reading the command")]
    ReadInput(#[source] io::Error),

    /// The line editor failed for a reason other than end of input.
    #[error("error reading the command")]
    Editor(#[from] ReadlineError),

    /// No new process could be created.
    #[error("Fork failed")]
    Fork(#[source] Errno),

    /// Waiting for a foreground child failed.
    #[error("wait for process {pid} failed: {source}")]
    Wait { pid: Pid, source: Errno },

    /// `cd` could not switch to the requested directory.
    #[error("Error, {target:?} is not a proper directory: {source}")]
    ChangeDir { target: String, source: io::Error },

    /// Rejected run configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Writing to the interpreter's own output failed.
    #[error("cannot write output")]
    Output(#[from] io::Error),
}

impl ShellError {
    /// Whether the error terminates the interpreter rather than the cycle.
    pub fn is_fatal(&self) -> bool {
        match self {
            ShellError::ReadInput(_)
            | ShellError::Editor(_)
            | ShellError::Fork(_)
            | ShellError::Config(_)
            | ShellError::Output(_) => true,
            ShellError::Wait { .. } | ShellError::ChangeDir { .. } => false,
        }
    }
}
