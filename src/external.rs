use crate::command::ArgumentList;
use crate::error::ShellError;
use nix::errno::Errno;
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{ForkResult, Pid, execvp, fork};
use std::ffi::CString;
use std::io::{self, Write};
use tracing::debug;

/// Command that is not a builtin.
///
/// The program is looked up by `execvp` in the child, using the inherited
/// `PATH`; no lookup happens in the interpreter itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    argv: Vec<CString>,
}

impl ExternalCommand {
    /// Build the exec argv from a tokenized argument list.
    ///
    /// Returns `None` for an empty list or an argument holding a NUL byte.
    /// Neither comes out of the tokenizer, so only direct callers see it.
    pub fn new(args: &ArgumentList<'_>) -> Option<Self> {
        let argv = args
            .iter()
            .map(|arg| CString::new(arg).ok())
            .collect::<Option<Vec<_>>>()?;
        (!argv.is_empty()).then_some(Self { argv })
    }

    pub fn name(&self) -> String {
        self.argv[0].to_string_lossy().into_owned()
    }

    /// Fork a child that replaces itself with the command.
    ///
    /// Returns the child's pid in the parent. If exec fails, the child
    /// reports the error and exits with status 1; the parent never sees it
    /// except through the child's exit status.
    pub fn spawn(&self) -> Result<Pid, ShellError> {
        let program = &self.argv[0];
        let name = self.name();

        // Anything still buffered would otherwise be written twice.
        io::stdout().flush()?;

        // SAFETY: the interpreter is single-threaded, and the child only
        // calls exec or reports the failure and exits.
        match unsafe { fork() } {
            Ok(ForkResult::Parent { child }) => {
                debug!(pid = %child, command = %name, "forked child");
                Ok(child)
            }
            Ok(ForkResult::Child) => {
                let errno = match execvp(program, &self.argv) {
                    Ok(never) => match never {},
                    Err(errno) => errno,
                };
                let _ = writeln!(io::stderr(), "Error, {name} is not a correct command: {errno}");
                std::process::exit(1)
            }
            Err(errno) => Err(ShellError::Fork(errno)),
        }
    }
}

/// Block until the given child exits or is killed.
pub fn wait_for(pid: Pid) -> Result<WaitStatus, ShellError> {
    let status = waitpid(pid, None).map_err(|source| ShellError::Wait { pid, source })?;
    debug!(%pid, ?status, "child changed state");
    Ok(status)
}

/// Short human-readable summary of how a child ended.
pub fn describe_status(status: &WaitStatus) -> String {
    match status {
        WaitStatus::Exited(_, 0) => "Done".to_string(),
        WaitStatus::Exited(_, code) => format!("Exit {code}"),
        WaitStatus::Signaled(_, signal, _) => format!("Killed by {}", signal.as_str()),
        other => format!("{other:?}"),
    }
}

/// Whether `errno` means the pid is not (or no longer) a child of ours.
pub(crate) fn is_gone(errno: Errno) -> bool {
    errno == Errno::ECHILD
}
