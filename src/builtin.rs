use crate::command::{ArgumentList, ExitCode};
use crate::error::ShellError;
use std::env;
use std::ffi::OsStr;
use std::io::Write;
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;
use tracing::debug;

/// Built-in commands known to the shell at compile time.
///
/// A builtin takes its operands verbatim from the argument list and runs
/// in-process without spawning a child process.
pub(crate) trait BuiltinCommand: Sized {
    /// Canonical name of the command, e.g. "cd".
    fn name() -> &'static str;

    /// Build the command from its full argument list, argv0 included.
    fn from_args(args: &ArgumentList<'_>) -> Self;

    /// Executes the command, writing any regular output to `stdout`.
    ///
    /// Failures the shell should report are returned as errors.
    fn execute(self, stdout: &mut dyn Write) -> Result<ExitCode, ShellError>;
}

/// Run `args` as a built-in if argv0 names one.
///
/// Returns `None` when the command is not a built-in and must be executed
/// as an external program.
pub(crate) fn run_builtin(
    args: &ArgumentList<'_>,
    stdout: &mut dyn Write,
) -> Option<Result<ExitCode, ShellError>> {
    try_run::<Cd>(args, stdout)
}

fn try_run<T: BuiltinCommand>(
    args: &ArgumentList<'_>,
    stdout: &mut dyn Write,
) -> Option<Result<ExitCode, ShellError>> {
    if args.argv0()? != T::name().as_bytes() {
        return None;
    }
    Some(T::from_args(args).execute(stdout))
}

/// Change the working directory of the interpreter.
///
/// The first operand is used as the path as is, even if it looks like an
/// option. Operands after the first are ignored.
pub(crate) struct Cd {
    pub target: PathBuf,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn from_args(args: &ArgumentList<'_>) -> Self {
        // A missing operand is handed to chdir as an empty path, which fails.
        let operand = args.get(1).unwrap_or_default();
        Self {
            target: PathBuf::from(OsStr::from_bytes(operand)),
        }
    }

    fn execute(self, _stdout: &mut dyn Write) -> Result<ExitCode, ShellError> {
        env::set_current_dir(&self.target).map_err(|source| ShellError::ChangeDir {
            target: self.target.to_string_lossy().into_owned(),
            source,
        })?;
        debug!(dir = %self.target.display(), "changed working directory");
        Ok(0)
    }
}

/// Serializes tests that read or change the process working directory.
#[cfg(test)]
pub(crate) fn lock_current_dir() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};
    static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
    MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
