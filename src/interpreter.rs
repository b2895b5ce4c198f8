use crate::builtin;
use crate::command::{CommandIndex, CommandRecord, CycleOutcome};
use crate::config::ShellConfig;
use crate::error::ShellError;
use crate::external::{self, ExternalCommand, describe_status};
use crate::io_adapters::LineSource;
use crate::jobs::JobRegistry;
use crate::lexer::{LineBuffer, ReadOutcome};
use std::io::Write;
use tracing::{debug, info};

/// A minimal interactive interpreter that runs the `cd` built-in and external programs.
///
/// Each cycle reads one line, tokenizes it and dispatches it. Cycles share
/// nothing but the line buffer and the prompt index.
///
/// Example
/// ```
/// use minishell::{CycleOutcome, Interpreter, LineBuffer};
/// let mut sh = Interpreter::default();
/// let mut line = LineBuffer::from_bytes(b"   \n", 80);
/// let outcome = sh.dispatch(&line.tokenize(), &mut Vec::<u8>::new()).unwrap();
/// assert_eq!(outcome, CycleOutcome::Empty);
/// ```
pub struct Interpreter {
    config: ShellConfig,
    jobs: Option<JobRegistry>,
}

impl Interpreter {
    /// Create an interpreter, rejecting an invalid configuration.
    pub fn new(config: ShellConfig) -> Result<Self, ShellError> {
        config.validate()?;
        let jobs = config.reap_background.then(JobRegistry::new);
        Ok(Self { config, jobs })
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Background children still tracked, if reaping is enabled.
    pub fn jobs(&self) -> Option<&JobRegistry> {
        self.jobs.as_ref()
    }

    /// Run one tokenized command line.
    ///
    /// Built-ins write their regular output to `stdout`. Errors are returned
    /// to the caller, which decides from [`ShellError::is_fatal`] whether
    /// the interpreter can go on.
    pub fn dispatch(
        &mut self,
        cmd: &CommandRecord<'_>,
        stdout: &mut dyn Write,
    ) -> Result<CycleOutcome, ShellError> {
        if cmd.args.is_empty() {
            return Ok(CycleOutcome::Empty);
        }

        if let Some(result) = builtin::run_builtin(&cmd.args, stdout) {
            let code = result?;
            debug!(code, "builtin finished");
            return Ok(CycleOutcome::Builtin(code));
        }

        let Some(command) = ExternalCommand::new(&cmd.args) else {
            return Ok(CycleOutcome::Empty);
        };
        let pid = command.spawn()?;
        if cmd.background {
            info!(%pid, command = %command.name(), "running in background");
            if let Some(jobs) = &mut self.jobs {
                jobs.track(pid);
            }
            return Ok(CycleOutcome::Background { pid });
        }

        let status = external::wait_for(pid)?;
        Ok(CycleOutcome::Foreground { pid, status })
    }

    /// Read-eval loop: prompt, read, tokenize, dispatch, until input ends.
    ///
    /// Returns `Ok(())` once the input is exhausted. Recoverable errors are
    /// written to `stderr` and the loop goes on; fatal ones are returned.
    pub fn repl(
        &mut self,
        source: &mut dyn LineSource,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<(), ShellError> {
        let mut line = LineBuffer::with_capacity(self.config.max_line);
        let mut index = CommandIndex::default();

        loop {
            self.report_finished_jobs(stdout)?;

            let prompt = self.config.prompt(index);
            if source.read_line(&prompt, &mut line)? == ReadOutcome::EndOfInput {
                write!(stdout, "\n\nProgram use terminated.\n\n")?;
                stdout.flush()?;
                info!("end of input");
                return Ok(());
            }

            let cmd = line.tokenize();
            debug!(args = ?cmd.args.to_lossy(), background = cmd.background, "tokenized line");
            if self.config.show_args {
                show_args(&cmd, stdout)?;
            }

            index = match self.dispatch(&cmd, stdout) {
                Ok(outcome) if outcome.ran_command() => index.next(),
                Ok(_) => index,
                Err(err) if err.is_fatal() => {
                    debug!(%err, "giving up");
                    return Err(err);
                }
                Err(err) => {
                    writeln!(stderr, "{err}")?;
                    index.next()
                }
            };
        }
    }

    fn report_finished_jobs(&mut self, stdout: &mut dyn Write) -> Result<(), ShellError> {
        let Some(jobs) = &mut self.jobs else {
            return Ok(());
        };
        for (pid, status) in jobs.reap() {
            writeln!(stdout, "[{pid}] {}", describe_status(&status))?;
        }
        Ok(())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self {
            config: ShellConfig::default(),
            jobs: None,
        }
    }
}

fn show_args(cmd: &CommandRecord<'_>, stdout: &mut dyn Write) -> Result<(), ShellError> {
    for (i, arg) in cmd.args.to_lossy().iter().enumerate() {
        writeln!(stdout, "args {i}: {arg}")?;
    }
    writeln!(stdout, "backgr: {}\n", u8::from(cmd.background))?;
    Ok(())
}
