use nix::sys::wait::WaitStatus;
use nix::unistd::Pid;
use std::borrow::Cow;
use std::fmt;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// Ordered arguments of one command line.
///
/// Every argument is a view into the [`LineBuffer`](crate::lexer::LineBuffer)
/// it was tokenized from, so the list cannot outlive the next read into that
/// buffer. Arguments are never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentList<'buf> {
    args: Vec<&'buf [u8]>,
}

impl<'buf> ArgumentList<'buf> {
    pub(crate) fn from_views(args: Vec<&'buf [u8]>) -> Self {
        Self { args }
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Raw bytes of the argument at `index`.
    pub fn get(&self, index: usize) -> Option<&'buf [u8]> {
        self.args.get(index).copied()
    }

    /// The program or built-in name.
    pub fn argv0(&self) -> Option<&'buf [u8]> {
        self.get(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'buf [u8]> + '_ {
        self.args.iter().copied()
    }

    /// Arguments as text, replacing invalid UTF-8.
    pub fn to_lossy(&self) -> Vec<Cow<'buf, str>> {
        self.iter().map(String::from_utf8_lossy).collect()
    }

    /// Owned copies of the arguments, for callers that outlive the buffer.
    pub fn to_strings(&self) -> Vec<String> {
        self.iter()
            .map(|arg| String::from_utf8_lossy(arg).into_owned())
            .collect()
    }
}

/// One tokenized command line: its arguments and whether it runs in the background.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandRecord<'buf> {
    pub args: ArgumentList<'buf>,
    pub background: bool,
}

impl<'buf> CommandRecord<'buf> {
    pub fn argv0(&self) -> Option<&'buf [u8]> {
        self.args.argv0()
    }

    /// Arguments after argv0.
    pub fn rest(&self) -> impl Iterator<Item = &'buf [u8]> + '_ {
        self.args.iter().skip(1)
    }
}

/// What a single dispatch did.
///
/// Only used for reporting; no later cycle depends on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The line had no arguments.
    Empty,
    /// A built-in ran in-process.
    Builtin(ExitCode),
    /// A foreground child ran to completion.
    Foreground { pid: Pid, status: WaitStatus },
    /// A child was started and left running.
    Background { pid: Pid },
}

impl CycleOutcome {
    /// Whether the cycle ran a command, and so consumes a prompt index.
    pub fn ran_command(&self) -> bool {
        !matches!(self, CycleOutcome::Empty)
    }
}

/// Prompt counter, passed from one cycle to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CommandIndex(u64);

impl CommandIndex {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    /// The index for the following prompt.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for CommandIndex {
    fn default() -> Self {
        Self(1)
    }
}

impl fmt::Display for CommandIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
