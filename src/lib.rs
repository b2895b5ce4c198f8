//! A minimal interactive command interpreter.
//!
//! Each cycle reads one line of input into a fixed-size [`LineBuffer`], splits
//! it into arguments and a background flag, and then either runs the `cd`
//! built-in or forks a child that execs the requested program. Foreground
//! children are waited for; background children are left running.
//!
//! The main entry point is [`Interpreter`]. The public modules [`command`],
//! [`lexer`] and [`io_adapters`] expose the tokenized line types, the
//! tokenizer itself and the input sources the read loop draws from.

mod builtin;
pub mod command;
mod config;
mod error;
mod external;
mod interpreter;
pub mod io_adapters;
mod jobs;
pub mod lexer;

pub use command::{ArgumentList, CommandIndex, CommandRecord, CycleOutcome, ExitCode};
pub use config::{MAX_LINE_LIMIT, ShellConfig};
pub use error::ShellError;
pub use external::describe_status;
pub use interpreter::Interpreter;
pub use jobs::JobRegistry;
pub use lexer::{LineBuffer, ReadOutcome};
