use anyhow::Context;
use argh::FromArgs;
use minishell::lexer::DEFAULT_MAX_LINE;
use minishell::{Interpreter, ShellConfig, io_adapters};
use std::env;
use std::io;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(FromArgs)]
/// A minimal interactive command interpreter.
///
/// Reads one command per line from standard input. `cd <dir>` is built in;
/// everything else runs as an external program. A `&` anywhere in the line
/// runs the command in the background.
struct Options {
    #[argh(option, default = "DEFAULT_MAX_LINE")]
    /// maximum number of bytes read for one command line
    max_line: usize,

    #[argh(switch)]
    /// print the parsed arguments before running each command
    show_args: bool,

    #[argh(switch)]
    /// collect finished background commands and report them before each prompt
    reap_background: bool,

    #[argh(option, default = "String::from(\"COMMAND\")")]
    /// word shown in front of the command number in the prompt
    prompt_label: String,

    #[argh(switch, short = 'v')]
    /// enable debug logging (RUST_LOG takes precedence)
    verbose: bool,
}

impl Options {
    fn config(&self) -> ShellConfig {
        ShellConfig {
            max_line: self.max_line,
            show_args: self.show_args,
            reap_background: self.reap_background,
            prompt_label: self.prompt_label.clone(),
        }
    }
}

fn init_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "warn" };
    let env_filter = env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run(options: &Options) -> anyhow::Result<()> {
    let mut interpreter =
        Interpreter::new(options.config()).context("cannot start the interpreter")?;
    debug!(config = ?interpreter.config(), "starting");

    let mut source = io_adapters::stdin_source();
    interpreter.repl(source.as_mut(), &mut io::stdout(), &mut io::stderr())?;
    Ok(())
}

fn main() -> ExitCode {
    let options: Options = argh::from_env();
    init_logging(options.verbose);

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
