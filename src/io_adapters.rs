use crate::error::ShellError;
use crate::lexer::{LineBuffer, ReadOutcome};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, BufRead, Write};

/// Where the interpreter gets its command lines from.
///
/// An implementation shows `prompt` in whatever way suits it, then fills
/// `line` with the next line of input.
pub trait LineSource {
    fn read_line(
        &mut self,
        prompt: &str,
        line: &mut LineBuffer,
    ) -> Result<ReadOutcome, ShellError>;
}

/// Raw byte stream input, e.g. a pipe or a redirected file.
///
/// The prompt is written to `prompt_out` and flushed before every read.
pub struct StreamSource<R, W> {
    input: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> StreamSource<R, W> {
    pub fn new(input: R, prompt_out: W) -> Self {
        Self { input, prompt_out }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.prompt_out)
    }
}

impl<R: BufRead, W: Write> LineSource for StreamSource<R, W> {
    fn read_line(
        &mut self,
        prompt: &str,
        line: &mut LineBuffer,
    ) -> Result<ReadOutcome, ShellError> {
        write!(self.prompt_out, "\n{prompt}")?;
        self.prompt_out.flush()?;
        line.read_from(&mut self.input)
    }
}

/// Interactive terminal input through `rustyline`.
///
/// Lines are never added to the editor's history.
pub struct EditorSource {
    editor: DefaultEditor,
}

impl EditorSource {
    pub fn new() -> Result<Self, ShellError> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineSource for EditorSource {
    fn read_line(
        &mut self,
        prompt: &str,
        line: &mut LineBuffer,
    ) -> Result<ReadOutcome, ShellError> {
        println!();
        match self.editor.readline(prompt) {
            Ok(text) => {
                line.load(text.as_bytes());
                Ok(ReadOutcome::Line)
            }
            // Ctrl-C abandons the line being edited.
            Err(ReadlineError::Interrupted) => {
                line.clear();
                Ok(ReadOutcome::Line)
            }
            Err(ReadlineError::Eof) => Ok(ReadOutcome::EndOfInput),
            Err(err) => Err(err.into()),
        }
    }
}

/// Pick the line source for the process's standard input.
///
/// Terminals get the line editor; anything else, or a terminal the editor
/// cannot drive, is read as a raw stream.
pub fn stdin_source() -> Box<dyn LineSource> {
    use std::io::IsTerminal;
    if io::stdin().is_terminal() {
        match EditorSource::new() {
            Ok(source) => return Box::new(source),
            Err(err) => tracing::warn!(?err, "line editor unavailable, reading raw input"),
        }
    }
    Box::new(StreamSource::new(io::stdin().lock(), io::stdout()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_stream_source_prompts_before_each_read() {
        let mut source = StreamSource::new(Cursor::new(b"ls\n".to_vec()), Vec::new());
        let mut line = LineBuffer::default();

        assert_eq!(source.read_line("A[1] > ", &mut line).unwrap(), ReadOutcome::Line);
        assert_eq!(line.as_bytes(), b"ls\n");
        assert_eq!(
            source.read_line("A[2] > ", &mut line).unwrap(),
            ReadOutcome::EndOfInput
        );

        let (_, prompts) = source.into_inner();
        assert_eq!(String::from_utf8(prompts).unwrap(), "\nA[1] > \nA[2] > ");
    }
}
