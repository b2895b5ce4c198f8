use crate::command::CommandIndex;
use crate::error::ShellError;
use crate::lexer::DEFAULT_MAX_LINE;

/// Largest line buffer the interpreter agrees to allocate.
pub const MAX_LINE_LIMIT: usize = 64 * 1024;

/// Run-time settings of an [`Interpreter`](crate::Interpreter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Capacity of the line buffer, in bytes.
    pub max_line: usize,
    /// Print the tokenized arguments before dispatching each line.
    pub show_args: bool,
    /// Track background children and collect them before each prompt.
    pub reap_background: bool,
    /// Word shown in front of the command index in the prompt.
    pub prompt_label: String,
}

impl ShellConfig {
    /// Check the settings before the interpreter starts.
    pub fn validate(&self) -> Result<(), ShellError> {
        if !(2..=MAX_LINE_LIMIT).contains(&self.max_line) {
            return Err(ShellError::Config(format!(
                "max line length must be between 2 and {MAX_LINE_LIMIT} bytes, got {}",
                self.max_line
            )));
        }
        if self.prompt_label.trim().is_empty() {
            return Err(ShellError::Config("prompt label must not be empty".to_string()));
        }
        Ok(())
    }

    /// Prompt text for the given command index, e.g. `COMMAND[3] > `.
    pub fn prompt(&self, index: CommandIndex) -> String {
        format!("{}[{}] > ", self.prompt_label, index)
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            max_line: DEFAULT_MAX_LINE,
            show_args: false,
            reap_background: false,
            prompt_label: "COMMAND".to_string(),
        }
    }
}
