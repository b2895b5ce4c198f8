//! Line buffer and tokenizer for interactive command lines.
//!
//! A [`LineBuffer`] holds one line of raw input. [`LineBuffer::tokenize`]
//! scans it once, overwriting delimiters with NUL in place, and returns a
//! [`CommandRecord`] whose arguments are views into the buffer.

use crate::command::{ArgumentList, CommandRecord};
use crate::error::ShellError;
use std::io::BufRead;

/// Default capacity of a line buffer, in bytes.
pub const DEFAULT_MAX_LINE: usize = 80;

const TERMINATOR: u8 = b'\0';

/// Role of a single input byte during tokenizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Space or tab: closes an open token.
    Separator,
    /// Newline: closes an open token and ends the line.
    LineEnd,
    /// `&`: marks the command for background execution.
    Background,
    /// Anything else belongs to an argument.
    Ordinary,
}

/// Classify one byte of input.
pub fn classify(byte: u8) -> CharClass {
    match byte {
        b' ' | b'\t' => CharClass::Separator,
        b'\n' => CharClass::LineEnd,
        b'&' => CharClass::Background,
        _ => CharClass::Ordinary,
    }
}

/// Result of acquiring a line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The buffer now holds a (possibly empty) line.
    Line,
    /// The input stream is exhausted.
    EndOfInput,
}

/// Fixed-capacity buffer holding one raw command line.
///
/// The storage is allocated once and reused by every cycle; each read
/// replaces the previous contents.
#[derive(Debug, Clone)]
pub struct LineBuffer {
    bytes: Vec<u8>,
    len: usize,
}

impl LineBuffer {
    pub fn with_capacity(max_len: usize) -> Self {
        Self {
            bytes: vec![0; max_len],
            len: 0,
        }
    }

    /// Buffer holding a copy of `line`, truncated to `max_len` bytes.
    pub fn from_bytes(line: &[u8], max_len: usize) -> Self {
        let mut buffer = Self::with_capacity(max_len);
        buffer.load(line);
        buffer
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Most arguments a line of this capacity can produce.
    pub fn max_args(&self) -> usize {
        self.capacity() / 2
    }

    /// Replace the contents with `line`, dropping whatever does not fit.
    pub fn load(&mut self, line: &[u8]) {
        let len = line.len().min(self.capacity());
        self.bytes[..len].copy_from_slice(&line[..len]);
        self.len = len;
    }

    /// Replace the contents with one line read from `reader`.
    ///
    /// Reading stops after a newline or once the buffer is full. Bytes past
    /// the capacity stay in the reader and start the next line.
    pub fn read_from<R: BufRead + ?Sized>(
        &mut self,
        reader: &mut R,
    ) -> Result<ReadOutcome, ShellError> {
        self.len = 0;
        while self.len < self.capacity() {
            let (taken, complete) = {
                let available = reader.fill_buf().map_err(ShellError::ReadInput)?;
                if available.is_empty() {
                    break;
                }
                let room = &available[..available.len().min(self.capacity() - self.len)];
                let (taken, complete) = match room.iter().position(|&b| b == b'\n') {
                    Some(newline) => (newline + 1, true),
                    None => (room.len(), false),
                };
                self.bytes[self.len..self.len + taken].copy_from_slice(&room[..taken]);
                (taken, complete)
            };
            reader.consume(taken);
            self.len += taken;
            if complete {
                break;
            }
        }

        if self.len == 0 {
            Ok(ReadOutcome::EndOfInput)
        } else {
            Ok(ReadOutcome::Line)
        }
    }

    /// Split the line into arguments and detect the background marker.
    ///
    /// Separators, the line end and `&` are overwritten with NUL. An argument
    /// runs from its first byte up to the first NUL, so `&` inside a word
    /// cuts it short without starting a new one. Arguments past
    /// [`max_args`](Self::max_args) are dropped.
    pub fn tokenize(&mut self) -> CommandRecord<'_> {
        let mut spans = Vec::new();
        let mut start: Option<usize> = None;
        let mut background = false;

        let line = &mut self.bytes[..self.len];
        for i in 0..line.len() {
            match classify(line[i]) {
                CharClass::Separator => {
                    if let Some(s) = start.take() {
                        spans.push(s..i);
                    }
                    line[i] = TERMINATOR;
                }
                CharClass::LineEnd => {
                    if let Some(s) = start.take() {
                        spans.push(s..i);
                    }
                    line[i] = TERMINATOR;
                    break;
                }
                CharClass::Background => {
                    background = true;
                    line[i] = TERMINATOR;
                }
                CharClass::Ordinary => {
                    if start.is_none() {
                        start = Some(i);
                    }
                }
            }
        }
        // A line cut off without a newline still ends its last argument.
        if let Some(s) = start {
            spans.push(s..line.len());
        }

        let max_args = self.max_args();
        let line = &self.bytes[..self.len];
        let args = spans
            .into_iter()
            .map(|span| {
                let token = &line[span];
                match token.iter().position(|&b| b == TERMINATOR) {
                    Some(end) => &token[..end],
                    None => token,
                }
            })
            .filter(|arg| !arg.is_empty())
            .take(max_args)
            .collect();

        CommandRecord {
            args: ArgumentList::from_views(args),
            background,
        }
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_LINE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn split(line: &str) -> (Vec<String>, bool) {
        let mut buffer = LineBuffer::from_bytes(line.as_bytes(), DEFAULT_MAX_LINE);
        let record = buffer.tokenize();
        (record.args.to_strings(), record.background)
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(b' '), CharClass::Separator);
        assert_eq!(classify(b'\t'), CharClass::Separator);
        assert_eq!(classify(b'\n'), CharClass::LineEnd);
        assert_eq!(classify(b'&'), CharClass::Background);
        assert_eq!(classify(b'x'), CharClass::Ordinary);
        assert_eq!(classify(b'|'), CharClass::Ordinary);
    }

    #[test]
    fn test_words_split_on_spaces_and_tabs() {
        let (args, background) = split("ls  -l\t/tmp\n");
        assert_eq!(args, vec!["ls", "-l", "/tmp"]);
        assert!(!background);
    }

    #[test]
    fn test_trailing_ampersand_sets_background() {
        assert_eq!(split("sleep 5 &\n"), (vec!["sleep".into(), "5".into()], true));
        assert_eq!(split("sleep 5 &"), (vec!["sleep".into(), "5".into()], true));
    }

    #[test]
    fn test_ampersand_glued_to_word() {
        assert_eq!(split("ls&"), (vec!["ls".to_string()], true));
        assert_eq!(split("ls&\n"), (vec!["ls".to_string()], true));
    }

    #[test]
    fn test_ampersand_inside_word_cuts_it() {
        assert_eq!(split("echo a&b c\n"), (vec!["echo".into(), "a".into(), "c".into()], true));
    }

    #[test]
    fn test_leading_ampersand() {
        assert_eq!(split("&sleep 1\n"), (vec!["sleep".into(), "1".into()], true));
    }

    #[test]
    fn test_empty_and_blank_lines() {
        assert_eq!(split(""), (vec![], false));
        assert_eq!(split("\n"), (vec![], false));
        assert_eq!(split(" \t  \n"), (vec![], false));
        assert_eq!(split(" & \n"), (vec![], true));
    }

    #[test]
    fn test_scanning_stops_at_newline() {
        assert_eq!(split("pwd\nls\n"), (vec!["pwd".to_string()], false));
    }

    #[test]
    fn test_delimiters_are_overwritten_in_place() {
        let mut buffer = LineBuffer::from_bytes(b"cd /tmp &\n", DEFAULT_MAX_LINE);
        let _ = buffer.tokenize();
        assert_eq!(buffer.as_bytes(), b"cd\0/tmp\0\0\0");
    }

    #[test]
    fn test_nul_bytes_never_yield_empty_arguments() {
        let mut buffer = LineBuffer::from_bytes(b"\0ab echo\n", DEFAULT_MAX_LINE);
        let record = buffer.tokenize();
        assert_eq!(record.args.to_strings(), vec!["echo"]);
    }

    #[test]
    fn test_arguments_beyond_capacity_are_dropped() {
        let mut buffer = LineBuffer::from_bytes(b"a b c d", 7);
        assert_eq!(buffer.max_args(), 3);
        let record = buffer.tokenize();
        assert_eq!(record.args.to_strings(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_load_truncates_to_capacity() {
        let buffer = LineBuffer::from_bytes(b"echo hello world", 10);
        assert_eq!(buffer.as_bytes(), b"echo hello");
    }

    #[test]
    fn test_read_from_returns_one_line_at_a_time() {
        let mut input = Cursor::new(b"echo one\necho two\n".to_vec());
        let mut buffer = LineBuffer::default();

        assert_eq!(buffer.read_from(&mut input).unwrap(), ReadOutcome::Line);
        assert_eq!(buffer.as_bytes(), b"echo one\n");
        assert_eq!(buffer.read_from(&mut input).unwrap(), ReadOutcome::Line);
        assert_eq!(buffer.as_bytes(), b"echo two\n");
        assert_eq!(buffer.read_from(&mut input).unwrap(), ReadOutcome::EndOfInput);
    }

    #[test]
    fn test_read_from_keeps_overflow_for_next_read() {
        let mut input = Cursor::new(b"abcdefgh ij\n".to_vec());
        let mut buffer = LineBuffer::with_capacity(8);

        assert_eq!(buffer.read_from(&mut input).unwrap(), ReadOutcome::Line);
        assert_eq!(buffer.as_bytes(), b"abcdefgh");
        assert_eq!(buffer.read_from(&mut input).unwrap(), ReadOutcome::Line);
        assert_eq!(buffer.as_bytes(), b" ij\n");
    }

    #[test]
    fn test_read_from_last_line_without_newline() {
        let mut input = Cursor::new(b"pwd".to_vec());
        let mut buffer = LineBuffer::default();

        assert_eq!(buffer.read_from(&mut input).unwrap(), ReadOutcome::Line);
        assert_eq!(buffer.tokenize().args.to_strings(), vec!["pwd"]);
        assert_eq!(buffer.read_from(&mut input).unwrap(), ReadOutcome::EndOfInput);
    }

    #[test]
    fn test_read_from_empty_input_is_end_of_input() {
        let mut input = Cursor::new(Vec::new());
        let mut buffer = LineBuffer::default();
        assert_eq!(buffer.read_from(&mut input).unwrap(), ReadOutcome::EndOfInput);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_read_errors_are_reported() {
        struct Broken;
        impl std::io::Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("device gone"))
            }
        }

        let mut input = std::io::BufReader::new(Broken);
        let mut buffer = LineBuffer::default();
        let err = buffer.read_from(&mut input).unwrap_err();
        assert!(matches!(err, ShellError::ReadInput(_)));
        assert!(err.is_fatal());
    }
}
