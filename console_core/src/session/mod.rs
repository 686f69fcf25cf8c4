//! Console session: reads one line from a byte stream, dispatches it and reports the
//! outcome on the same stream.

mod buffered;

use core::fmt::{self, Write};

use heapless::Vec;

use console_config::{ECHO_PREFIX, INPUT_BUF_SIZE, LINE_DELIMITER, LINE_ENDING};

use crate::dispatcher::{Outcome, dispatch};
use crate::error::DispatchError;
use crate::pipeline::is_delimiter;
use crate::table::CommandTable;

pub use buffered::BufferedStream;

/// Outcome of one [`ByteStream::read_bytes_until`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadUntil {
    /// Bytes written to the front of `buf`.
    pub stored: usize,
    /// The delimiter was consumed, so the bytes stored end a line.
    pub delimited: bool,
}

/// Character stream the console talks to.
///
/// Output goes through [`fmt::Write`]. Neither read method may block.
pub trait ByteStream: Write {
    /// Number of bytes that can be read right now.
    fn available(&mut self) -> usize;

    /// Read bytes into `buf` until `delimiter`, the end of the available data, or a
    /// full `buf`. The delimiter is consumed but not stored. It is still consumed
    /// when it arrives right as `buf` fills up.
    fn read_bytes_until(&mut self, delimiter: u8, buf: &mut [u8]) -> ReadUntil;
}

/// Interactive console over a stream and a command table.
///
/// `L` is the line buffer size. A line is dispatched once its delimiter arrives or
/// `L` bytes are buffered; in the second case the rest of that line is discarded.
pub struct Console<'c, S: ByteStream, const L: usize = INPUT_BUF_SIZE> {
    stream: S,
    table: CommandTable<'c>,
    line: Vec<u8, L>,
    /// `line` holds a line that was already dispatched.
    complete: bool,
    /// Skipping input up to the next delimiter after an over-long line.
    discarding: bool,
}

impl<'c, S: ByteStream, const L: usize> Console<'c, S, L> {
    pub fn new(stream: S, table: CommandTable<'c>) -> Self {
        Self {
            stream,
            table,
            line: Vec::new(),
            complete: false,
            discarding: false,
        }
    }

    /// Process at most one complete input line.
    ///
    /// Returns [`Outcome::Idle`] immediately when no complete line is available yet
    /// (a partial line stays buffered for the next call) or the line is blank.
    /// Otherwise the line is echoed, dispatched, and any error or the help listing
    /// is written to the stream before returning.
    pub fn handle_input(&mut self) -> Result<Outcome, DispatchError<'_>> {
        if self.complete {
            self.line.clear();
            self.complete = false;
        }
        if !self.fill_line() {
            return Ok(Outcome::Idle);
        }
        self.complete = true;

        let line = as_trimmed_str(&self.line);
        if line.is_empty() {
            return Ok(Outcome::Idle);
        }

        emit(&mut self.stream, format_args!("{ECHO_PREFIX}{line}"));

        let result = dispatch(&self.table, line);
        match &result {
            Ok(Outcome::Help) => {
                if self.table.write_help(&mut self.stream).is_err() {
                    log::warn!("help listing truncated");
                }
            }
            Ok(Outcome::Executed { command }) => log::debug!("'{}' done", command),
            Ok(Outcome::Idle) => {}
            Err(err) => emit(&mut self.stream, format_args!("Err: {err}")),
        }
        result
    }

    pub fn table(&self) -> &CommandTable<'c> {
        &self.table
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Append pending input to the line buffer. Returns `true` once it holds a whole
    /// line: the delimiter was read or the buffer is full.
    fn fill_line(&mut self) -> bool {
        while self.stream.available() > 0 {
            let start = self.line.len();
            if self.line.resize(L, 0).is_err() {
                return false;
            }
            let read = self.stream.read_bytes_until(LINE_DELIMITER, &mut self.line[start..]);
            self.line.truncate(start + read.stored);

            if self.discarding {
                self.line.clear();
                if read.delimited {
                    self.discarding = false;
                }
            } else if read.delimited {
                return true;
            } else if self.line.is_full() {
                log::warn!("line longer than {} bytes, discarding the rest", L);
                self.discarding = true;
                return true;
            }

            if read.stored == 0 && !read.delimited {
                break;
            }
        }
        false
    }
}

/// Whitespace stripped from the end of a line: the token delimiters and CR/LF.
#[inline(always)]
fn is_trailing_space(c: char) -> bool {
    is_delimiter(c) || c == '\r' || c == '\n'
}

/// The line as text without trailing whitespace. Invalid UTF-8 cuts the line at the
/// first bad byte.
fn as_trimmed_str(bytes: &[u8]) -> &str {
    let text = match core::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            log::warn!("input is not UTF-8 past byte {}", err.valid_up_to());
            // `valid_up_to` always marks a char boundary.
            core::str::from_utf8(&bytes[..err.valid_up_to()]).unwrap_or_default()
        }
    };
    text.trim_end_matches(is_trailing_space)
}

/// Write one line of output.
fn emit<W: Write>(out: &mut W, args: fmt::Arguments<'_>) {
    if out.write_fmt(args).and_then(|()| out.write_str(LINE_ENDING)).is_err() {
        log::warn!("console output truncated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call_log::{record, take as calls};
    use crate::command;
    use crate::table::CommandEntry;

    fn echo(msg: &str) {
        record(format!("echo({msg})"));
    }

    fn add(a: i32, b: i32) {
        record(format!("add({a}, {b})"));
    }

    static ENTRIES: [CommandEntry; 2] = [
        command!("echo", echo, "<msg>"),
        command!("add", add, "<a> <b>"),
    ];

    fn console() -> Console<'static, BufferedStream> {
        Console::new(BufferedStream::new(), CommandTable::new(&ENTRIES).unwrap())
    }

    fn take_output(console: &mut Console<'static, BufferedStream>) -> String {
        let out = console.stream().output().to_owned();
        console.stream_mut().clear_output();
        out
    }

    #[test]
    fn no_input_returns_immediately() {
        let mut console = console();
        assert_eq!(console.handle_input(), Ok(Outcome::Idle));
        assert_eq!(console.stream().output(), "");
    }

    #[test]
    fn one_line_per_call() {
        let mut console = console();
        console.stream_mut().feed(b"echo one\necho two\n");
        assert_eq!(console.handle_input(), Ok(Outcome::Executed { command: "echo" }));
        assert_eq!(calls(), ["echo(one)"]);
        assert_eq!(console.handle_input(), Ok(Outcome::Executed { command: "echo" }));
        assert_eq!(calls(), ["echo(two)"]);
        assert_eq!(console.handle_input(), Ok(Outcome::Idle));
    }

    #[test]
    fn echoes_then_runs() {
        let mut console = console();
        console.stream_mut().feed(b"add 3 4\r\n");
        assert_eq!(console.handle_input(), Ok(Outcome::Executed { command: "add" }));
        assert_eq!(calls(), ["add(3, 4)"]);
        assert_eq!(take_output(&mut console), "> add 3 4\r\n");
    }

    #[test]
    fn blank_line_prints_nothing() {
        let mut console = console();
        console.stream_mut().feed(b"   \t\r\n");
        assert_eq!(console.handle_input(), Ok(Outcome::Idle));
        assert_eq!(console.stream().output(), "");
    }

    #[test]
    fn errors_are_reported_and_recoverable() {
        let mut console = console();
        console.stream_mut().feed(b"add 3\nadd x 4\nfoo\necho ok\n");

        assert!(matches!(
            console.handle_input(),
            Err(DispatchError::MissingArgument { command: "add", .. })
        ));
        assert_eq!(
            take_output(&mut console),
            "> add 3\r\nErr: Missing argument. Usage: add <a> <b>\r\n"
        );

        assert!(matches!(
            console.handle_input(),
            Err(DispatchError::InvalidArgument { token: "x", .. })
        ));
        assert_eq!(
            take_output(&mut console),
            "> add x 4\r\nErr: Invalid argument 'x' (expected i32). Usage: add <a> <b>\r\n"
        );

        assert_eq!(
            console.handle_input(),
            Err(DispatchError::UnknownCommand { name: "foo" })
        );
        assert_eq!(
            take_output(&mut console),
            "> foo\r\nErr: Unknown command 'foo'. Type 'help' for list of commands.\r\n"
        );

        assert!(calls().is_empty());
        assert_eq!(console.handle_input(), Ok(Outcome::Executed { command: "echo" }));
        assert_eq!(calls(), ["echo(ok)"]);
    }

    #[test]
    fn help_lists_the_table() {
        let mut console = console();
        console.stream_mut().feed(b"help\n");
        assert_eq!(console.handle_input(), Ok(Outcome::Help));
        assert_eq!(
            take_output(&mut console),
            "> help\r\n  echo <msg>\r\n  add <a> <b>\r\n"
        );
    }

    #[test]
    fn long_line_is_cut_to_the_buffer() {
        let table = CommandTable::new(&ENTRIES).unwrap();
        let mut console: Console<'_, BufferedStream, 10> = Console::new(BufferedStream::new(), table);
        console.stream_mut().feed(b"echo abcdefghij\necho next\n");
        assert_eq!(console.handle_input(), Ok(Outcome::Executed { command: "echo" }));
        assert_eq!(calls(), ["echo(abcde)"]);
        assert_eq!(console.handle_input(), Ok(Outcome::Executed { command: "echo" }));
        assert_eq!(calls(), ["echo(next)"]);
    }

    #[test]
    fn partial_line_waits_for_the_delimiter() {
        let mut console = console();
        console.stream_mut().feed(b"ad");
        assert_eq!(console.handle_input(), Ok(Outcome::Idle));
        assert_eq!(console.stream().output(), "");
        assert_eq!(console.stream().pending(), 0);

        console.stream_mut().feed(b"d 1 2\n");
        assert_eq!(console.handle_input(), Ok(Outcome::Executed { command: "add" }));
        assert_eq!(calls(), ["add(1, 2)"]);
        assert_eq!(take_output(&mut console), "> add 1 2\r\n");
        assert_eq!(console.handle_input(), Ok(Outcome::Idle));
    }

    #[test]
    fn line_arriving_byte_by_byte() {
        let mut console = console();
        for &b in b"echo hi" {
            console.stream_mut().feed(&[b]);
            assert_eq!(console.handle_input(), Ok(Outcome::Idle));
        }
        console.stream_mut().feed(b"\n");
        assert_eq!(console.handle_input(), Ok(Outcome::Executed { command: "echo" }));
        assert_eq!(calls(), ["echo(hi)"]);
    }

    #[test]
    fn tail_of_long_line_arriving_later_is_discarded() {
        let table = CommandTable::new(&ENTRIES).unwrap();
        let mut console: Console<'_, BufferedStream, 10> = Console::new(BufferedStream::new(), table);
        console.stream_mut().feed(b"echo abcdefgh");
        assert_eq!(console.handle_input(), Ok(Outcome::Executed { command: "echo" }));
        assert_eq!(calls(), ["echo(abcde)"]);

        console.stream_mut().feed(b"ij\n");
        assert_eq!(console.handle_input(), Ok(Outcome::Idle));
        console.stream_mut().feed(b"echo next\n");
        assert_eq!(console.handle_input(), Ok(Outcome::Executed { command: "echo" }));
        assert_eq!(calls(), ["echo(next)"]);
    }

    #[test]
    fn line_filling_the_buffer_exactly_is_not_followed_by_an_empty_one() {
        let table = CommandTable::new(&ENTRIES).unwrap();
        let mut console: Console<'_, BufferedStream, 7> = Console::new(BufferedStream::new(), table);
        console.stream_mut().feed(b"echo hi\nadd 1 2\n");
        assert_eq!(console.handle_input(), Ok(Outcome::Executed { command: "echo" }));
        assert_eq!(console.handle_input(), Ok(Outcome::Executed { command: "add" }));
        assert_eq!(calls(), ["echo(hi)", "add(1, 2)"]);
    }

    #[test]
    fn only_delimiters_and_line_endings_are_trimmed() {
        assert_eq!(as_trimmed_str(b"echo hi \t\r\n"), "echo hi");
        assert_eq!(as_trimmed_str(b"echo a\x0B"), "echo a\x0B");
        let tokens: std::vec::Vec<&str> = crate::Tokens::new("echo a\x0Bb").collect();
        assert_eq!(tokens, ["echo", "a\x0Bb"]);
    }

    #[test]
    fn invalid_utf8_keeps_the_valid_prefix() {
        assert_eq!(as_trimmed_str(b"echo hi \xFF\xFE"), "echo hi");
        assert_eq!(as_trimmed_str(b"add 1 2 \r\n"), "add 1 2");
    }

    #[test]
    fn releases_the_stream() {
        let mut console = console();
        console.stream_mut().feed(b"echo bye\n");
        console.handle_input().unwrap();
        let stream = console.into_inner();
        assert_eq!(stream.output(), "> echo bye\r\n");
        assert_eq!(calls(), ["echo(bye)"]);
    }
}
