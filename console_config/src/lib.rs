#![no_std]

//! Compile-time configuration shared by the console crates.

/// Size of the session line buffer (bytes). Longer lines are truncated to this.
pub const INPUT_BUF_SIZE: usize = 64;

/// Byte that terminates one input line on the stream.
pub const LINE_DELIMITER: u8 = b'\n';

/// Reserved command name that lists the command table.
pub const HELP_KEYWORD: &str = "help";

/// Prefix written before the echoed input line.
pub const ECHO_PREFIX: &str = "> ";

/// Indentation of each line in the help listing.
pub const HELP_INDENT: &str = "  ";

/// Default input queue capacity of the in-memory stream.
pub const STREAM_INPUT_CAPACITY: usize = 256;

/// Default captured-output capacity of the in-memory stream.
pub const STREAM_OUTPUT_CAPACITY: usize = 1024;

/// Highest handler arity the argument pipeline is implemented for.
pub const MAX_ARITY: usize = 8;

/// Line terminator written after every output line.
pub const LINE_ENDING: &str = "\r\n";
