#![cfg_attr(not(test), no_std)]

//! # console_core
//!
//! A no_std, zero-heap command console for character streams.
//!
//! Commands are plain functions. Registering one binds it to a decoding pipeline
//! built for its exact parameter list, so a table of heterogeneous handlers is a
//! flat array of [`CommandEntry`] values that can live in a `static`:
//!
//! ```ignore
//! use console_core::{command, BufferedStream, CommandEntry, CommandTable, Console};
//!
//! fn echo(msg: &str) { /* .. */ }
//! fn add(a: i32, b: i32) { /* .. */ }
//!
//! static ENTRIES: [CommandEntry; 2] = [
//!     command!("echo", echo, "<msg>"),
//!     command!("add", add, "<a> <b>"),
//! ];
//!
//! let table = CommandTable::new(&ENTRIES)?;
//! let mut console: Console<'_, _> = Console::new(BufferedStream::<256, 1024>::new(), table);
//! loop {
//!     let _ = console.handle_input();
//! }
//! ```
//!
//! Input lines are split on spaces and tabs. The first token selects the command,
//! `help` lists the table, and the following tokens are decoded in order into the
//! handler's parameters. Missing, malformed and unknown input is reported on the
//! stream and never reaches a handler.

pub mod codec;
pub mod dispatcher;
mod error;
pub mod pipeline;
pub mod session;
pub mod table;

pub use codec::Decode;
pub use dispatcher::{Outcome, dispatch};
pub use error::{ArgError, DispatchError, InvalidFormat, TableError};
pub use pipeline::{Invoker, Tokens};
pub use session::{BufferedStream, ByteStream, Console, ReadUntil};
pub use table::{CommandEntry, CommandTable};

pub use console_config as config;

/// Per-thread record of handler calls, shared by the unit tests.
#[cfg(test)]
pub(crate) mod call_log {
    use std::cell::RefCell;

    thread_local! {
        static CALLS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    }

    pub fn record(call: String) {
        CALLS.with(|c| c.borrow_mut().push(call));
    }

    /// Calls recorded since the last take, oldest first.
    pub fn take() -> Vec<String> {
        CALLS.with(|c| c.borrow_mut().drain(..).collect())
    }
}
