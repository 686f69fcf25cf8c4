//! Command entries and the fixed-capacity command table.

use core::fmt;

use console_config::{HELP_INDENT, LINE_ENDING};

use crate::error::{ArgError, TableError};
use crate::pipeline::{Invoker, Tokens};

/// One registered command.
///
/// The handler lives inside `invoke`, bound to its decoding pipeline when the entry
/// is built. Entries are `const`-constructible so a table can sit in a `static`.
#[derive(Clone, Copy)]
pub struct CommandEntry {
    name: &'static str,
    usage: Option<&'static str>,
    invoke: Invoker,
}

impl CommandEntry {
    /// Prefer [`command!`](crate::command), which builds `invoke` from a handler.
    pub const fn new(name: &'static str, usage: Option<&'static str>, invoke: Invoker) -> Self {
        Self { name, usage, invoke }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn usage(&self) -> Option<&'static str> {
        self.usage
    }

    /// Decode the arguments from `tokens` and call the handler.
    #[inline]
    pub fn run<'t>(&self, tokens: &mut Tokens<'t>) -> Result<(), ArgError<'t>> {
        (self.invoke)(tokens)
    }
}

impl fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandEntry")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .finish_non_exhaustive()
    }
}

/// Build a [`CommandEntry`] from `name, handler[, usage]`.
///
/// `handler` must be a path to a function (or a non-capturing closure) whose
/// parameters all implement [`Decode`](crate::codec::Decode).
///
/// ```ignore
/// fn add(a: i32, b: i32) { /* .. */ }
///
/// static ENTRIES: [CommandEntry; 1] = [command!("add", add, "<a> <b>")];
/// ```
#[macro_export]
macro_rules! command {
    ($name:expr, $handler:expr $(,)?) => {
        $crate::CommandEntry::new($name, ::core::option::Option::None, |tokens| {
            $crate::pipeline::invoke($handler, tokens)
        })
    };
    ($name:expr, $handler:expr, $usage:expr $(,)?) => {
        $crate::CommandEntry::new($name, ::core::option::Option::Some($usage), |tokens| {
            $crate::pipeline::invoke($handler, tokens)
        })
    };
}

/// Ordered, read-only view over the registered commands.
///
/// Capacity is the length of the entry list it was built from; entries are matched
/// and listed in that order.
#[derive(Debug, Clone, Copy)]
pub struct CommandTable<'c> {
    entries: &'c [CommandEntry],
}

impl<'c> CommandTable<'c> {
    /// Validate `entries` and build the table.
    ///
    /// Rejects empty names, names containing whitespace and duplicate names.
    pub fn new(entries: &'c [CommandEntry]) -> Result<Self, TableError> {
        for (index, entry) in entries.iter().enumerate() {
            let name = entry.name;
            if name.is_empty() {
                return Err(TableError::EmptyName { index });
            }
            if name.chars().any(char::is_whitespace) {
                return Err(TableError::InvalidName { name });
            }
            if entries[..index].iter().any(|earlier| earlier.name == name) {
                return Err(TableError::DuplicateName { name });
            }
        }
        log::debug!("command table ready with {} entries", entries.len());
        Ok(Self { entries })
    }

    /// Build a table from entries already validated when they were generated.
    #[doc(hidden)]
    pub const fn from_validated(entries: &'c [CommandEntry]) -> Self {
        Self { entries }
    }

    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn entries(&self) -> &'c [CommandEntry] {
        self.entries
    }

    pub fn iter(&self) -> core::slice::Iter<'c, CommandEntry> {
        self.entries.iter()
    }

    /// First entry whose name equals `name` exactly (case-sensitive).
    pub fn find(&self, name: &str) -> Option<&'c CommandEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Write one `  <name> <usage>` line per entry, in registration order.
    pub fn write_help<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        for entry in self.entries {
            out.write_str(HELP_INDENT)?;
            out.write_str(entry.name)?;
            if let Some(usage) = entry.usage {
                out.write_char(' ')?;
                out.write_str(usage)?;
            }
            out.write_str(LINE_ENDING)?;
        }
        Ok(())
    }
}

impl<'c> IntoIterator for &CommandTable<'c> {
    type Item = &'c CommandEntry;
    type IntoIter = core::slice::Iter<'c, CommandEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command;

    fn noop() {}

    fn echo(_msg: &str) {}

    fn add(_a: i32, _b: i32) {}

    static ENTRIES: [CommandEntry; 3] = [
        command!("echo", echo, "<msg>"),
        command!("add", add, "<a> <b>"),
        command!("reset", noop),
    ];

    #[test]
    fn capacity_is_the_registration_count() {
        let table = CommandTable::new(&ENTRIES).unwrap();
        assert_eq!(table.len(), 3);
        assert!(!table.is_empty());
        let names: Vec<_> = table.iter().map(CommandEntry::name).collect();
        assert_eq!(names, ["echo", "add", "reset"]);
    }

    #[test]
    fn find_is_exact_and_case_sensitive() {
        let table = CommandTable::new(&ENTRIES).unwrap();
        assert_eq!(table.find("add").map(CommandEntry::usage), Some(Some("<a> <b>")));
        assert!(table.find("ADD").is_none());
        assert!(table.find("ad").is_none());
    }

    #[test]
    fn help_lists_entries_in_order() {
        let table = CommandTable::new(&ENTRIES).unwrap();
        let mut out = String::new();
        table.write_help(&mut out).unwrap();
        assert_eq!(out, "  echo <msg>\r\n  add <a> <b>\r\n  reset\r\n");
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let entries = [command!("add", add), command!("echo", echo), command!("add", noop)];
        assert_eq!(
            CommandTable::new(&entries).unwrap_err(),
            TableError::DuplicateName { name: "add" }
        );
    }

    #[test]
    fn malformed_names_are_rejected() {
        let empty = [command!("echo", echo), command!("", noop)];
        assert_eq!(
            CommandTable::new(&empty).unwrap_err(),
            TableError::EmptyName { index: 1 }
        );
        let spaced = [command!("two words", noop)];
        assert_eq!(
            CommandTable::new(&spaced).unwrap_err(),
            TableError::InvalidName { name: "two words" }
        );
    }

    #[test]
    fn empty_table_is_valid() {
        let table = CommandTable::new(&[]).unwrap();
        assert!(table.is_empty());
        assert!(table.find("help").is_none());
    }

    #[test]
    fn entry_runs_its_bound_pipeline() {
        let table = CommandTable::new(&ENTRIES).unwrap();
        let add = table.find("add").unwrap();
        assert_eq!(add.run(&mut Tokens::new("1 2")), Ok(()));
        assert_eq!(add.run(&mut Tokens::new("1")), Err(ArgError::Missing { index: 1 }));
    }
}
