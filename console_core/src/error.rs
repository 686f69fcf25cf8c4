//! Error types reported by the codecs, the argument pipeline, the dispatcher and the
//! table builder.
//!
//! Every dispatch error is recoverable: the session prints it and waits for the next
//! line. The `Display` output is the text shown on the console.

use core::fmt;

use console_config::HELP_KEYWORD;
use thiserror::Error;

/// A token could not be decoded into the requested type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("expected {expected}")]
pub struct InvalidFormat {
    /// Name of the type the token was decoded into.
    pub expected: &'static str,
}

impl InvalidFormat {
    pub const fn new(expected: &'static str) -> Self {
        Self { expected }
    }
}

/// Failure of the argument pipeline, before the command context is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArgError<'t> {
    /// The line ran out of tokens at parameter `index`.
    #[error("missing argument #{index}")]
    Missing { index: usize },

    /// The token at parameter `index` failed to decode.
    #[error("invalid argument #{index} '{token}' (expected {expected})")]
    Invalid {
        index: usize,
        token: &'t str,
        expected: &'static str,
    },
}

/// Errors reported for one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError<'t> {
    /// First token matches no registered command and is not the help keyword.
    #[error("Unknown command '{name}'. Type '{help}' for list of commands.", help = HELP_KEYWORD)]
    UnknownCommand { name: &'t str },

    /// Fewer tokens than the command's arity. The handler was not called.
    #[error("Missing argument. Usage: {command}{}", UsageSuffix(.usage))]
    MissingArgument {
        command: &'static str,
        usage: Option<&'static str>,
        index: usize,
    },

    /// A token failed to decode for its parameter. The handler was not called.
    #[error("Invalid argument '{token}' (expected {expected}). Usage: {command}{}", UsageSuffix(.usage))]
    InvalidArgument {
        command: &'static str,
        usage: Option<&'static str>,
        token: &'t str,
        index: usize,
        expected: &'static str,
    },
}

impl<'t> DispatchError<'t> {
    /// Attach the command context to a pipeline failure.
    pub fn from_arg(command: &'static str, usage: Option<&'static str>, err: ArgError<'t>) -> Self {
        match err {
            ArgError::Missing { index } => Self::MissingArgument { command, usage, index },
            ArgError::Invalid { index, token, expected } => Self::InvalidArgument {
                command,
                usage,
                token,
                index,
                expected,
            },
        }
    }
}

/// Rejected command table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TableError {
    #[error("command #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("command name '{name}' contains whitespace")]
    InvalidName { name: &'static str },

    #[error("command '{name}' is registered more than once")]
    DuplicateName { name: &'static str },
}

/// Renders `" <usage>"`, or nothing when the command has no usage text.
struct UsageSuffix<'a>(&'a Option<&'static str>);

impl fmt::Display for UsageSuffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(usage) => write!(f, " {usage}"),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_command_names_the_token_and_help() {
        let err = DispatchError::UnknownCommand { name: "foo" };
        assert_eq!(
            err.to_string(),
            "Unknown command 'foo'. Type 'help' for list of commands."
        );
    }

    #[test]
    fn missing_argument_carries_usage() {
        let err = DispatchError::from_arg("add", Some("<a> <b>"), ArgError::Missing { index: 1 });
        assert_eq!(err.to_string(), "Missing argument. Usage: add <a> <b>");
    }

    #[test]
    fn missing_argument_without_usage() {
        let err = DispatchError::from_arg("reset", None, ArgError::Missing { index: 0 });
        assert_eq!(err.to_string(), "Missing argument. Usage: reset");
    }

    #[test]
    fn invalid_argument_cites_token() {
        let err = DispatchError::from_arg(
            "add",
            Some("<a> <b>"),
            ArgError::Invalid { index: 0, token: "x", expected: "i32" },
        );
        assert_eq!(
            err,
            DispatchError::InvalidArgument {
                command: "add",
                usage: Some("<a> <b>"),
                token: "x",
                index: 0,
                expected: "i32",
            }
        );
        assert_eq!(
            err.to_string(),
            "Invalid argument 'x' (expected i32). Usage: add <a> <b>"
        );
    }
}
