//! Resolves the first token of a line and runs the matching command.

use console_config::HELP_KEYWORD;

use crate::error::DispatchError;
use crate::pipeline::Tokens;
use crate::table::CommandTable;

/// What a successfully processed line did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Nothing to do: no line was available, or it held no tokens.
    Idle,
    /// The named command's handler ran to completion.
    Executed { command: &'static str },
    /// The help keyword was entered; the caller prints the table.
    Help,
}

/// Dispatch one line against `table`.
///
/// The help keyword is checked before the table, so a command registered under that
/// name can never be reached. Otherwise the first entry with an exactly matching
/// name wins. Tokens past the command's arity are ignored.
pub fn dispatch<'t>(table: &CommandTable<'_>, line: &'t str) -> Result<Outcome, DispatchError<'t>> {
    let mut tokens = Tokens::new(line);
    let Some(name) = tokens.next() else {
        return Ok(Outcome::Idle);
    };

    if name == HELP_KEYWORD {
        log::debug!("help requested");
        return Ok(Outcome::Help);
    }

    let Some(entry) = table.find(name) else {
        log::warn!("unknown command '{}'", name);
        return Err(DispatchError::UnknownCommand { name });
    };

    log::debug!("dispatching '{}'", entry.name());
    entry.run(&mut tokens).map_err(|err| {
        log::warn!("'{}' rejected: {}", entry.name(), err);
        DispatchError::from_arg(entry.name(), entry.usage(), err)
    })?;

    if !tokens.remainder().is_empty() {
        log::debug!("'{}' ignored trailing input '{}'", entry.name(), tokens.remainder());
    }
    Ok(Outcome::Executed { command: entry.name() })
}
