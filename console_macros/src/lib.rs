extern crate proc_macro;

mod commandsgen;

use commandsgen::define_commands_impl;
use proc_macro::TokenStream;

/// Generate a module holding a static `console_core` command table.
///
/// ```ignore
/// define_commands! {
///     mod commands;
///     "echo"  => crate::handlers::echo, "<msg>";
///     "add"   => crate::handlers::add,  "<a> <b>";
///     crate::handlers::reset;
/// }
///
/// define_commands! {
///     mod commands;
///     path = "src/commands.cfg"
/// }
/// ```
#[proc_macro]
pub fn define_commands(input: TokenStream) -> TokenStream {
    define_commands_impl(input)
}
