//! # Command Table Macro
//!
//! Generates a module holding a `static` command table for `console_core` from a
//! list of registrations, inline or read from a descriptor file.
//!
//! ## Macro Input Format
//! ```text
//! mod <ident>;
//! ( path = "<file relative to CARGO_MANIFEST_DIR>" [;] | <entry>* )
//!
//! entry := [ "<name>" => ] <path::to::handler> [ , "<usage>" ] ;
//! ```
//! Without an explicit name the last segment of the handler path is used.
//! Registration order is kept: it is the match order and the help order.
//!
//! ## Generated Module
//! - `NUM_COMMANDS`, `MAX_COMMAND_NAME_LEN`
//! - `ENTRIES: [CommandEntry; NUM_COMMANDS]`
//! - `NAME_AND_USAGE: [(&str, Option<&str>); NUM_COMMANDS]`
//! - `table() -> CommandTable<'static>`
//!
//! Empty names, names with whitespace, duplicate names and the reserved help
//! keyword are rejected at expansion time.

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::{Ident, LitStr, Path, Result, Token, parse_macro_input};

use console_config::HELP_KEYWORD;

/// One registration, before validation.
struct CommandSpec {
    name: Option<LitStr>,
    handler: Path,
    usage: Option<LitStr>,
}

impl CommandSpec {
    /// Explicit name, or the handler's last path segment.
    fn name(&self) -> String {
        match &self.name {
            Some(lit) => lit.value(),
            None => self
                .handler
                .segments
                .last()
                .map(|s| s.ident.to_string())
                .unwrap_or_default(),
        }
    }

    fn name_span(&self) -> Span {
        match &self.name {
            Some(lit) => lit.span(),
            None => self
                .handler
                .segments
                .last()
                .map(|s| s.ident.span())
                .unwrap_or_else(Span::call_site),
        }
    }
}

impl Parse for CommandSpec {
    fn parse(input: ParseStream) -> Result<Self> {
        let name = if input.peek(LitStr) {
            let lit: LitStr = input.parse()?;
            input.parse::<Token![=>]>()?;
            Some(lit)
        } else {
            None
        };
        let handler: Path = input.parse()?;
        let usage = if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
            Some(input.parse::<LitStr>()?)
        } else {
            None
        };
        input.parse::<Token![;]>()?;
        Ok(CommandSpec { name, handler, usage })
    }
}

/// Registrations in source order.
struct CommandList(Vec<CommandSpec>);

impl Parse for CommandList {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut specs = Vec::new();
        while !input.is_empty() {
            specs.push(input.parse()?);
        }
        Ok(CommandList(specs))
    }
}

enum Body {
    Inline(CommandList),
    File(LitStr),
}

/// Parsed macro input: `mod <ident>;` followed by the registrations or a file path.
struct CommandMacroInput {
    mod_ident: Ident,
    body: Body,
}

impl Parse for CommandMacroInput {
    fn parse(input: ParseStream) -> Result<Self> {
        input.parse::<Token![mod]>()?;
        let mod_ident: Ident = input.parse()?;
        input.parse::<Token![;]>()?;

        let body = if input.peek(Ident) && input.peek2(Token![=]) {
            let key: Ident = input.parse()?;
            if key != "path" {
                return Err(syn::Error::new(key.span(), "Unexpected identifier, expected 'path'"));
            }
            input.parse::<Token![=]>()?;
            let path: LitStr = input.parse()?;
            if input.peek(Token![;]) {
                input.parse::<Token![;]>()?;
            }
            Body::File(path)
        } else {
            Body::Inline(input.parse()?)
        };
        Ok(CommandMacroInput { mod_ident, body })
    }
}

pub fn define_commands_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as CommandMacroInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: CommandMacroInput) -> Result<TokenStream2> {
    let specs = match input.body {
        Body::Inline(list) => list.0,
        Body::File(path) => load_descriptor_file(&path)?,
    };
    validate(&specs)?;
    Ok(generate(&input.mod_ident, &specs))
}

/// Read and parse a descriptor file relative to the invoking crate's manifest.
fn load_descriptor_file(path: &LitStr) -> Result<Vec<CommandSpec>> {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map_err(|_| syn::Error::new(path.span(), "CARGO_MANIFEST_DIR is not set"))?;
    let full_path = std::path::Path::new(&manifest_dir).join(path.value());

    let raw = std::fs::read_to_string(&full_path).map_err(|e| {
        syn::Error::new(
            path.span(),
            format!("Failed to read command descriptor file {}: {e}", full_path.display()),
        )
    })?;

    syn::parse_str::<CommandList>(&raw)
        .map(|list| list.0)
        .map_err(|e| syn::Error::new(path.span(), format!("{}: {e}", full_path.display())))
}

/// Reject names the runtime table would refuse or could never reach.
fn validate(specs: &[CommandSpec]) -> Result<()> {
    let mut errors: Option<syn::Error> = None;
    let mut push = |err: syn::Error| match errors.as_mut() {
        Some(acc) => acc.combine(err),
        None => errors = Some(err),
    };

    let mut seen: Vec<String> = Vec::new();
    for spec in specs {
        let name = spec.name();
        let span = spec.name_span();
        if name.is_empty() {
            push(syn::Error::new(span, "command name is empty"));
        } else if name.chars().any(char::is_whitespace) {
            push(syn::Error::new(span, format!("command name '{name}' contains whitespace")));
        } else if name == HELP_KEYWORD {
            push(syn::Error::new(
                span,
                format!("'{HELP_KEYWORD}' is reserved for the command listing"),
            ));
        } else if seen.contains(&name) {
            push(syn::Error::new(span, format!("command '{name}' is registered more than once")));
        }
        seen.push(name);
    }

    match errors {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn generate(mod_ident: &Ident, specs: &[CommandSpec]) -> TokenStream2 {
    let num_commands = specs.len();
    let max_name_len = specs.iter().map(|s| s.name().len()).max().unwrap_or(0);

    let mut entries: Vec<TokenStream2> = Vec::new();
    let mut name_usage: Vec<TokenStream2> = Vec::new();

    for spec in specs {
        let name_lit = LitStr::new(&spec.name(), spec.name_span());
        let handler = &spec.handler;
        let usage = match &spec.usage {
            Some(usage) => quote! { ::core::option::Option::Some(#usage) },
            None => quote! { ::core::option::Option::None },
        };

        entries.push(quote! {
            ::console_core::CommandEntry::new(#name_lit, #usage, |tokens| {
                ::console_core::pipeline::invoke(#handler, tokens)
            })
        });
        name_usage.push(quote! { (#name_lit, #usage) });
    }

    quote! {
        #[allow(dead_code)]
        pub mod #mod_ident {
            //! Generated by `define_commands!`.

            #[allow(unused_imports)]
            use super::*;

            /// Number of registered commands (the table capacity).
            pub const NUM_COMMANDS: usize = #num_commands;

            /// Length of the longest command name.
            pub const MAX_COMMAND_NAME_LEN: usize = #max_name_len;

            /// Command entries in registration order.
            pub static ENTRIES: [::console_core::CommandEntry; NUM_COMMANDS] = [
                #( #entries ),*
            ];

            /// Static pairs of (command name, usage).
            pub static NAME_AND_USAGE: [(&'static str, ::core::option::Option<&'static str>); NUM_COMMANDS] = [
                #( #name_usage ),*
            ];

            /// The command table over `ENTRIES`. Names were checked at expansion.
            #[inline(always)]
            pub fn table() -> ::console_core::CommandTable<'static> {
                ::console_core::CommandTable::from_validated(&ENTRIES)
            }
        }
    }
}
