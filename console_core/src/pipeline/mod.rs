//! Argument pipeline: tokenizing a line and decoding tokens into a handler's
//! parameter tuple.
//!
//! A handler `fn(A, B, ..)` is matched to the tuple `(A, B, ..)` through [`Handler`],
//! and the tuple knows how to pull and decode its elements from [`Tokens`] through
//! [`ArgList`]. Both traits are implemented by macro for every arity up to
//! [`MAX_ARITY`], so each distinct signature compiles into its own straight-line
//! decoder. Nothing is boxed and no type tags exist at runtime.

use crate::codec::Decode;
use crate::error::ArgError;

pub use console_config::MAX_ARITY;

/// Type-erased decode-and-call procedure stored in a command entry.
///
/// Produced by coercing a non-capturing closure that calls [`invoke`] with one
/// concrete handler, so the handler and its signature are fixed at registration.
pub type Invoker = for<'t> fn(&mut Tokens<'t>) -> Result<(), ArgError<'t>>;

/// ASCII space or tab.
#[inline(always)]
pub const fn is_delimiter(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Lazy token source over one input line.
///
/// Runs of delimiters are skipped, so tokens are never empty.
#[derive(Debug, Clone)]
pub struct Tokens<'t> {
    rest: &'t str,
    taken: usize,
}

impl<'t> Tokens<'t> {
    pub fn new(line: &'t str) -> Self {
        Self { rest: line, taken: 0 }
    }

    /// Number of tokens handed out so far.
    pub fn taken(&self) -> usize {
        self.taken
    }

    /// The part of the line not yet tokenized, without leading delimiters.
    pub fn remainder(&self) -> &'t str {
        self.rest.trim_start_matches(is_delimiter)
    }
}

impl<'t> Iterator for Tokens<'t> {
    type Item = &'t str;

    fn next(&mut self) -> Option<&'t str> {
        let rest = self.remainder();
        if rest.is_empty() {
            self.rest = rest;
            return None;
        }
        let end = rest.find(is_delimiter).unwrap_or(rest.len());
        let (token, tail) = rest.split_at(end);
        self.rest = tail;
        self.taken += 1;
        Some(token)
    }
}

/// A parameter tuple that can be decoded, in order, from a token source.
pub trait ArgList<'t>: Sized {
    /// Number of tokens consumed on success.
    const ARITY: usize;

    /// Decode left to right. Stops at the first missing or invalid token;
    /// tokens past the arity are left in `tokens`.
    fn decode_all(tokens: &mut Tokens<'t>) -> Result<Self, ArgError<'t>>;
}

/// A callable whose parameter list is the tuple `Args`.
pub trait Handler<Args> {
    fn call(&self, args: Args);
}

/// Pull the next token and decode it as parameter `index`.
#[inline(always)]
fn next_arg<'t, T: Decode<'t>>(tokens: &mut Tokens<'t>, index: usize) -> Result<T, ArgError<'t>> {
    let token = tokens.next().ok_or(ArgError::Missing { index })?;
    T::decode(token).map_err(|e| ArgError::Invalid {
        index,
        token,
        expected: e.expected,
    })
}

/// Decode the handler's arguments from `tokens` and call it.
///
/// The handler is only called once every argument decoded.
#[inline]
pub fn invoke<'t, H, Args>(handler: H, tokens: &mut Tokens<'t>) -> Result<(), ArgError<'t>>
where
    H: Handler<Args>,
    Args: ArgList<'t>,
{
    let args = Args::decode_all(tokens)?;
    handler.call(args);
    Ok(())
}

impl<'t> ArgList<'t> for () {
    const ARITY: usize = 0;

    #[inline(always)]
    fn decode_all(_tokens: &mut Tokens<'t>) -> Result<Self, ArgError<'t>> {
        Ok(())
    }
}

impl<Func: Fn()> Handler<()> for Func {
    #[inline(always)]
    fn call(&self, _args: ()) {
        (self)()
    }
}

macro_rules! impl_pipeline {
    ($arity:literal; $($ty:ident : $idx:tt),+) => {
        impl<'t, $($ty: Decode<'t>),+> ArgList<'t> for ($($ty,)+) {
            const ARITY: usize = $arity;

            #[inline(always)]
            fn decode_all(tokens: &mut Tokens<'t>) -> Result<Self, ArgError<'t>> {
                Ok(($(next_arg::<$ty>(tokens, $idx)?,)+))
            }
        }

        impl<Func, $($ty),+> Handler<($($ty,)+)> for Func
        where
            Func: Fn($($ty),+),
        {
            #[inline(always)]
            fn call(&self, args: ($($ty,)+)) {
                (self)($(args.$idx),+)
            }
        }
    };
}

impl_pipeline!(1; A: 0);
impl_pipeline!(2; A: 0, B: 1);
impl_pipeline!(3; A: 0, B: 1, C: 2);
impl_pipeline!(4; A: 0, B: 1, C: 2, D: 3);
impl_pipeline!(5; A: 0, B: 1, C: 2, D: 3, E: 4);
impl_pipeline!(6; A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_pipeline!(7; A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_pipeline!(8; A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);
