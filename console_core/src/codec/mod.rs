//! Token codecs: one [`Decode`] implementation per supported parameter type.
//!
//! +-----------------------------+------------------------------------------------+
//! | Type                        | Accepted tokens                                |
//! +-----------------------------+------------------------------------------------+
//! | i8 i16 i32 i64 i128 isize   | `42`, `-7`, `+3`, `0x1F`, `-0b101`, `0o17`     |
//! | u8 u16 u32 u64 u128 usize   | same, without a leading `-`                    |
//! | f32 f64                     | `1.5`, `-2`, `3e8`, `inf`, `NaN`               |
//! | bool                        | `1 true True TRUE` / `0 false False FALSE`     |
//! | char                        | exactly one Unicode scalar                     |
//! | &str                        | anything, borrowed from the line               |
//! +-----------------------------+------------------------------------------------+
//!
//! Every codec must consume the whole token: `12abc` is invalid, not `12`.

use crate::error::InvalidFormat;

/// Decode one token into `Self`.
///
/// The lifetime lets text parameters borrow the token instead of copying it.
pub trait Decode<'t>: Sized {
    /// Type name shown in diagnostics.
    const TYPE_NAME: &'static str;

    fn decode(token: &'t str) -> Result<Self, InvalidFormat>;
}

/// Strip one leading sign. Returns `(negative, rest)`.
fn split_sign(token: &str) -> (bool, &str) {
    if let Some(rest) = token.strip_prefix('-') {
        (true, rest)
    } else {
        (false, token.strip_prefix('+').unwrap_or(token))
    }
}

/// Detect a `0x` / `0o` / `0b` prefix (either case).
fn split_radix(digits: &str) -> (u32, &str) {
    let bytes = digits.as_bytes();
    if bytes.len() > 2 && bytes[0] == b'0' {
        match bytes[1] {
            b'x' | b'X' => return (16, &digits[2..]),
            b'o' | b'O' => return (8, &digits[2..]),
            b'b' | b'B' => return (2, &digits[2..]),
            _ => {}
        }
    }
    (10, digits)
}

/// Parse the unsigned magnitude of an integer token.
///
/// `from_str_radix` tolerates its own leading sign; a second sign is rejected here.
fn parse_magnitude(digits: &str) -> Option<u128> {
    let (radix, digits) = split_radix(digits);
    match digits.as_bytes().first() {
        Some(b) if b.is_ascii_alphanumeric() => u128::from_str_radix(digits, radix).ok(),
        _ => None,
    }
}

fn parse_signed(token: &str) -> Option<i128> {
    let (negative, digits) = split_sign(token);
    let magnitude = parse_magnitude(digits)?;
    if !negative {
        return i128::try_from(magnitude).ok();
    }
    if magnitude == i128::MIN.unsigned_abs() {
        Some(i128::MIN)
    } else {
        i128::try_from(magnitude).ok().map(|v| -v)
    }
}

fn parse_unsigned(token: &str) -> Option<u128> {
    match split_sign(token) {
        (true, _) => None,
        (false, digits) => parse_magnitude(digits),
    }
}

macro_rules! impl_decode_int {
    ($parse:ident => $($ty:ty),+) => {$(
        impl<'t> Decode<'t> for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);

            #[inline]
            fn decode(token: &'t str) -> Result<Self, InvalidFormat> {
                $parse(token)
                    .and_then(|v| <$ty>::try_from(v).ok())
                    .ok_or(InvalidFormat::new(Self::TYPE_NAME))
            }
        }
    )+};
}

impl_decode_int!(parse_signed => i8, i16, i32, i64, i128, isize);
impl_decode_int!(parse_unsigned => u8, u16, u32, u64, u128, usize);

macro_rules! impl_decode_float {
    ($($ty:ty),+) => {$(
        impl<'t> Decode<'t> for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);

            #[inline]
            fn decode(token: &'t str) -> Result<Self, InvalidFormat> {
                token.parse::<$ty>().map_err(|_| InvalidFormat::new(Self::TYPE_NAME))
            }
        }
    )+};
}

impl_decode_float!(f32, f64);

impl<'t> Decode<'t> for bool {
    const TYPE_NAME: &'static str = "bool";

    fn decode(token: &'t str) -> Result<Self, InvalidFormat> {
        match token {
            "1" | "true" | "True" | "TRUE" => Ok(true),
            "0" | "false" | "False" | "FALSE" => Ok(false),
            _ => Err(InvalidFormat::new(Self::TYPE_NAME)),
        }
    }
}

impl<'t> Decode<'t> for char {
    const TYPE_NAME: &'static str = "char";

    fn decode(token: &'t str) -> Result<Self, InvalidFormat> {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(InvalidFormat::new(Self::TYPE_NAME)),
        }
    }
}

impl<'t> Decode<'t> for &'t str {
    const TYPE_NAME: &'static str = "str";

    #[inline]
    fn decode(token: &'t str) -> Result<Self, InvalidFormat> {
        Ok(token)
    }
}
