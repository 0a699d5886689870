//! Static classification of raw input bytes.
//!
//! The engine never decodes UTF-8: every decision it makes is driven by a
//! single byte, and the bytes that matter are all ASCII. Anything outside the
//! tables below is [`ByteClass::Other`] and is only legal as content of an
//! open string or value literal.

/// Bytes with structural meaning outside of strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Token {
    /// `[`
    LeftSquareBracket = b'[',
    /// `]`
    RightSquareBracket = b']',
    /// `{`
    LeftCurlyBracket = b'{',
    /// `}`
    RightCurlyBracket = b'}',
    /// `:`
    Colon = b':',
    /// `,`
    Comma = b',',
    /// `"`
    DoubleQuote = b'"',
    /// `\`
    BackwardSlash = b'\\',
}

impl Token {
    /// Looks up the structural token for `byte`, if it is one.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            b'[' => Self::LeftSquareBracket,
            b']' => Self::RightSquareBracket,
            b'{' => Self::LeftCurlyBracket,
            b'}' => Self::RightCurlyBracket,
            b':' => Self::Colon,
            b',' => Self::Comma,
            b'"' => Self::DoubleQuote,
            b'\\' => Self::BackwardSlash,
            _ => return None,
        })
    }
}

/// The class a single byte belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteClass {
    /// One of `[ ] { } : , " \`.
    Structural(Token),
    /// A byte that may begin a value literal: `0`-`9`, `t`, `f` or `n`.
    LiteralStart,
    /// Space, horizontal tab, line feed or carriage return.
    Whitespace,
    /// Everything else.
    Other,
}

/// Classifies `byte`.
///
/// ```
/// use jsonstep::charset::{ByteClass, Token, classify};
///
/// assert_eq!(classify(b'{'), ByteClass::Structural(Token::LeftCurlyBracket));
/// assert_eq!(classify(b'7'), ByteClass::LiteralStart);
/// assert_eq!(classify(b'\t'), ByteClass::Whitespace);
/// assert_eq!(classify(b'.'), ByteClass::Other);
/// ```
#[must_use]
pub const fn classify(byte: u8) -> ByteClass {
    if let Some(token) = Token::from_byte(byte) {
        ByteClass::Structural(token)
    } else if is_value_literal_start(byte) {
        ByteClass::LiteralStart
    } else if is_whitespace(byte) {
        ByteClass::Whitespace
    } else {
        ByteClass::Other
    }
}

/// Whitespace allowed between tokens. Inside strings these are content.
#[inline]
#[must_use]
pub const fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

/// Bytes that open a number or one of the `true`, `false` and `null`
/// keywords. The period is valid inside a number but never starts one.
#[inline]
#[must_use]
pub const fn is_value_literal_start(byte: u8) -> bool {
    matches!(byte, b'0'..=b'9' | b't' | b'f' | b'n')
}
