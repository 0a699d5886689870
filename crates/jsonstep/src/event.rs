//! Events emitted by the tokenizer and the context markers it tracks.
//!
//! A [`ParseEvent`] carries at most one raw byte. Turning events back into
//! values is left to the caller.
//!
//! # Examples
//!
//! ```
//! use jsonstep::{MemoryParser, ParseEvent};
//!
//! let parser = MemoryParser::new("[\"a\"]");
//! let events: Vec<_> = parser.parse().collect();
//! assert_eq!(
//!     events,
//!     vec![
//!         Ok(ParseEvent::ArrayStart),
//!         Ok(ParseEvent::StringStart),
//!         Ok(ParseEvent::Character { byte: b'a' }),
//!         Ok(ParseEvent::StringEnd),
//!         Ok(ParseEvent::ArrayEnd),
//!     ]
//! );
//! ```
use core::fmt;

/// A structural event produced from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
#[cfg_attr(any(test, feature = "serde"), serde(tag = "kind"))]
pub enum ParseEvent {
    /// `{`
    ObjectStart,
    /// `}`
    ObjectEnd,
    /// `[`
    ArrayStart,
    /// `]`
    ArrayEnd,
    /// Opening `"` of a string, key or value.
    StringStart,
    /// Closing `"` of a string.
    StringEnd,
    /// First byte of a number, `true`, `false` or `null`. The byte tells the
    /// literal kinds apart.
    ValueLiteralStart {
        /// The literal's first byte.
        byte: u8,
    },
    /// A value literal was closed by a terminating byte or end of input.
    ValueLiteralEnd,
    /// One raw byte belonging to an open string or value literal. Escape
    /// sequences are not decoded.
    Character {
        /// The content byte.
        byte: u8,
    },
    /// `:` between an object key and its value.
    KeyValueSplit,
    /// `,` between array elements or object members.
    PropertySplit,
}

impl ParseEvent {
    /// The context marker this event pushes, if it opens a construct.
    #[must_use]
    pub const fn context(&self) -> Option<Context> {
        match self {
            Self::ObjectStart => Some(Context::ObjectStart),
            Self::ArrayStart => Some(Context::ArrayStart),
            Self::StringStart => Some(Context::StringStart),
            Self::ValueLiteralStart { byte } => Some(Context::ValueLiteralStart { byte: *byte }),
            Self::KeyValueSplit => Some(Context::KeyValueSplit),
            _ => None,
        }
    }

    /// Returns the byte carried by `Character` and `ValueLiteralStart`.
    #[must_use]
    pub const fn byte(&self) -> Option<u8> {
        match self {
            Self::ValueLiteralStart { byte } | Self::Character { byte } => Some(*byte),
            _ => None,
        }
    }
}

impl fmt::Display for ParseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ObjectStart => f.write_str("OBJECT_START"),
            Self::ObjectEnd => f.write_str("OBJECT_END"),
            Self::ArrayStart => f.write_str("ARRAY_START"),
            Self::ArrayEnd => f.write_str("ARRAY_END"),
            Self::StringStart => f.write_str("STRING_START"),
            Self::StringEnd => f.write_str("STRING_END"),
            Self::ValueLiteralStart { byte } => {
                write!(f, "VALUE_LITERAL_START({:?})", char::from(*byte))
            }
            Self::ValueLiteralEnd => f.write_str("VALUE_LITERAL_END"),
            Self::Character { byte } => write!(f, "CHARACTER({:?})", char::from(*byte)),
            Self::KeyValueSplit => f.write_str("KEY_VALUE_SPLIT"),
            Self::PropertySplit => f.write_str("PROPERTY_SPLIT"),
        }
    }
}

/// A marker on the context stack recording one open construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    /// Inside an object.
    ObjectStart,
    /// Inside an array.
    ArrayStart,
    /// Inside a string.
    StringStart,
    /// Inside a number or keyword literal.
    ValueLiteralStart {
        /// The literal's first byte.
        byte: u8,
    },
    /// Between an object key's `:` and the start of its value. Always sits
    /// directly on an [`Context::ObjectStart`].
    KeyValueSplit,
}

impl Context {
    /// The event that opened this context.
    #[must_use]
    pub const fn event(self) -> ParseEvent {
        match self {
            Self::ObjectStart => ParseEvent::ObjectStart,
            Self::ArrayStart => ParseEvent::ArrayStart,
            Self::StringStart => ParseEvent::StringStart,
            Self::ValueLiteralStart { byte } => ParseEvent::ValueLiteralStart { byte },
            Self::KeyValueSplit => ParseEvent::KeyValueSplit,
        }
    }

    /// `true` for objects and arrays.
    #[inline]
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::ObjectStart | Self::ArrayStart)
    }

    #[inline]
    #[must_use]
    pub(crate) const fn is_value_literal(self) -> bool {
        matches!(self, Self::ValueLiteralStart { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_events_round_trip_through_context() {
        for event in [
            ParseEvent::ObjectStart,
            ParseEvent::ArrayStart,
            ParseEvent::StringStart,
            ParseEvent::ValueLiteralStart { byte: b'n' },
            ParseEvent::KeyValueSplit,
        ] {
            assert_eq!(event.context().map(Context::event), Some(event));
        }
        assert_eq!(ParseEvent::PropertySplit.context(), None);
        assert_eq!(ParseEvent::Character { byte: b'x' }.context(), None);
    }

    #[test]
    fn display_uses_event_names() {
        use alloc::string::ToString;

        assert_eq!(ParseEvent::KeyValueSplit.to_string(), "KEY_VALUE_SPLIT");
        assert_eq!(
            ParseEvent::ValueLiteralStart { byte: b't' }.to_string(),
            "VALUE_LITERAL_START('t')"
        );
        assert_eq!(
            ParseEvent::Character { byte: b'\n' }.to_string(),
            "CHARACTER('\\n')"
        );
    }
}
