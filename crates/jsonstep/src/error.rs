use thiserror::Error;

/// A grammar violation, before a position is attached.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxError {
    /// A byte that cannot appear where it was found.
    #[error("Unexpected token '{}'", char::from(*.0))]
    UnexpectedToken(u8),
    /// A closing bracket, or the end of input, arrived inside a string.
    #[error("Unterminated string in JSON")]
    UnterminatedString,
    /// Object members must start with a quoted name.
    #[error("Expected property name or '}}' in JSON")]
    ExpectedPropertyName,
}

/// An error terminating a parsing session.
///
/// Every variant except [`ParserError::UnexpectedEndOfInput`] records the
/// absolute byte offset at which the violation was detected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParserError {
    /// A positioned grammar violation.
    #[error("{source} at position {position}")]
    Syntax {
        /// What went wrong.
        #[source]
        source: SyntaxError,
        /// Bytes consumed by earlier chunks plus the index in the current one.
        position: usize,
    },
    /// The input ended before a document was complete, or held no document.
    #[error("Unexpected end of JSON input")]
    UnexpectedEndOfInput,
}

impl ParserError {
    pub(crate) const fn at(source: SyntaxError, position: usize) -> Self {
        Self::Syntax { source, position }
    }

    /// The byte offset of the violation, if the error has one.
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        match self {
            Self::Syntax { position, .. } => Some(*position),
            Self::UnexpectedEndOfInput => None,
        }
    }

    /// The underlying grammar violation, if any.
    #[must_use]
    pub const fn syntax_error(&self) -> Option<SyntaxError> {
        match self {
            Self::Syntax { source, .. } => Some(*source),
            Self::UnexpectedEndOfInput => None,
        }
    }
}
