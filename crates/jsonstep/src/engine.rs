//! The byte-driven tokenizing engine.
//!
//! Overview
//! - [`advance`] consumes one chunk of input against a [`ParseState`] and
//!   yields [`ParseEvent`]s lazily, one per call to `next`. Chunk boundaries
//!   may fall anywhere, including between a backslash and the byte it
//!   escapes; everything the engine needs to resume lives in the state.
//! - [`finalize`] runs once after the last chunk. It closes value literals
//!   left open at the end of input and reports constructs that were never
//!   terminated.
//!
//! Value literals
//! - Numbers and the `true`/`false`/`null` keywords have no closing
//!   delimiter. They end on the next `,`, `]` or `}`, or at end of input.
//!   When a delimiter closes a literal the engine emits
//!   [`ParseEvent::ValueLiteralEnd`] *without* consuming the delimiter; the
//!   same byte is examined again on the following call, which then emits the
//!   delimiter's own event. The cursor only moves forward when a byte has been
//!   fully handled.
//!
//! Termination
//! - Calling `stop` (or `resume(true)`) marks the session as done. No further
//!   events or errors are produced for it, and the state must not be reused.
//! - After an error the session is dead as well: every iterator over the
//!   state returns `None`.
use core::{borrow::BorrowMut, iter::FusedIterator};

use tracing::{debug, trace};

use crate::{
    charset::{ByteClass, Token, classify, is_value_literal_start},
    error::{ParserError, SyntaxError},
    event::{Context, ParseEvent},
    state::ParseState,
};

/// Feeds one chunk of input to the engine.
///
/// The returned iterator yields the events for `chunk` and then ends. Once
/// it is exhausted, the chunk's length is added to the state's input index
/// so that error positions in later chunks are absolute.
///
/// Both arguments may be borrowed or owned; an adapter that owns its
/// [`ParseState`] gets it back through [`Advance::into_parts`].
///
/// # Examples
///
/// ```
/// use jsonstep::{ParseEvent, ParseState, engine};
///
/// let mut state = ParseState::new();
/// let mut events = Vec::new();
/// for chunk in ["[tr", "ue]"] {
///     for event in engine::advance(chunk, &mut state) {
///         events.push(event.unwrap());
///     }
/// }
/// for event in engine::finalize(&mut state) {
///     events.push(event.unwrap());
/// }
/// assert_eq!(events.first(), Some(&ParseEvent::ArrayStart));
/// assert_eq!(events.last(), Some(&ParseEvent::ArrayEnd));
/// ```
pub fn advance<C, S>(chunk: C, state: S) -> Advance<C, S>
where
    C: AsRef<[u8]>,
    S: BorrowMut<ParseState>,
{
    let offset = {
        let state: &ParseState = state.borrow();
        state.input_index
    };
    trace!(len = chunk.as_ref().len(), offset, "advancing chunk");
    Advance {
        chunk,
        state,
        cursor: 0,
        consumed: false,
    }
}

/// Signals the end of input.
///
/// Must be called once, after every chunk was drained, unless the session
/// was stopped or failed.
pub fn finalize<S: BorrowMut<ParseState>>(state: S) -> Finish<S> {
    {
        let state: &ParseState = state.borrow();
        trace!(depth = state.stack.len(), offset = state.input_index, "finalizing");
    }
    Finish { state }
}

/// What handling one byte produced.
enum Step {
    /// The byte was consumed without an event.
    Skip,
    /// The byte was consumed and produced an event.
    Emit(ParseEvent),
    /// An implicitly terminated literal was closed; the byte is still
    /// pending and must be examined again.
    Revisit(ParseEvent),
}

/// Iterator over the events of a single chunk. See [`advance`].
#[derive(Debug)]
pub struct Advance<C, S> {
    chunk: C,
    state: S,
    cursor: usize,
    consumed: bool,
}

impl<C: AsRef<[u8]>, S: BorrowMut<ParseState>> Advance<C, S> {
    /// Pulls the next event, or stops the session when `stop` is `true`.
    pub fn resume(&mut self, stop: bool) -> Option<Result<ParseEvent, ParserError>> {
        if stop {
            self.stop();
            return None;
        }
        self.next()
    }

    /// Stops the session. Subsequent calls return `None`.
    pub fn stop(&mut self) {
        debug!(offset = self.offset(), "parsing stopped by caller");
        self.state_mut().stop();
    }

    /// The absolute offset of the byte under the cursor.
    #[must_use]
    pub fn offset(&self) -> usize {
        // Once consumed, the chunk is already counted in the input index.
        if self.consumed {
            self.state().input_index
        } else {
            self.state().input_index + self.cursor
        }
    }

    /// The session state.
    #[must_use]
    pub fn state(&self) -> &ParseState {
        self.state.borrow()
    }

    /// Whether every byte of the chunk was handled.
    #[must_use]
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Releases the chunk and the state.
    pub fn into_parts(self) -> (C, S) {
        (self.chunk, self.state)
    }

    fn state_mut(&mut self) -> &mut ParseState {
        self.state.borrow_mut()
    }
}

impl<C: AsRef<[u8]>, S: BorrowMut<ParseState>> Iterator for Advance<C, S> {
    type Item = Result<ParseEvent, ParserError>;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk = self.chunk.as_ref();
        let state: &mut ParseState = self.state.borrow_mut();
        while state.is_live() {
            let Some(&byte) = chunk.get(self.cursor) else {
                if !self.consumed {
                    self.consumed = true;
                    state.input_index += chunk.len();
                }
                return None;
            };

            let position = state.input_index + self.cursor;
            match step(state, byte, position) {
                Ok(Step::Skip) => self.cursor += 1,
                Ok(Step::Emit(event)) => {
                    self.cursor += 1;
                    return Some(Ok(event));
                }
                Ok(Step::Revisit(event)) => return Some(Ok(event)),
                Err(err) => {
                    debug!(%err, "syntax error");
                    state.errored = true;
                    return Some(Err(err));
                }
            }
        }
        None
    }
}

impl<C: AsRef<[u8]>, S: BorrowMut<ParseState>> FusedIterator for Advance<C, S> {}

/// Iterator over the end-of-input events. See [`finalize`].
#[derive(Debug)]
pub struct Finish<S> {
    state: S,
}

impl<S: BorrowMut<ParseState>> Finish<S> {
    /// Pulls the next event, or stops the session when `stop` is `true`.
    pub fn resume(&mut self, stop: bool) -> Option<Result<ParseEvent, ParserError>> {
        if stop {
            self.stop();
            return None;
        }
        self.next()
    }

    /// Stops the session. Subsequent calls return `None`.
    pub fn stop(&mut self) {
        debug!("parsing stopped by caller during finalization");
        self.state_mut().stop();
    }

    /// The session state.
    #[must_use]
    pub fn state(&self) -> &ParseState {
        self.state.borrow()
    }

    /// Releases the state.
    pub fn into_state(self) -> S {
        self.state
    }

    fn fail(&mut self, err: ParserError) -> Option<Result<ParseEvent, ParserError>> {
        debug!(%err, "incomplete input");
        self.state_mut().errored = true;
        Some(Err(err))
    }

    fn state_mut(&mut self) -> &mut ParseState {
        self.state.borrow_mut()
    }
}

impl<S: BorrowMut<ParseState>> Iterator for Finish<S> {
    type Item = Result<ParseEvent, ParserError>;

    fn next(&mut self) -> Option<Self::Item> {
        let state: &mut ParseState = self.state.borrow_mut();
        if !state.is_live() {
            return None;
        }
        if state.opening.is_none() {
            return self.fail(ParserError::UnexpectedEndOfInput);
        }

        // Literals are legally closed by the end of input.
        if state.top().is_some_and(Context::is_value_literal) {
            state.stack.pop();
            return Some(Ok(ParseEvent::ValueLiteralEnd));
        }

        if state.stack.contains(&Context::StringStart) {
            let position = state.input_index;
            return self.fail(ParserError::at(SyntaxError::UnterminatedString, position));
        }
        if !state.stack.is_empty() {
            return self.fail(ParserError::UnexpectedEndOfInput);
        }
        None
    }
}

impl<S: BorrowMut<ParseState>> FusedIterator for Finish<S> {}

/// Handles a single byte.
fn step(state: &mut ParseState, byte: u8, position: usize) -> Result<Step, ParserError> {
    let class = classify(byte);

    if class == ByteClass::Whitespace {
        return Ok(if state.in_string() {
            Step::Emit(ParseEvent::Character { byte })
        } else {
            Step::Skip
        });
    }

    check_legality(state, byte).map_err(|err| ParserError::at(err, position))?;

    if state.stack.is_empty() {
        return open_document(state, byte, class)
            .map(Step::Emit)
            .map_err(|err| ParserError::at(err, position));
    }

    let in_string = state.in_string();
    let step = match class {
        ByteClass::Structural(Token::Comma) if !in_string => {
            if let Some(event) = close_value_literal(state) {
                Step::Revisit(event)
            } else if state.top().is_some_and(Context::is_container) {
                Step::Emit(ParseEvent::PropertySplit)
            } else {
                Step::Skip
            }
        }
        ByteClass::Structural(Token::Colon) if !in_string => {
            state.stack.push(Context::KeyValueSplit);
            Step::Emit(ParseEvent::KeyValueSplit)
        }
        ByteClass::Structural(Token::LeftSquareBracket) if !in_string => {
            state.stack.push(Context::ArrayStart);
            Step::Emit(ParseEvent::ArrayStart)
        }
        ByteClass::Structural(Token::RightSquareBracket) if !in_string => {
            if let Some(event) = close_value_literal(state) {
                Step::Revisit(event)
            } else {
                state.stack.pop();
                close_member_value(state);
                Step::Emit(ParseEvent::ArrayEnd)
            }
        }
        ByteClass::Structural(Token::LeftCurlyBracket) if !in_string => {
            state.stack.push(Context::ObjectStart);
            Step::Emit(ParseEvent::ObjectStart)
        }
        ByteClass::Structural(Token::RightCurlyBracket) if !in_string => {
            if let Some(event) = close_value_literal(state) {
                Step::Revisit(event)
            } else {
                // `{"key":}` leaves the split open.
                if state.top() == Some(Context::KeyValueSplit) {
                    state.stack.pop();
                }
                state.stack.pop();
                close_member_value(state);
                Step::Emit(ParseEvent::ObjectEnd)
            }
        }
        ByteClass::LiteralStart
            if !matches!(
                state.top(),
                Some(Context::ValueLiteralStart { .. } | Context::StringStart)
            ) =>
        {
            if state.awaiting_member_value() {
                state.stack.pop();
            }
            state.stack.push(Context::ValueLiteralStart { byte });
            Step::Emit(ParseEvent::ValueLiteralStart { byte })
        }
        ByteClass::Structural(Token::DoubleQuote)
            if !(in_string && state.string_escape_pending) =>
        {
            if state.awaiting_member_value() {
                state.stack.pop();
            }
            if state.in_string() {
                state.stack.pop();
                state.string_escape_pending = false;
                Step::Emit(ParseEvent::StringEnd)
            } else {
                state.stack.push(Context::StringStart);
                Step::Emit(ParseEvent::StringStart)
            }
        }
        _ if in_string => {
            state.string_escape_pending = byte == b'\\' && !state.string_escape_pending;
            Step::Emit(ParseEvent::Character { byte })
        }
        _ if state.top().is_some_and(Context::is_value_literal) => {
            Step::Emit(ParseEvent::Character { byte })
        }
        _ => {
            return Err(ParserError::at(SyntaxError::UnexpectedToken(byte), position));
        }
    };
    Ok(step)
}

/// Produces the document's single opening event.
fn open_document(
    state: &mut ParseState,
    byte: u8,
    class: ByteClass,
) -> Result<ParseEvent, SyntaxError> {
    if state.opening.is_some() {
        // Trailing data after a complete document.
        return Err(SyntaxError::UnexpectedToken(byte));
    }
    let event = match class {
        ByteClass::Structural(Token::LeftCurlyBracket) => ParseEvent::ObjectStart,
        ByteClass::Structural(Token::LeftSquareBracket) => ParseEvent::ArrayStart,
        ByteClass::Structural(Token::DoubleQuote) => ParseEvent::StringStart,
        ByteClass::LiteralStart => ParseEvent::ValueLiteralStart { byte },
        _ => return Err(SyntaxError::UnexpectedToken(byte)),
    };
    trace!(%event, "document opened");
    state.opening = Some(event);
    if let Some(context) = event.context() {
        state.stack.push(context);
    }
    Ok(event)
}

/// Pops an open value literal, returning the event that closes it.
fn close_value_literal(state: &mut ParseState) -> Option<ParseEvent> {
    if state.top().is_some_and(Context::is_value_literal) {
        state.stack.pop();
        Some(ParseEvent::ValueLiteralEnd)
    } else {
        None
    }
}

/// After a container closes: if it was an object member's value, the
/// member is complete and its split marker goes too.
fn close_member_value(state: &mut ParseState) {
    if state.top() == Some(Context::KeyValueSplit) {
        state.stack.pop();
    }
}

/// Rejects bytes that cannot appear given the innermost open construct.
///
/// Runs before the stack is touched, and again whenever a byte is
/// re-examined after closing a literal.
fn check_legality(state: &ParseState, byte: u8) -> Result<(), SyntaxError> {
    let Some(top) = state.top() else {
        return Ok(());
    };
    if top == Context::StringStart {
        return Ok(());
    }

    if state.awaiting_member_value() && (is_value_literal_start(byte) || matches!(byte, b'"' | b','))
    {
        return Ok(());
    }
    if top == Context::ObjectStart && byte == b':' {
        return Ok(());
    }

    match byte {
        b',' => {
            let closes_literal =
                top.is_value_literal() && state.beneath().is_some_and(Context::is_container);
            if top.is_container() || closes_literal {
                return Ok(());
            }
            return Err(SyntaxError::UnexpectedToken(byte));
        }
        b':' => return Err(SyntaxError::ExpectedPropertyName),
        _ => {}
    }

    if top == Context::ObjectStart && !matches!(byte, b'"' | b'}') {
        return Err(SyntaxError::ExpectedPropertyName);
    }

    // Closing brackets must match the construct they close.
    let mismatched = match byte {
        b']' => !(top == Context::ArrayStart || top.is_value_literal()),
        b'}' => !matches!(
            top,
            Context::ObjectStart | Context::KeyValueSplit | Context::ValueLiteralStart { .. }
        ),
        _ => false,
    };
    if mismatched {
        return Err(SyntaxError::UnexpectedToken(byte));
    }
    Ok(())
}
