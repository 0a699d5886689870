use alloc::vec::Vec;

use crate::event::{Context, ParseEvent};

/// The resumable state of one parsing session.
///
/// A `ParseState` is created fresh for every session and handed to the
/// engine together with each chunk. It is never shared between sessions:
/// restarting a parse always begins from byte zero with a new state.
#[derive(Debug, Clone, Default)]
pub struct ParseState {
    /// Open constructs, innermost last.
    pub(crate) stack: Vec<Context>,
    /// The first opening event produced, if any.
    pub(crate) opening: Option<ParseEvent>,
    /// Inside a string, the previous byte was a backslash that has not yet
    /// escaped anything.
    pub(crate) string_escape_pending: bool,
    /// The caller asked to stop. Nothing is emitted afterwards.
    pub(crate) done: bool,
    /// A grammar error was reported. Nothing is emitted afterwards.
    pub(crate) errored: bool,
    /// Bytes consumed by fully processed chunks.
    pub(crate) input_index: usize,
}

impl ParseState {
    /// Creates the state for a new session.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stack: Vec::with_capacity(16),
            ..Self::default()
        }
    }

    /// Requests termination. Any engine iterator driving this state stops
    /// immediately, without further events or errors.
    pub fn stop(&mut self) {
        self.done = true;
    }

    /// Whether termination was requested.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Whether the session failed with a grammar error.
    #[must_use]
    pub fn is_errored(&self) -> bool {
        self.errored
    }

    /// The number of bytes consumed from completed chunks.
    #[must_use]
    pub fn input_index(&self) -> usize {
        self.input_index
    }

    /// The first opening event of the document, once one was produced.
    #[must_use]
    pub fn opening_event(&self) -> Option<ParseEvent> {
        self.opening
    }

    /// The open constructs, outermost first.
    #[must_use]
    pub fn contexts(&self) -> &[Context] {
        &self.stack
    }

    /// Innermost open construct.
    #[inline]
    pub(crate) fn top(&self) -> Option<Context> {
        self.stack.last().copied()
    }

    /// The construct directly enclosing the innermost one.
    #[inline]
    pub(crate) fn beneath(&self) -> Option<Context> {
        self.stack.len().checked_sub(2).map(|i| self.stack[i])
    }

    /// Strings cannot contain other constructs, so a string marker can only
    /// ever be the innermost one.
    #[inline]
    pub(crate) fn in_string(&self) -> bool {
        self.top() == Some(Context::StringStart)
    }

    /// `:` was seen and the member's value has not started yet.
    #[inline]
    pub(crate) fn awaiting_member_value(&self) -> bool {
        self.top() == Some(Context::KeyValueSplit) && self.beneath() == Some(Context::ObjectStart)
    }

    /// Whether the session may still produce events.
    #[inline]
    pub(crate) fn is_live(&self) -> bool {
        !self.done && !self.errored
    }
}
