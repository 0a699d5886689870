//! Tokenizing a buffer that is already in memory.
use alloc::{string::String, vec::Vec};
use core::{iter::FusedIterator, mem};

use tracing::debug;

use crate::{
    ParseEvent, ParseState, ParserError, ParserOptions,
    engine::{self, Advance, Finish},
};

/// Tokenizes an in-memory byte sequence, `buffer_size` bytes at a time.
///
/// Every call to [`MemoryParser::parse`] starts an independent session from
/// the first byte, so the same parser can be iterated any number of times
/// with identical results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryParser {
    input: Vec<u8>,
    options: ParserOptions,
}

impl MemoryParser {
    /// Creates a parser with default options.
    pub fn new(input: impl Into<Vec<u8>>) -> Self {
        Self::with_options(input, ParserOptions::default())
    }

    /// Creates a parser with the given options.
    pub fn with_options(input: impl Into<Vec<u8>>, options: ParserOptions) -> Self {
        Self {
            input: input.into(),
            options,
        }
    }

    /// The bytes being tokenized.
    #[must_use]
    pub fn input(&self) -> &[u8] {
        &self.input
    }

    /// The options in effect.
    #[must_use]
    pub fn options(&self) -> ParserOptions {
        self.options
    }

    /// Begins a new session.
    #[must_use]
    pub fn parse(&self) -> MemoryParse<'_> {
        debug!(
            len = self.input.len(),
            buffer_size = self.options.buffer_size(),
            "starting in-memory parse"
        );
        let mut session = MemoryParse {
            input: &self.input,
            chunk_size: self.options.buffer_size(),
            offset: 0,
            phase: Phase::Done,
        };
        session.phase = session.next_phase(ParseState::new());
        session
    }
}

impl From<Vec<u8>> for MemoryParser {
    fn from(input: Vec<u8>) -> Self {
        Self::new(input)
    }
}

impl From<&[u8]> for MemoryParser {
    fn from(input: &[u8]) -> Self {
        Self::new(input)
    }
}

impl From<String> for MemoryParser {
    fn from(input: String) -> Self {
        Self::new(input)
    }
}

impl From<&str> for MemoryParser {
    fn from(input: &str) -> Self {
        Self::new(input)
    }
}

#[derive(Debug)]
enum Phase<'a> {
    Chunks(Advance<&'a [u8], ParseState>),
    Finishing(Finish<ParseState>),
    Done,
}

/// One session over a [`MemoryParser`]'s input.
///
/// Yields every event of the document, or the events up to and including
/// the first error. The iterator is fused.
#[derive(Debug)]
pub struct MemoryParse<'a> {
    input: &'a [u8],
    chunk_size: usize,
    /// End of the last chunk handed to the engine.
    offset: usize,
    phase: Phase<'a>,
}

impl<'a> MemoryParse<'a> {
    /// Pulls the next event, or stops the session when `stop` is `true`.
    pub fn resume(&mut self, stop: bool) -> Option<Result<ParseEvent, ParserError>> {
        if stop {
            self.stop();
            return None;
        }
        self.next()
    }

    /// Ends the session. No further events or errors are produced.
    pub fn stop(&mut self) {
        match &mut self.phase {
            Phase::Chunks(advance) => advance.stop(),
            Phase::Finishing(finish) => finish.stop(),
            Phase::Done => {}
        }
        self.phase = Phase::Done;
    }

    /// Whether the session can no longer produce anything.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Done)
    }

    fn next_phase(&mut self, state: ParseState) -> Phase<'a> {
        if self.offset < self.input.len() {
            let end = self.input.len().min(self.offset.saturating_add(self.chunk_size));
            let chunk = &self.input[self.offset..end];
            self.offset = end;
            Phase::Chunks(engine::advance(chunk, state))
        } else {
            Phase::Finishing(engine::finalize(state))
        }
    }
}

impl Iterator for MemoryParse<'_> {
    type Item = Result<ParseEvent, ParserError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match mem::replace(&mut self.phase, Phase::Done) {
                Phase::Chunks(mut advance) => {
                    if let Some(item) = advance.next() {
                        self.phase = Phase::Chunks(advance);
                        return Some(item);
                    }
                    let (_, state) = advance.into_parts();
                    if !state.is_live() {
                        return None;
                    }
                    self.phase = self.next_phase(state);
                }
                Phase::Finishing(mut finish) => {
                    let item = finish.next();
                    if item.is_some() {
                        self.phase = Phase::Finishing(finish);
                    }
                    return item;
                }
                Phase::Done => return None,
            }
        }
    }
}

impl FusedIterator for MemoryParse<'_> {}
