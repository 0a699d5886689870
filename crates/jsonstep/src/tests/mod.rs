mod chunking;
mod parse_bad;
mod snapshot_events;

use alloc::vec::Vec;

use crate::{MemoryParser, ParseEvent, ParseState, ParserError, ParserOptions, engine};

/// Runs a whole session through the in-memory adapter.
pub(crate) fn parse_all(input: &str) -> (Vec<ParseEvent>, Option<ParserError>) {
    drain(MemoryParser::with_options(input, ParserOptions::default()).parse())
}

/// Feeds `input` to the engine directly, `size` bytes at a time, so chunk
/// sizes below the adapters' minimum can be exercised.
pub(crate) fn parse_chunked(input: &[u8], size: usize) -> (Vec<ParseEvent>, Option<ParserError>) {
    parse_parts(input.chunks(size.max(1)))
}

/// Feeds each part to the engine in order, then finalizes.
pub(crate) fn parse_parts<'a>(
    parts: impl IntoIterator<Item = &'a [u8]>,
) -> (Vec<ParseEvent>, Option<ParserError>) {
    let mut state = ParseState::new();
    let mut events = Vec::new();
    for part in parts {
        for event in engine::advance(part, &mut state) {
            match event {
                Ok(event) => events.push(event),
                Err(err) => return (events, Some(err)),
            }
        }
    }
    let (mut tail, err) = drain(engine::finalize(&mut state));
    events.append(&mut tail);
    (events, err)
}

/// Collects events until the first error.
pub(crate) fn drain(
    events: impl Iterator<Item = Result<ParseEvent, ParserError>>,
) -> (Vec<ParseEvent>, Option<ParserError>) {
    let mut out = Vec::new();
    for event in events {
        match event {
            Ok(event) => out.push(event),
            Err(err) => return (out, Some(err)),
        }
    }
    (out, None)
}

/// Writes the events back out as compact JSON text.
pub(crate) fn reconstruct(events: &[ParseEvent]) -> Vec<u8> {
    let mut out = Vec::new();
    for event in events {
        match *event {
            ParseEvent::ObjectStart => out.push(b'{'),
            ParseEvent::ObjectEnd => out.push(b'}'),
            ParseEvent::ArrayStart => out.push(b'['),
            ParseEvent::ArrayEnd => out.push(b']'),
            ParseEvent::StringStart | ParseEvent::StringEnd => out.push(b'"'),
            ParseEvent::ValueLiteralStart { byte } | ParseEvent::Character { byte } => {
                out.push(byte);
            }
            ParseEvent::ValueLiteralEnd => {}
            ParseEvent::KeyValueSplit => out.push(b':'),
            ParseEvent::PropertySplit => out.push(b','),
        }
    }
    out
}
