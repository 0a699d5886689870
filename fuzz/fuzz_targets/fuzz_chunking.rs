#![no_main]
use std::cell::RefCell;

use arbitrary::Unstructured;
use jsonstep::{ParseEvent, ParseState, ParserError, engine};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Number, Value};

const HEADER: usize = 5; // 1 flag + 4-byte seed

/// Nesting limit for generated documents.
const MAX_DEPTH: u8 = 6;

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

/// Separators placed between tokens. The last two are not JSON whitespace
/// and must be rejected outside strings.
static SEPARATORS: &[&[u8]] = &[
    b"",
    b"",
    b" ",
    b"\t",
    b"\n",
    b"\r\n",
    "\u{00A0}".as_bytes(),
    "\u{3000}".as_bytes(),
];

/// Replaces the input with one freshly generated document now and then, and
/// otherwise leaves mutation to libFuzzer.
fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size >= HEADER && !seed.is_multiple_of(10) {
        return fuzzer_mutate(data, size, max_size);
    }
    if max_size < HEADER {
        return 0;
    }

    let entropy: Vec<u8> = RNG.with(|rng| {
        let mut rng = rng.borrow_mut();
        let len = rng.random_range(16..=(max_size.max(16) * 2));
        (0..len).map(|_| rng.random()).collect()
    });
    let mut u = Unstructured::new(&entropy);

    let mut document = Vec::new();
    // Running out of entropy leaves a truncated document, which is fine.
    let _ = write_value(&mut u, MAX_DEPTH, &mut document);

    let header = RNG.with(|rng| rng.borrow_mut().next_u64().to_le_bytes());
    data[..HEADER].copy_from_slice(&header[..HEADER]);
    let len = document.len().min(max_size - HEADER);
    data[HEADER..HEADER + len].copy_from_slice(&document[..len]);
    HEADER + len
}

fn write_separator(u: &mut Unstructured<'_>, out: &mut Vec<u8>) -> arbitrary::Result<()> {
    out.extend_from_slice(u.choose(SEPARATORS)?);
    Ok(())
}

/// Writes one value whose numbers are never negative, with arbitrary
/// separators between its tokens.
fn write_value(u: &mut Unstructured<'_>, depth: u8, out: &mut Vec<u8>) -> arbitrary::Result<()> {
    let kinds = if depth == 0 { 4 } else { 6 };
    match u.choose_index(kinds)? {
        0 => out.extend_from_slice(u.choose(&[&b"true"[..], b"false", b"null"])?),
        1 => {
            let number = if u.arbitrary()? {
                Value::from(u.arbitrary::<u64>()?)
            } else {
                let n: f64 = u.arbitrary()?;
                Value::Number(Number::from_f64(n.abs()).ok_or(arbitrary::Error::IncorrectFormat)?)
            };
            out.extend(serde_json::to_vec(&number).map_err(|_| arbitrary::Error::IncorrectFormat)?);
        }
        2 | 3 => write_string(u, out)?,
        4 => {
            out.push(b'[');
            for i in 0..u.int_in_range(0..=4)? {
                if i > 0 {
                    out.push(b',');
                }
                write_separator(u, out)?;
                write_value(u, depth - 1, out)?;
                write_separator(u, out)?;
            }
            out.push(b']');
        }
        _ => {
            out.push(b'{');
            for i in 0..u.int_in_range(0..=4)? {
                if i > 0 {
                    out.push(b',');
                }
                write_separator(u, out)?;
                write_string(u, out)?;
                write_separator(u, out)?;
                out.push(b':');
                write_separator(u, out)?;
                write_value(u, depth - 1, out)?;
                write_separator(u, out)?;
            }
            out.push(b'}');
        }
    }
    Ok(())
}

fn write_string(u: &mut Unstructured<'_>, out: &mut Vec<u8>) -> arbitrary::Result<()> {
    let text: String = u.arbitrary()?;
    out.extend(serde_json::to_vec(&text).map_err(|_| arbitrary::Error::IncorrectFormat)?);
    Ok(())
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

type Outcome = (Vec<ParseEvent>, Option<ParserError>);

/// Runs the engine over `chunks`, stopping after `stop_after` events if set.
fn tokenize<'a>(chunks: impl IntoIterator<Item = &'a [u8]>, stop_after: Option<usize>) -> Outcome {
    let mut state = ParseState::new();
    let mut events = Vec::new();
    for chunk in chunks {
        let mut advance = engine::advance(chunk, &mut state);
        while let Some(event) = advance.resume(stop_after == Some(events.len())) {
            match event {
                Ok(event) => events.push(event),
                Err(err) => return (events, Some(err)),
            }
        }
    }
    let mut finish = engine::finalize(&mut state);
    while let Some(event) = finish.resume(stop_after == Some(events.len())) {
        match event {
            Ok(event) => events.push(event),
            Err(err) => return (events, Some(err)),
        }
    }
    (events, None)
}

/// Splits `data` into chunks of at least one byte whose sizes derive from
/// `split_seed`. Boundaries may fall inside UTF-8 sequences.
fn split_into_chunks(data: &[u8], split_seed: u64) -> Vec<&[u8]> {
    let mut chunks = Vec::new();
    let mut rest = data;
    let mut seed = split_seed;
    while !rest.is_empty() {
        let size = (seed as usize % rest.len()) + 1;
        let (chunk, tail) = rest.split_at(size);
        chunks.push(chunk);
        rest = tail;
        seed = seed.rotate_left(7) ^ 0x9E37_79B9;
    }
    chunks
}

fn chunking(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let flags = data[0];
    let split_seed = u64::from(u32::from_le_bytes(data[1..5].try_into().unwrap()));
    let data = &data[HEADER..];

    let whole = tokenize([data], None);
    let split = tokenize(split_into_chunks(data, split_seed), None);
    assert_eq!(whole, split, "chunk boundaries changed the outcome");

    if let Some(position) = whole.1.and_then(|err| err.position()) {
        assert!(position <= data.len(), "error at {position} is past the end of input");
    }

    if flags & 1 != 0 && !whole.0.is_empty() {
        let stop_after = usize::from(flags >> 1) % whole.0.len();
        let (events, err) = tokenize(split_into_chunks(data, split_seed), Some(stop_after));
        assert_eq!(events, whole.0[..stop_after], "stopping altered earlier events");
        assert_eq!(err, None, "an error surfaced after stopping");
    }
}

fuzz_target!(|data: &[u8]| chunking(data));
