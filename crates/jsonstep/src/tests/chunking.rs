use alloc::vec::Vec;

use rstest::rstest;

use super::{drain, parse_all, parse_chunked};
use crate::{MemoryParser, ParseEvent, ParserOptions};

const DOCUMENTS: &[&str] = &[
    r#"{"a":[1,2,{"b":"c\"d\\"}],"e":null}"#,
    r#"["\\\"", "\"\\", true, 10.5e-3]"#,
    r#"  {"k": {"k": {"k": []}}, "z": "A"}  "#,
    r#"{"a":[1,"b"#,
    "[1, 2, @]",
    "\"unterminated \\\"",
];

#[rstest]
fn result_is_independent_of_chunk_size(
    #[values(0, 1, 2, 3, 4, 5)] document: usize,
    #[values(1, 2, 3, 5, 7, 16, 1024)] size: usize,
) {
    let input = DOCUMENTS[document];
    assert_eq!(
        parse_chunked(input.as_bytes(), size),
        parse_all(input),
        "{input:?} in chunks of {size}"
    );
}

#[rstest]
#[case(8)]
#[case(9)]
#[case(16)]
#[case(24)]
fn memory_adapter_buffer_sizes(#[case] buffer_size: usize) {
    for input in DOCUMENTS {
        let parser = MemoryParser::with_options(*input, ParserOptions::new(buffer_size));
        assert_eq!(drain(parser.parse()), parse_all(input), "{input:?}");
    }
}

#[test]
fn error_position_counts_earlier_chunks() {
    let input = br#"{"key": [true, false, nul], "x": $}"#;
    let position = input.iter().position(|&b| b == b'$');
    for size in 1..input.len() {
        let (_, err) = parse_chunked(input, size);
        assert_eq!(err.and_then(|err| err.position()), position, "size {size}");
    }
}

#[test]
fn stopping_after_any_event_ends_the_session() {
    let input = DOCUMENTS[0];
    let (all, _) = parse_all(input);
    let parser = MemoryParser::with_options(input, ParserOptions::new(8));
    for stop_after in 0..=all.len() {
        let mut session = parser.parse();
        let seen: Vec<ParseEvent> = session
            .by_ref()
            .take(stop_after)
            .map(Result::unwrap)
            .collect();
        assert_eq!(seen, all[..stop_after]);
        assert_eq!(session.resume(true), None);
        assert_eq!(session.next(), None);
        assert!(session.is_finished());
    }
}

#[test]
fn sessions_restart_from_the_first_byte() {
    let parser = MemoryParser::new(DOCUMENTS[1]);
    let mut first = parser.parse();
    let _ = first.by_ref().take(3).count();
    let rest: Vec<_> = first.collect();
    let fresh: Vec<_> = parser.parse().collect();
    assert_eq!(fresh.len(), rest.len() + 3);
    assert_eq!(fresh[3..], rest[..]);
}
