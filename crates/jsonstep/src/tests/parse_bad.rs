use alloc::{string::ToString, vec};

use super::parse_all;
use crate::{
    ParseEvent::*,
    ParserError::{self, UnexpectedEndOfInput},
    SyntaxError,
};

fn syntax(source: SyntaxError, position: usize) -> Option<ParserError> {
    Some(ParserError::Syntax { source, position })
}

#[test]
fn empty_or_blank_input() {
    for input in ["", " ", " \t\r\n "] {
        let (events, err) = parse_all(input);
        assert!(events.is_empty());
        assert_eq!(err, Some(UnexpectedEndOfInput));
    }
}

#[test]
fn unclosed_containers() {
    assert_eq!(parse_all("{"), (vec![ObjectStart], Some(UnexpectedEndOfInput)));
    assert_eq!(parse_all("["), (vec![ArrayStart], Some(UnexpectedEndOfInput)));

    let (events, err) = parse_all(r#"{"a":[1"#);
    assert_eq!(events.last(), Some(&ValueLiteralEnd));
    assert_eq!(err, Some(UnexpectedEndOfInput));
}

#[test]
fn unterminated_string() {
    let (events, err) = parse_all("\"foo");
    assert_eq!(
        events,
        vec![
            StringStart,
            Character { byte: b'f' },
            Character { byte: b'o' },
            Character { byte: b'o' },
        ]
    );
    assert_eq!(err, syntax(SyntaxError::UnterminatedString, 4));
    assert_eq!(
        err.map(|err| err.to_string()).as_deref(),
        Some("Unterminated string in JSON at position 4")
    );
}

#[test]
fn closing_bracket_inside_string_is_content() {
    let (events, err) = parse_all("[\"foo]");
    assert_eq!(events.last(), Some(&Character { byte: b']' }));
    assert_eq!(err, syntax(SyntaxError::UnterminatedString, 6));
}

#[test]
fn unterminated_member_value() {
    let (events, err) = parse_all(r#"{"a":"b"#);
    assert_eq!(
        events,
        vec![
            ObjectStart,
            StringStart,
            Character { byte: b'a' },
            StringEnd,
            KeyValueSplit,
            StringStart,
            Character { byte: b'b' },
        ]
    );
    assert_eq!(err, syntax(SyntaxError::UnterminatedString, 7));
}

#[test]
fn array_closed_inside_object() {
    let (events, err) = parse_all("[{]");
    assert_eq!(events, vec![ArrayStart, ObjectStart]);
    assert_eq!(err, syntax(SyntaxError::ExpectedPropertyName, 2));
    assert_eq!(
        err.map(|err| err.to_string()).as_deref(),
        Some("Expected property name or '}' in JSON at position 2")
    );
}

#[test]
fn object_member_must_start_with_name() {
    let (events, err) = parse_all("{1}");
    assert_eq!(events, vec![ObjectStart]);
    assert_eq!(err, syntax(SyntaxError::ExpectedPropertyName, 1));
}

#[test]
fn unexpected_first_byte() {
    for (input, byte) in [("x", b'x'), ("-1", b'-'), ("}", b'}'), (",", b',')] {
        let (events, err) = parse_all(input);
        assert!(events.is_empty(), "{input}");
        assert_eq!(err, syntax(SyntaxError::UnexpectedToken(byte), 0), "{input}");
    }
    assert_eq!(
        parse_all("x").1.map(|err| err.to_string()).as_deref(),
        Some("Unexpected token 'x' at position 0")
    );
}

#[test]
fn trailing_document_is_rejected() {
    let (events, err) = parse_all("{} {}");
    assert_eq!(events, vec![ObjectStart, ObjectEnd]);
    assert_eq!(err, syntax(SyntaxError::UnexpectedToken(b'{'), 3));
}

#[test]
fn stray_byte_inside_array() {
    let (events, err) = parse_all("[1, @]");
    assert_eq!(events.len(), 4);
    assert_eq!(err, syntax(SyntaxError::UnexpectedToken(b'@'), 4));
}

#[test]
fn nothing_follows_an_error() {
    let parser = crate::MemoryParser::new("[x, 1, 2]");
    let mut session = parser.parse();
    assert_eq!(session.next(), Some(Ok(ArrayStart)));
    assert!(matches!(session.next(), Some(Err(_))));
    assert_eq!(session.next(), None);
    assert_eq!(session.next(), None);
}

#[test]
fn container_opened_inside_top_level_literal() {
    let (events, err) = parse_all("1[");
    assert_eq!(events, vec![ValueLiteralStart { byte: b'1' }, ArrayStart]);
    assert_eq!(err, Some(UnexpectedEndOfInput));
}
