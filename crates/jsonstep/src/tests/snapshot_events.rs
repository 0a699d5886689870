//! Snapshot of the exact event sequence for a small document mixing every
//! construct. Catches unintended behaviour changes in the engine.

use insta::assert_yaml_snapshot;

use super::parse_all;

#[test]
fn snapshot_small_document() {
    let (events, err) = parse_all(r#"{"a": [true, "x"]}"#);
    assert_eq!(err, None);

    assert_yaml_snapshot!(events, @r"
    - kind: ObjectStart
    - kind: StringStart
    - kind: Character
      byte: 97
    - kind: StringEnd
    - kind: KeyValueSplit
    - kind: ArrayStart
    - kind: ValueLiteralStart
      byte: 116
    - kind: Character
      byte: 114
    - kind: Character
      byte: 117
    - kind: Character
      byte: 101
    - kind: ValueLiteralEnd
    - kind: PropertySplit
    - kind: StringStart
    - kind: Character
      byte: 120
    - kind: StringEnd
    - kind: ArrayEnd
    - kind: ObjectEnd
    ");
}
