//! Reacts to a moderation verdict while a tool-call response is still
//! arriving in small, irregular chunks.
//!
//! The payload looks like this:
//!
//! ```text
//! {
//!   "decision": "allow" | "block",
//!   "code":     string
//! }
//! ```
//!
//! The moment the string value of `decision` is complete we know whether the
//! rest of the document is worth reading. A `"block"` verdict stops the
//! session on the spot, so no byte of `code` is ever looked at.
#![allow(missing_docs)]

use jsonstep::{ParseEvent, ParseState, engine};

const CHUNKS: &[&str] = &[
    "{\"deci",
    "sion\": \"bl",
    "ock\", \"code\": \"rm -rf ",
    "/\"}",
];

/// Where we are relative to the member we care about.
#[derive(Debug, Default)]
struct Watch {
    depth: usize,
    key: Vec<u8>,
    value: Vec<u8>,
    in_key: bool,
    in_value: bool,
}

impl Watch {
    /// Returns the verdict once the `decision` value is complete.
    fn observe(&mut self, event: ParseEvent) -> Option<String> {
        match event {
            ParseEvent::ObjectStart | ParseEvent::ArrayStart => self.depth += 1,
            ParseEvent::ObjectEnd | ParseEvent::ArrayEnd => self.depth -= 1,
            ParseEvent::StringStart if self.depth == 1 && self.key.is_empty() => {
                self.in_key = true;
            }
            ParseEvent::StringStart if self.key == b"decision" => self.in_value = true,
            ParseEvent::Character { byte } if self.in_key => self.key.push(byte),
            ParseEvent::Character { byte } if self.in_value => self.value.push(byte),
            ParseEvent::StringEnd if self.in_key => self.in_key = false,
            ParseEvent::StringEnd if self.in_value => {
                return Some(String::from_utf8_lossy(&self.value).into_owned());
            }
            ParseEvent::PropertySplit if self.depth == 1 => self.key.clear(),
            _ => {}
        }
        None
    }
}

fn main() {
    let mut state = ParseState::new();
    let mut watch = Watch::default();
    let mut seen = 0usize;

    for chunk in CHUNKS {
        let mut events = engine::advance(chunk.as_bytes(), &mut state);
        while let Some(event) = events.next() {
            let event = match event {
                Ok(event) => event,
                Err(err) => {
                    eprintln!("malformed response: {err}");
                    return;
                }
            };
            seen += 1;
            if let Some(verdict) = watch.observe(event) {
                println!("verdict after {seen} events: {verdict}");
                if verdict == "block" {
                    events.stop();
                    println!("blocked at byte {}, discarding the rest", events.offset());
                    return;
                }
            }
        }
    }

    for event in engine::finalize(&mut state) {
        if let Err(err) = event {
            eprintln!("truncated response: {err}");
        }
    }
    println!("response accepted");
}
