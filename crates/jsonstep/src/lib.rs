//! An incremental, pull-based JSON tokenizer.
//!
//! Input arrives as byte chunks of arbitrary size. The engine turns them
//! into a flat stream of structural [`ParseEvent`]s (containers opening and
//! closing, string and literal boundaries, separators, raw content bytes)
//! while keeping all of its progress in a [`ParseState`]. Nothing is
//! decoded: escape sequences, numbers and keywords are reported byte by
//! byte.
//!
//! The crate is `no_std` + `alloc`. Two adapters drive the engine:
//! - [`MemoryParser`] over an in-memory buffer (feature `memory`, default),
//! - `FileParser` over a file read with `tokio` (feature `file`).
//!
//! ```rust
//! use jsonstep::{MemoryParser, ParseEvent, ParserOptions};
//!
//! let parser = MemoryParser::with_options("[true]", ParserOptions::new(8));
//! let events: Result<Vec<_>, _> = parser.parse().collect();
//! assert_eq!(
//!     events.unwrap(),
//!     vec![
//!         ParseEvent::ArrayStart,
//!         ParseEvent::ValueLiteralStart { byte: b't' },
//!         ParseEvent::Character { byte: b'r' },
//!         ParseEvent::Character { byte: b'u' },
//!         ParseEvent::Character { byte: b'e' },
//!         ParseEvent::ValueLiteralEnd,
//!         ParseEvent::ArrayEnd,
//!     ]
//! );
//! ```

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod charset;
pub mod engine;
mod error;
mod event;
mod options;
mod state;

#[cfg(feature = "memory")]
mod memory;

#[cfg(feature = "file")]
mod file;

#[cfg(all(test, feature = "memory"))]
mod tests;

pub use error::{ParserError, SyntaxError};
pub use event::{Context, ParseEvent};
#[cfg(feature = "file")]
pub use file::{FileOperation, FileParse, FileParser, FileParserError};
#[cfg(feature = "memory")]
pub use memory::{MemoryParse, MemoryParser};
pub use options::{DEFAULT_BUFFER_SIZE, ParserOptions};
pub use state::ParseState;
