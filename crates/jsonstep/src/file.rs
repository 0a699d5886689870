//! Tokenizing a file, read asynchronously with `tokio`.
use alloc::vec::Vec;
use core::{fmt, mem};
use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tokio::{fs::File, io::AsyncReadExt};
use tracing::{debug, trace};

use crate::{
    ParseEvent, ParseState, ParserError, ParserOptions,
    engine::{self, Advance, Finish},
};

/// The file operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    /// Opening the file for reading.
    Open,
    /// Reading the next chunk.
    Read,
}

impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Open => "open",
            Self::Read => "read",
        })
    }
}

/// An error ending a [`FileParse`] session.
#[derive(Debug, Error)]
pub enum FileParserError {
    /// The file's content is not valid JSON.
    #[error(transparent)]
    Parser(#[from] ParserError),
    /// The file could not be opened or read.
    #[error("Unable to {operation} file {}", path.display())]
    Io {
        /// What was being attempted.
        operation: FileOperation,
        /// The file's path.
        path: PathBuf,
        /// The system error.
        #[source]
        source: io::Error,
    },
}

impl FileParserError {
    /// The grammar error, if this is one.
    #[must_use]
    pub fn parser_error(&self) -> Option<&ParserError> {
        match self {
            Self::Parser(err) => Some(err),
            Self::Io { .. } => None,
        }
    }
}

/// Tokenizes the file at a path.
///
/// The file is not touched until a session pulls its first event. Each call
/// to [`FileParser::parse`] reopens it and starts over from the first byte.
///
/// # Examples
///
/// ```no_run
/// use jsonstep::{FileParser, ParserOptions};
///
/// # async fn run() -> Result<(), jsonstep::FileParserError> {
/// let parser = FileParser::new("data.json", ParserOptions::default());
/// let mut session = parser.parse();
/// while let Some(event) = session.next_event().await {
///     println!("{}", event?);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileParser {
    path: PathBuf,
    options: ParserOptions,
}

impl FileParser {
    /// Creates a parser for the file at `path`.
    pub fn new(path: impl Into<PathBuf>, options: ParserOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    /// The file's path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The options in effect.
    #[must_use]
    pub fn options(&self) -> ParserOptions {
        self.options
    }

    /// Begins a new session.
    #[must_use]
    pub fn parse(&self) -> FileParse {
        FileParse {
            path: self.path.clone(),
            chunk_size: self.options.buffer_size(),
            file: None,
            buffer: Vec::with_capacity(self.options.buffer_size()),
            phase: Phase::Read(ParseState::new()),
        }
    }
}

#[derive(Debug)]
enum Phase {
    /// The next chunk must be read. The file is opened on the first read.
    Read(ParseState),
    Chunk(Advance<Vec<u8>, ParseState>),
    Finishing(Finish<ParseState>),
    Done,
}

/// One session over a [`FileParser`]'s file.
///
/// The file handle is held only while more input is needed; it is released
/// at end of file, on error, and on [`FileParse::stop`].
#[derive(Debug)]
pub struct FileParse {
    path: PathBuf,
    chunk_size: usize,
    file: Option<File>,
    buffer: Vec<u8>,
    phase: Phase,
}

impl FileParse {
    /// Pulls the next event.
    ///
    /// Returns `None` once the document is complete, after an error was
    /// returned, or after the session was stopped.
    pub async fn next_event(&mut self) -> Option<Result<ParseEvent, FileParserError>> {
        loop {
            match mem::replace(&mut self.phase, Phase::Done) {
                Phase::Read(state) => match self.read_chunk().await {
                    Ok(0) => self.phase = Phase::Finishing(engine::finalize(state)),
                    Ok(_) => {
                        let chunk = mem::take(&mut self.buffer);
                        self.phase = Phase::Chunk(engine::advance(chunk, state));
                    }
                    Err(err) => {
                        self.close();
                        return Some(Err(err));
                    }
                },
                Phase::Chunk(mut advance) => match advance.next() {
                    Some(Ok(event)) => {
                        self.phase = Phase::Chunk(advance);
                        return Some(Ok(event));
                    }
                    Some(Err(err)) => {
                        self.close();
                        return Some(Err(err.into()));
                    }
                    None => {
                        let (buffer, state) = advance.into_parts();
                        self.buffer = buffer;
                        if !state.is_live() {
                            self.close();
                            return None;
                        }
                        self.phase = Phase::Read(state);
                    }
                },
                Phase::Finishing(mut finish) => {
                    let item = finish.next();
                    if matches!(item, Some(Ok(_))) {
                        self.phase = Phase::Finishing(finish);
                    }
                    return item.map(|item| item.map_err(FileParserError::from));
                }
                Phase::Done => {
                    self.close();
                    return None;
                }
            }
        }
    }

    /// Pulls the next event, or stops the session when `stop` is `true`.
    pub async fn resume(&mut self, stop: bool) -> Option<Result<ParseEvent, FileParserError>> {
        if stop {
            self.stop();
            return None;
        }
        self.next_event().await
    }

    /// Ends the session and releases the file. No further events or errors
    /// are produced.
    pub fn stop(&mut self) {
        match &mut self.phase {
            Phase::Chunk(advance) => advance.stop(),
            Phase::Finishing(finish) => finish.stop(),
            Phase::Read(state) => state.stop(),
            Phase::Done => {}
        }
        self.phase = Phase::Done;
        self.close();
    }

    /// Whether a file handle is currently held.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Reads up to one chunk into the buffer, opening the file first if
    /// needed. The handle is dropped at end of file and on failure.
    async fn read_chunk(&mut self) -> Result<usize, FileParserError> {
        let mut file = match self.file.take() {
            Some(file) => file,
            None => {
                debug!(path = %self.path.display(), "opening file");
                File::open(&self.path)
                    .await
                    .map_err(|source| self.io_error(FileOperation::Open, source))?
            }
        };

        self.buffer.clear();
        self.buffer.resize(self.chunk_size, 0);
        let read = file
            .read(&mut self.buffer)
            .await
            .map_err(|source| self.io_error(FileOperation::Read, source))?;
        self.buffer.truncate(read);
        trace!(read, "read chunk");

        if read == 0 {
            debug!(path = %self.path.display(), "end of file, closing");
        } else {
            self.file = Some(file);
        }
        Ok(read)
    }

    fn close(&mut self) {
        if self.file.take().is_some() {
            debug!(path = %self.path.display(), "file closed");
        }
    }

    fn io_error(&self, operation: FileOperation, source: io::Error) -> FileParserError {
        debug!(%operation, path = %self.path.display(), %source, "file operation failed");
        FileParserError::Io {
            operation,
            path: self.path.clone(),
            source,
        }
    }
}
