//! Bridges to `std::io`.
//!
//! [`IoSource`] and [`IoSink`] let any `std::io::Read`/`Write` serve as a
//! [`Source`]/[`Sink`]. In the other direction, [`BufReader`](crate::BufReader)
//! implements `Read` + `BufRead` and [`BufWriter`](crate::BufWriter)
//! implements `Write`.

use alloc::string::ToString;
use std::io::{self, ErrorKind, Read, Write};

use crate::{Error, Sink, Source};

/// A [`Source`] reading from a [`std::io::Read`].
///
/// `Ok(0)` from the reader is its end of stream and becomes
/// [`Error::EndOfData`]. Interrupted reads are retried.
///
/// ```rust
/// use bufio::{BufReader, IoSource};
///
/// let cursor = std::io::Cursor::new(b"alpha\nbeta\n".to_vec());
/// let mut reader = BufReader::new(IoSource::new(cursor));
/// assert_eq!(reader.read_line().unwrap().bytes, b"alpha");
/// ```
#[derive(Debug, Clone, Default)]
pub struct IoSource<R>(R);

impl<R> IoSource<R> {
    /// Wraps `reader`.
    pub const fn new(reader: R) -> Self {
        Self(reader)
    }

    /// Unwraps the reader.
    pub fn into_inner(self) -> R {
        self.0
    }
}

impl<R: Read> Source for IoSource<R> {
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            match self.0.read(buf) {
                Ok(0) => return Err(Error::EndOfData),
                Ok(n) => return Ok(n),
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => return Err(err.into()),
            }
        }
    }
}

/// A [`Sink`] writing to a [`std::io::Write`].
///
/// Interrupted writes are retried.
#[derive(Debug, Clone, Default)]
pub struct IoSink<W>(W);

impl<W> IoSink<W> {
    /// Wraps `writer`.
    pub const fn new(writer: W) -> Self {
        Self(writer)
    }

    /// Gets a reference to the writer.
    pub const fn get_ref(&self) -> &W {
        &self.0
    }

    /// Unwraps the writer.
    pub fn into_inner(self) -> W {
        self.0
    }
}

impl<W: Write> Sink for IoSink<W> {
    fn accept(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        loop {
            match self.0.write(bytes) {
                Ok(n) => return Ok(n),
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => return Err(err.into()),
            }
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            ErrorKind::UnexpectedEof => Self::EndOfData,
            ErrorKind::WriteZero => Self::ShortWrite,
            _ => Self::Other(err.to_string()),
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        let kind = match err {
            Error::EndOfData => ErrorKind::UnexpectedEof,
            Error::ShortWrite => ErrorKind::WriteZero,
            Error::BufferFull | Error::TokenTooLong => ErrorKind::OutOfMemory,
            Error::InvalidUnreadByte | Error::InvalidUnreadRune => ErrorKind::InvalidInput,
            Error::NoProgress
            | Error::BadCount
            | Error::AdvanceTooFar
            | Error::TooManyEmptyTokens
            | Error::Other(_) => ErrorKind::Other,
        };
        io::Error::new(kind, err)
    }
}
