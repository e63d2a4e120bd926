use alloc::string::{String, ToString};

use thiserror::Error;

/// Every failure the buffering layer can report.
///
/// `Error` is cheap to clone so that a latched (sticky) error can be handed
/// out again on every later call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The requested view is larger than the buffer can ever hold.
    #[error("buffer full")]
    BufferFull,
    /// The source is exhausted. Callers use this as a normal termination
    /// signal.
    #[error("end of data")]
    EndOfData,
    /// The source kept returning zero bytes without an error.
    #[error("multiple reads returned no data and no error")]
    NoProgress,
    /// A token would not fit in the scanner's maximum buffer size.
    #[error("token too long")]
    TokenTooLong,
    /// The sink accepted fewer bytes than it was given.
    #[error("short write")]
    ShortWrite,
    /// A source or sink reported more bytes than it was handed.
    #[error("source or sink returned an impossible count")]
    BadCount,
    /// The split function advanced past the data it was given.
    #[error("split function advanced past available data")]
    AdvanceTooFar,
    /// `unread_byte` was not preceded by `read_byte`.
    #[error("invalid use of unread_byte")]
    InvalidUnreadByte,
    /// `unread_rune` was not preceded by `read_rune`.
    #[error("invalid use of unread_rune")]
    InvalidUnreadRune,
    /// The split function kept producing empty tokens without advancing.
    #[error("too many empty tokens without progressing")]
    TooManyEmptyTokens,
    /// An opaque error reported by a source or sink.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wraps an arbitrary message as an opaque source or sink error.
    pub fn other(msg: impl ToString) -> Self {
        Self::Other(msg.to_string())
    }

    /// Whether this is the end-of-data signal rather than a real failure.
    #[must_use]
    pub fn is_end_of_data(&self) -> bool {
        matches!(self, Self::EndOfData)
    }
}

/// An error that happened after some progress was made.
///
/// `data` is what the operation managed to produce before failing: the
/// bytes available to a short `peek`, the bytes a `discard` skipped, the
/// tail returned by `read_slice` at end of data, the number of bytes a copy
/// moved. Nothing is dropped silently.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{error}")]
pub struct Partial<T> {
    /// Why the operation stopped.
    pub error: Error,
    /// What was produced before it stopped.
    pub data: T,
}

impl<T> Partial<T> {
    pub(crate) fn new(error: Error, data: T) -> Self {
        Self { error, data }
    }

    /// Applies `f` to the carried data, keeping the error.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Partial<U> {
        Partial {
            error: self.error,
            data: f(self.data),
        }
    }

    /// Splits into the error and the partial data.
    pub fn into_parts(self) -> (Error, T) {
        (self.error, self.data)
    }
}

impl<T> From<Partial<T>> for Error {
    fn from(partial: Partial<T>) -> Self {
        partial.error
    }
}
