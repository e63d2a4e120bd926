//! Buffered writing over a [`Sink`].
//!
//! [`BufWriter`] collects small writes in a fixed buffer and hands them to
//! the sink in buffer-sized pieces. Writes that could not fit even in an
//! empty buffer skip it and go straight to the sink.
//!
//! The first sink failure is latched: from then on every write and flush
//! reports it without touching the sink, until [`reset`](BufWriter::reset).

use alloc::{boxed::Box, vec};
use core::{fmt, mem};

use crate::{
    DEFAULT_BUF_SIZE, Error, Partial, Sink, Source,
    macros::{debug, trace},
    options::MAX_CONSECUTIVE_EMPTY_READS,
    source::checked_count,
};

/// A buffered writer over a [`Sink`].
///
/// Nothing is flushed on drop; call [`flush`](Self::flush) or
/// [`into_inner`](Self::into_inner) before letting go of the writer.
///
/// # Examples
///
/// ```rust
/// use bufio::BufWriter;
///
/// let mut writer = BufWriter::with_capacity(8, Vec::new());
/// writer.write_str("hello ").unwrap();
/// assert_eq!(writer.buffered(), 6);
/// assert!(writer.get_ref().is_empty());
///
/// // Does not fit: the pending bytes go out first.
/// writer.write_rune('世').unwrap();
/// assert_eq!(writer.get_ref(), b"hello ");
/// assert_eq!(writer.buffered(), 3);
///
/// writer.flush().unwrap();
/// assert_eq!(writer.get_ref(), "hello 世".as_bytes());
/// ```
pub struct BufWriter<W> {
    buf: Box<[u8]>,
    n: usize,
    inner: W,
    err: Option<Error>,
}

impl<W> BufWriter<W> {
    /// Creates a writer with a [`DEFAULT_BUF_SIZE`] buffer.
    pub fn new(inner: W) -> Self {
        Self::with_capacity(DEFAULT_BUF_SIZE, inner)
    }

    /// Creates a writer whose buffer holds `capacity` bytes. Zero means
    /// [`DEFAULT_BUF_SIZE`].
    pub fn with_capacity(capacity: usize, inner: W) -> Self {
        let capacity = if capacity == 0 { DEFAULT_BUF_SIZE } else { capacity };
        Self {
            buf: vec![0; capacity].into_boxed_slice(),
            n: 0,
            inner,
            err: None,
        }
    }

    /// Size of the underlying buffer in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }

    /// Bytes written but not yet handed to the sink.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.n
    }

    /// Free space left in the buffer.
    #[must_use]
    pub fn available(&self) -> usize {
        self.buf.len() - self.n
    }

    /// Switches to `inner`, **dropping** any unflushed bytes and the latched
    /// error. Returns the previous sink.
    pub fn reset(&mut self, inner: W) -> W {
        if self.n > 0 {
            trace!(dropped = self.n, "reset discards pending bytes");
        }
        self.n = 0;
        self.err = None;
        mem::replace(&mut self.inner, inner)
    }

    /// Gets a reference to the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Gets a mutable reference to the underlying sink.
    ///
    /// Writing to it directly puts those bytes ahead of the buffered ones.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    fn latch(&mut self, err: Error) -> Error {
        debug!(%err, "writer error latched");
        self.err = Some(err.clone());
        err
    }

    fn copy_in(&mut self, bytes: &[u8]) -> usize {
        let n = bytes.len().min(self.available());
        self.buf[self.n..self.n + n].copy_from_slice(&bytes[..n]);
        self.n += n;
        n
    }
}

impl<W: Sink> BufWriter<W> {
    /// Sends the buffered bytes to the sink.
    ///
    /// # Errors
    ///
    /// The latched error, or the sink's error (a short count becomes
    /// [`Error::ShortWrite`]). Bytes the sink did not take stay counted in
    /// [`buffered`](Self::buffered), but the latched error keeps them from
    /// ever being sent.
    pub fn flush(&mut self) -> Result<(), Error> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }
        if self.n == 0 {
            return Ok(());
        }
        #[cfg(any(test, feature = "fuzzing"))]
        assert!(self.n <= self.buf.len(), "Internal error: more buffered than the buffer holds");

        let len = self.n;
        let (sent, err) = match self.inner.accept(&self.buf[..len]).and_then(|n| checked_count(n, len)) {
            Ok(n) if n == len => {
                self.n = 0;
                return Ok(());
            }
            Ok(n) => (n, Error::ShortWrite),
            Err(err) => (0, err),
        };
        if sent > 0 {
            self.buf.copy_within(sent..len, 0);
        }
        self.n -= sent;
        Err(self.latch(err))
    }

    /// Writes `bytes`, returning how many were accepted.
    ///
    /// When `bytes` does not fit in the free space, the buffer is flushed
    /// first; if `bytes` is still larger than the whole buffer it goes
    /// straight to the sink.
    ///
    /// # Errors
    ///
    /// The latched error, or the sink's error when nothing was accepted.
    /// If the sink fails after part of `bytes` was accepted, that count is
    /// returned and the error surfaces on the next call.
    pub fn write(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }

        let mut rest = bytes;
        if rest.len() > self.available() && self.n > 0 {
            self.flush()?;
        }
        while rest.len() > self.buf.len() {
            trace!(len = rest.len(), "large write bypasses the buffer");
            let len = rest.len();
            let result = match self.inner.accept(rest).and_then(|n| checked_count(n, len)) {
                Ok(0) => Err(Error::ShortWrite),
                other => other,
            };
            match result {
                Ok(n) => rest = &rest[n..],
                Err(err) => {
                    let err = self.latch(err);
                    let accepted = bytes.len() - rest.len();
                    return if accepted > 0 { Ok(accepted) } else { Err(err) };
                }
            }
        }

        let n = self.copy_in(rest);
        debug_assert_eq!(n, rest.len(), "remaining input should fit after flushing");
        Ok(bytes.len())
    }

    /// Writes a single byte.
    ///
    /// # Errors
    ///
    /// The latched error, or the error of the flush needed to make room.
    pub fn write_byte(&mut self, byte: u8) -> Result<(), Error> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }
        if self.available() == 0 {
            self.flush()?;
        }
        self.buf[self.n] = byte;
        self.n += 1;
        Ok(())
    }

    /// Writes the UTF-8 encoding of `ch`, returning its width in bytes.
    ///
    /// # Errors
    ///
    /// As for [`write`](Self::write).
    pub fn write_rune(&mut self, ch: char) -> Result<usize, Error> {
        let mut encoded = [0u8; 4];
        self.write(ch.encode_utf8(&mut encoded).as_bytes())
    }

    /// Writes a string.
    ///
    /// # Errors
    ///
    /// As for [`write`](Self::write).
    pub fn write_str(&mut self, s: &str) -> Result<usize, Error> {
        self.write(s.as_bytes())
    }

    /// Reads from `source` straight into the buffer until the end of data,
    /// flushing whenever the buffer is full. Returns the number of bytes
    /// read.
    ///
    /// The end of data is not an error. Whatever is left in the buffer at
    /// the end stays there unless it filled the buffer exactly.
    ///
    /// # Errors
    ///
    /// The latched error, a flush error, the source's error, or
    /// [`Error::NoProgress`]; [`Partial::data`] is the number of bytes read
    /// before it.
    pub fn read_from<S: Source + ?Sized>(&mut self, source: &mut S) -> Result<u64, Partial<u64>> {
        if let Some(err) = &self.err {
            return Err(Partial::new(err.clone(), 0));
        }

        let mut total = 0u64;
        let end = loop {
            if self.available() == 0 {
                self.flush().map_err(|err| Partial::new(err, total))?;
            }

            let room = self.available();
            let mut empties = 0;
            let read = loop {
                match source.fill(&mut self.buf[self.n..]).and_then(|n| checked_count(n, room)) {
                    Ok(0) if empties + 1 < MAX_CONSECUTIVE_EMPTY_READS => empties += 1,
                    Ok(0) => break Err(Error::NoProgress),
                    other => break other,
                }
            };

            match read {
                Ok(n) => {
                    self.n += n;
                    total += n as u64;
                }
                Err(err) => break err,
            }
        };

        match end {
            Error::EndOfData if self.available() == 0 => {
                self.flush().map_err(|err| Partial::new(err, total))?;
                Ok(total)
            }
            Error::EndOfData => Ok(total),
            err => Err(Partial::new(err, total)),
        }
    }

    /// Flushes and unwraps the writer.
    ///
    /// # Errors
    ///
    /// The flush error, with the writer handed back in [`Partial::data`] so
    /// the sink is not lost.
    pub fn into_inner(mut self) -> Result<W, Partial<Self>> {
        match self.flush() {
            Ok(()) => Ok(self.inner),
            Err(err) => Err(Partial::new(err, self)),
        }
    }
}

impl<W: fmt::Debug> fmt::Debug for BufWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufWriter")
            .field("inner", &self.inner)
            .field("buffer", &format_args!("{}/{}", self.n, self.buf.len()))
            .field("err", &self.err)
            .finish()
    }
}

#[cfg(feature = "std")]
impl<W: Sink> std::io::Write for BufWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        BufWriter::write(self, buf).map_err(Into::into)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        BufWriter::flush(self).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests;
