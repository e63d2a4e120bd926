//! Buffered reading over a [`Source`].
//!
//! [`BufReader`] serves reads from a linear buffer that it refills from the
//! source on demand. On top of plain reads it offers `peek`, `discard`,
//! single-byte and single-rune rollback, and delimiter-scanning reads.
//!
//! Invariants
//! - `0 <= start <= end <= buf.len()`; the buffered bytes are
//!   `buf[start..end]`.
//! - A fill first slides the buffered bytes to offset zero, then issues one
//!   read into the free tail.
//! - A source error is parked in `err` and handed to the caller by the
//!   first operation that runs out of buffered bytes.
//!
//! Views returned by [`peek`](BufReader::peek),
//! [`read_slice`](BufReader::read_slice) and
//! [`read_line`](BufReader::read_line) borrow the internal buffer, so the
//! borrow checker invalidates them at the next call on the reader.

use alloc::{boxed::Box, vec, vec::Vec};
use core::{fmt, mem, ops::Range};

use bstr::ByteSlice;

use crate::{
    DEFAULT_BUF_SIZE, Error, MIN_READ_BUF_SIZE, Partial, Sink, Source,
    macros::trace,
    options::MAX_CONSECUTIVE_EMPTY_READS,
    source::checked_count,
    utf8,
};

/// One line returned by [`BufReader::read_line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// The line without its `\n` or `\r\n` terminator.
    pub bytes: &'a [u8],
    /// The line did not fit in the buffer; more fragments follow.
    pub is_prefix: bool,
}

/// A buffered reader over a [`Source`].
///
/// # Examples
///
/// ```rust
/// use bufio::BufReader;
///
/// let mut reader = BufReader::with_capacity(16, &b"key=value\nrest"[..]);
/// assert_eq!(reader.peek(3).unwrap(), b"key");
/// assert_eq!(reader.read_slice(b'=').unwrap(), b"key=");
/// let line = reader.read_line().unwrap();
/// assert_eq!(line.bytes, b"value");
/// assert!(!line.is_prefix);
/// ```
pub struct BufReader<R> {
    buf: Box<[u8]>,
    start: usize,
    end: usize,
    inner: R,
    err: Option<Error>,
    // Set only by `read_byte`/`read_rune`; everything else clears them.
    last_byte: Option<u8>,
    last_rune_size: Option<usize>,
}

impl<R> BufReader<R> {
    /// Creates a reader with a [`DEFAULT_BUF_SIZE`] buffer.
    pub fn new(inner: R) -> Self {
        Self::with_capacity(DEFAULT_BUF_SIZE, inner)
    }

    /// Creates a reader whose buffer holds at least `capacity` bytes
    /// (raised to [`MIN_READ_BUF_SIZE`] if smaller).
    pub fn with_capacity(capacity: usize, inner: R) -> Self {
        Self {
            buf: vec![0; capacity.max(MIN_READ_BUF_SIZE)].into_boxed_slice(),
            start: 0,
            end: 0,
            inner,
            err: None,
            last_byte: None,
            last_rune_size: None,
        }
    }

    /// Size of the underlying buffer in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }

    /// Number of bytes that can be read from the buffer without touching
    /// the source.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.end - self.start
    }

    /// The buffered bytes, without consuming them.
    #[must_use]
    pub fn buffer(&self) -> &[u8] {
        &self.buf[self.start..self.end]
    }

    /// Drops the buffered bytes and any pending error and starts reading
    /// from `inner`. The buffer storage is reused. Returns the previous
    /// source.
    pub fn reset(&mut self, inner: R) -> R {
        self.start = 0;
        self.end = 0;
        self.err = None;
        self.clear_unread();
        mem::replace(&mut self.inner, inner)
    }

    /// Gets a reference to the underlying source.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Gets a mutable reference to the underlying source.
    ///
    /// Reading from it directly skips over the buffered bytes.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Unwraps the reader, dropping any buffered bytes.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn clear_unread(&mut self) {
        self.last_byte = None;
        self.last_rune_size = None;
    }
}

impl<R: Source> BufReader<R> {
    /// Slides the buffered bytes to the front and reads once into the free
    /// tail, retrying zero-byte reads a bounded number of times.
    fn fill(&mut self) {
        #[cfg(any(test, feature = "fuzzing"))]
        assert!(
            self.start <= self.end && self.end <= self.buf.len(),
            "Internal error: reader window {}..{} outside a buffer of {}",
            self.start,
            self.end,
            self.buf.len()
        );
        if self.start > 0 {
            self.buf.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }
        debug_assert!(self.end < self.buf.len(), "tried to fill a full buffer");

        let room = self.buf.len() - self.end;
        for _ in 0..MAX_CONSECUTIVE_EMPTY_READS {
            match self
                .inner
                .fill(&mut self.buf[self.end..])
                .and_then(|n| checked_count(n, room))
            {
                Ok(0) => {}
                Ok(n) => {
                    trace!(n, buffered = self.end + n, "filled reader buffer");
                    self.end += n;
                    return;
                }
                Err(err) => {
                    self.err = Some(err);
                    return;
                }
            }
        }
        trace!("source made no progress");
        self.err = Some(Error::NoProgress);
    }

    fn take_err(&mut self) -> Result<(), Error> {
        self.err.take().map_or(Ok(()), Err)
    }

    /// Reads into `dst`, returning how many bytes were copied.
    ///
    /// At most one read is issued against the source, so the count may be
    /// smaller than `dst.len()` even before the end of data. When the
    /// buffer is empty and `dst` is at least as large as the buffer, the
    /// read goes straight into `dst`.
    ///
    /// # Errors
    ///
    /// The source's error (including [`Error::EndOfData`]) once no buffered
    /// bytes are left.
    pub fn read(&mut self, dst: &mut [u8]) -> Result<usize, Error> {
        self.clear_unread();
        if dst.is_empty() {
            if self.buffered() > 0 {
                return Ok(0);
            }
            return self.take_err().map(|()| 0);
        }

        if self.start == self.end {
            self.take_err()?;
            if dst.len() >= self.buf.len() {
                trace!(len = dst.len(), "large read bypasses the buffer");
                let len = dst.len();
                return self.inner.fill(dst).and_then(|n| checked_count(n, len));
            }
            self.start = 0;
            self.end = 0;
            let len = self.buf.len();
            match self.inner.fill(&mut self.buf).and_then(|n| checked_count(n, len)) {
                Ok(0) => return Ok(0),
                Ok(n) => self.end = n,
                Err(err) => return Err(err),
            }
        }

        let n = dst.len().min(self.buffered());
        dst[..n].copy_from_slice(&self.buf[self.start..self.start + n]);
        self.start += n;
        Ok(n)
    }

    /// Returns the next `n` bytes without consuming them, filling from the
    /// source as often as needed.
    ///
    /// # Errors
    ///
    /// - [`Error::BufferFull`] if `n` exceeds [`size`](Self::size).
    /// - The source's error if it stops before `n` bytes are available.
    ///
    /// In both cases the bytes that are available come back in
    /// [`Partial::data`].
    pub fn peek(&mut self, n: usize) -> Result<&[u8], Partial<&[u8]>> {
        self.clear_unread();
        while self.buffered() < n && self.buffered() < self.buf.len() && self.err.is_none() {
            self.fill();
        }

        if n > self.buf.len() {
            return Err(Partial::new(Error::BufferFull, self.buffer()));
        }
        if self.buffered() < n {
            let err = self.err.take().unwrap_or(Error::BufferFull);
            return Err(Partial::new(err, self.buffer()));
        }
        Ok(&self.buf[self.start..self.start + n])
    }

    /// Skips the next `n` bytes, filling from the source as needed.
    ///
    /// Returns `n` on success.
    ///
    /// # Errors
    ///
    /// The source's error if it stops early; [`Partial::data`] is the
    /// number of bytes actually skipped.
    pub fn discard(&mut self, n: usize) -> Result<usize, Partial<usize>> {
        if n == 0 {
            return Ok(0);
        }
        self.clear_unread();

        let mut remain = n;
        loop {
            if self.buffered() == 0 {
                self.fill();
            }
            let skip = self.buffered().min(remain);
            self.start += skip;
            remain -= skip;
            if remain == 0 {
                return Ok(n);
            }
            if let Some(err) = self.err.take() {
                return Err(Partial::new(err, n - remain));
            }
        }
    }

    /// Reads a single byte. It may be pushed back once with
    /// [`unread_byte`](Self::unread_byte).
    ///
    /// # Errors
    ///
    /// The source's error once no buffered bytes are left.
    pub fn read_byte(&mut self) -> Result<u8, Error> {
        self.last_rune_size = None;
        while self.start == self.end {
            self.take_err()?;
            self.fill();
        }
        let byte = self.buf[self.start];
        self.start += 1;
        self.last_byte = Some(byte);
        Ok(byte)
    }

    /// Pushes back the byte returned by the immediately preceding
    /// [`read_byte`](Self::read_byte).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidUnreadByte`] if the previous operation was anything
    /// else, including a second `unread_byte`.
    pub fn unread_byte(&mut self) -> Result<(), Error> {
        let Some(byte) = self.last_byte else {
            return Err(Error::InvalidUnreadByte);
        };
        if self.start == 0 && self.end > 0 {
            return Err(Error::InvalidUnreadByte);
        }
        if self.start > 0 {
            self.start -= 1;
        } else {
            self.end = 1;
        }
        self.buf[self.start] = byte;
        self.clear_unread();
        Ok(())
    }

    /// Reads one UTF-8 encoded scalar value and returns it with its width
    /// in bytes. Invalid input yields `U+FFFD` with a width of one.
    ///
    /// # Errors
    ///
    /// The source's error once no buffered bytes are left.
    pub fn read_rune(&mut self) -> Result<(char, usize), Error> {
        while !utf8::full_rune(self.buffer())
            && self.err.is_none()
            && self.buffered() < self.buf.len()
        {
            self.fill();
        }
        self.clear_unread();
        let Some((ch, width)) = utf8::decode(self.buffer()) else {
            self.take_err()?;
            return Err(Error::EndOfData);
        };
        self.start += width;
        self.last_rune_size = Some(width);
        Ok((ch, width))
    }

    /// Pushes back the scalar value returned by the immediately preceding
    /// [`read_rune`](Self::read_rune).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidUnreadRune`] if the previous operation was anything
    /// else.
    pub fn unread_rune(&mut self) -> Result<(), Error> {
        match self.last_rune_size {
            Some(width) if self.start >= width => {
                self.start -= width;
                self.clear_unread();
                Ok(())
            }
            _ => Err(Error::InvalidUnreadRune),
        }
    }

    /// Locates the next `delim`, filling as needed, and consumes the bytes
    /// up to and including it. Returns the consumed range of `buf`.
    fn slice_range(&mut self, delim: u8) -> Result<Range<usize>, (Error, Range<usize>)> {
        self.clear_unread();
        let mut searched = 0;
        loop {
            if let Some(i) = self.buf[self.start + searched..self.end].find_byte(delim) {
                let range = self.start..self.start + searched + i + 1;
                self.start = range.end;
                return Ok(range);
            }
            if let Some(err) = self.err.take() {
                let range = self.start..self.end;
                self.start = self.end;
                return Err((err, range));
            }
            if self.buffered() >= self.buf.len() {
                let range = self.start..self.end;
                self.start = self.end;
                return Err((Error::BufferFull, range));
            }
            // Don't rescan what we already searched.
            searched = self.end - self.start;
            self.fill();
        }
    }

    /// Reads up to and including the next `delim`, returning a view into
    /// the internal buffer.
    ///
    /// # Errors
    ///
    /// - [`Error::BufferFull`] if the buffer fills up without a `delim`;
    ///   the whole buffer is consumed and returned in [`Partial::data`].
    /// - The source's error if it ends first; the remaining bytes are
    ///   consumed and returned in [`Partial::data`].
    pub fn read_slice(&mut self, delim: u8) -> Result<&[u8], Partial<&[u8]>> {
        match self.slice_range(delim) {
            Ok(range) => Ok(&self.buf[range]),
            Err((err, range)) => Err(Partial::new(err, &self.buf[range])),
        }
    }

    /// Like [`read_slice`](Self::read_slice), but accumulates across
    /// refills into an owned buffer, so it never fails with
    /// [`Error::BufferFull`].
    ///
    /// # Errors
    ///
    /// The source's error if it ends before `delim`; everything read is
    /// returned in [`Partial::data`].
    pub fn read_bytes(&mut self, delim: u8) -> Result<Vec<u8>, Partial<Vec<u8>>> {
        let mut out = Vec::new();
        loop {
            match self.slice_range(delim) {
                Ok(range) => {
                    out.extend_from_slice(&self.buf[range]);
                    return Ok(out);
                }
                Err((Error::BufferFull, range)) => out.extend_from_slice(&self.buf[range]),
                Err((err, range)) => {
                    out.extend_from_slice(&self.buf[range]);
                    return Err(Partial::new(err, out));
                }
            }
        }
    }

    /// Reads one line, without its `\n` or `\r\n` terminator.
    ///
    /// A line longer than the buffer comes back in fragments with
    /// [`Line::is_prefix`] set on all but the last. A final line without a
    /// terminator is returned normally; the end of data is reported by the
    /// next call.
    ///
    /// # Errors
    ///
    /// The source's error when there is no line left to return.
    pub fn read_line(&mut self) -> Result<Line<'_>, Error> {
        let (range, is_prefix) = match self.slice_range(b'\n') {
            Err((Error::BufferFull, mut range)) => {
                // "\r\n" may straddle the buffer boundary; leave the '\r' for
                // the next call.
                if !range.is_empty() && self.buf[range.end - 1] == b'\r' {
                    debug_assert!(self.start > 0, "tried to rewind past start of buffer");
                    self.start -= 1;
                    range.end -= 1;
                }
                (range, true)
            }
            Err((err, range)) if range.is_empty() => return Err(err),
            Ok(range) | Err((_, range)) => {
                let mut end = range.end;
                if self.buf[range.clone()].ends_with(b"\n") {
                    end -= 1;
                    if end > range.start && self.buf[end - 1] == b'\r' {
                        end -= 1;
                    }
                }
                (range.start..end, false)
            }
        };
        Ok(Line {
            bytes: &self.buf[range],
            is_prefix,
        })
    }

    /// Sends the buffered bytes to `sink`, consuming what it accepted and
    /// adding it to `moved`.
    fn write_buf<W: Sink + ?Sized>(&mut self, sink: &mut W, moved: &mut u64) -> Result<(), Partial<u64>> {
        if self.start == self.end {
            return Ok(());
        }
        let len = self.buffered();
        let n = sink
            .accept(&self.buf[self.start..self.end])
            .and_then(|n| checked_count(n, len))
            .map_err(|err| Partial::new(err, *moved))?;
        self.start += n;
        *moved += n as u64;
        if n < len {
            return Err(Partial::new(Error::ShortWrite, *moved));
        }
        Ok(())
    }

    /// Drains the buffered bytes and then the rest of the source into
    /// `sink`. Returns the number of bytes moved.
    ///
    /// The end of data is not an error here.
    ///
    /// # Errors
    ///
    /// The first error from either side; [`Partial::data`] is the number
    /// of bytes moved before it.
    pub fn write_to<W: Sink + ?Sized>(&mut self, sink: &mut W) -> Result<u64, Partial<u64>> {
        self.clear_unread();
        let mut moved = 0u64;
        self.write_buf(sink, &mut moved)?;
        if self.buffered() < self.buf.len() {
            self.fill();
        }
        while self.start < self.end {
            self.write_buf(sink, &mut moved)?;
            self.fill();
        }

        match self.err.take() {
            None | Some(Error::EndOfData) => Ok(moved),
            Some(err) => Err(Partial::new(err, moved)),
        }
    }
}

impl<R: fmt::Debug> fmt::Debug for BufReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufReader")
            .field("inner", &self.inner)
            .field("buffer", &format_args!("{}/{}", self.buffered(), self.buf.len()))
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "std")]
impl<R: Source> std::io::Read for BufReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match BufReader::read(self, buf) {
            Ok(n) => Ok(n),
            Err(Error::EndOfData) => Ok(0),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(feature = "std")]
impl<R: Source> std::io::BufRead for BufReader<R> {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        self.clear_unread();
        if self.start == self.end && self.err.is_none() {
            self.fill();
        }
        if self.start == self.end {
            match self.err.take() {
                None | Some(Error::EndOfData) => {}
                Some(err) => return Err(err.into()),
            }
        }
        Ok(self.buffer())
    }

    fn consume(&mut self, amt: usize) {
        self.clear_unread();
        self.start = (self.start + amt).min(self.end);
    }
}
