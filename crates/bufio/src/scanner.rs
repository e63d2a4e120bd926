//! Token scanning over a [`Source`].
//!
//! [`Scanner`] accumulates input in a growable buffer and asks a [`Split`]
//! strategy to carve tokens off its front. It is the convenient way to read
//! newline-delimited text, words, or runes; for anything needing more
//! control over errors or very long tokens, use a
//! [`BufReader`](crate::BufReader).
//!
//! Lifecycle
//! - `Idle` until the first [`scan`](Scanner::scan). The buffer is not
//!   allocated yet and may still be configured.
//! - `Scanning` while tokens keep coming. When the split function wants
//!   more data the scanner reads once; when the buffer is full it doubles,
//!   up to the maximum token size.
//! - `Done` after the source is drained, the split function stops, or an
//!   error. Every later `scan` returns `false`.
//!
//! At the end of the source the split function keeps being called with
//! `at_eof = true` for as long as it produces tokens.

mod split;

use alloc::vec::Vec;
use core::fmt;

use bstr::{BStr, ByteSlice};

pub use self::split::{
    Split, SplitFn, SplitResult, Step, Stop, scan_bytes, scan_lines, scan_runes, scan_words,
    split_fn,
};
use crate::{
    Error, START_SCAN_BUF_SIZE, ScannerOptions, Source,
    macros::{debug, trace},
    options::MAX_CONSECUTIVE_EMPTY_READS,
    source::checked_count,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Scanning,
    Done,
}

/// What a split call asked for, detached from the buffer it looked at.
enum Outcome {
    Skip(usize),
    Token(usize),
    Final { token: bool },
    Fail(Error),
}

/// Splits the bytes of a [`Source`] into tokens.
///
/// # Examples
///
/// ```rust
/// use bufio::{Scanner, scan_words};
///
/// let mut words = Scanner::new(&b"foo bar  \n  baz"[..]).split(scan_words);
/// let mut seen = Vec::new();
/// while words.scan() {
///     seen.push(words.text().to_string());
/// }
/// assert_eq!(seen, ["foo", "bar", "baz"]);
/// assert!(words.err().is_none());
/// ```
///
/// [`tokens`](Scanner::tokens) iterates over owned tokens, then the
/// terminal error if there was one:
///
/// ```rust
/// use bufio::Scanner;
///
/// let lines: Result<Vec<_>, _> = Scanner::new(&b"a\r\nb\n"[..]).tokens().collect();
/// assert_eq!(lines.unwrap(), [b"a".to_vec(), b"b".to_vec()]);
/// ```
pub struct Scanner<S, F = SplitFn> {
    source: S,
    split: F,
    buf: Vec<u8>,
    start: usize,
    end: usize,
    // Source error or end of data; once set no more reads happen.
    err: Option<Error>,
    token: Vec<u8>,
    empties: usize,
    initial_capacity: usize,
    max_token_size: usize,
    state: State,
    err_yielded: bool,
}

impl<S> Scanner<S> {
    /// Creates a scanner splitting `source` into lines with the default
    /// [`ScannerOptions`].
    pub fn new(source: S) -> Self {
        Self::with_options(source, ScannerOptions::default())
    }

    /// Creates a line scanner with explicit buffer options.
    pub fn with_options(source: S, options: ScannerOptions) -> Self {
        Self {
            source,
            split: scan_lines,
            buf: Vec::new(),
            start: 0,
            end: 0,
            err: None,
            token: Vec::new(),
            empties: 0,
            initial_capacity: options.initial_capacity,
            max_token_size: options.max_token_size,
            state: State::Idle,
            err_yielded: false,
        }
    }
}

impl<S, F> Scanner<S, F> {
    /// Replaces the split strategy.
    ///
    /// # Panics
    ///
    /// In debug builds, if scanning has already started.
    #[must_use]
    pub fn split<G: Split>(self, split: G) -> Scanner<S, G> {
        debug_assert_eq!(self.state, State::Idle, "split set after scanning started");
        Scanner {
            source: self.source,
            split,
            buf: self.buf,
            start: self.start,
            end: self.end,
            err: self.err,
            token: self.token,
            empties: self.empties,
            initial_capacity: self.initial_capacity,
            max_token_size: self.max_token_size,
            state: self.state,
            err_yielded: self.err_yielded,
        }
    }

    /// Sets the size of the first buffer allocation and the largest size
    /// the buffer may grow to. The larger of the two bounds the token size.
    ///
    /// # Panics
    ///
    /// In debug builds, if scanning has already started.
    #[must_use]
    pub fn buffer(mut self, initial_capacity: usize, max_token_size: usize) -> Self {
        debug_assert_eq!(self.state, State::Idle, "buffer set after scanning started");
        self.initial_capacity = initial_capacity;
        self.max_token_size = max_token_size;
        self
    }

    /// The most recent token. Empty before the first successful
    /// [`scan`](Self::scan).
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.token
    }

    /// The most recent token as a byte string.
    #[must_use]
    pub fn text(&self) -> &BStr {
        self.token.as_bstr()
    }

    /// The error that ended the scan, if any. Reaching the end of the
    /// source is not an error.
    #[must_use]
    pub fn err(&self) -> Option<&Error> {
        self.err.as_ref().filter(|err| !err.is_end_of_data())
    }

    fn limit(&self) -> usize {
        self.max_token_size.max(self.initial_capacity)
    }

    /// Keeps the first real error; end of data may be overwritten.
    fn set_err(&mut self, err: Error) {
        if self.err.as_ref().is_none_or(Error::is_end_of_data) {
            if !err.is_end_of_data() {
                debug!(%err, "scan failed");
            }
            self.err = Some(err);
        }
    }

    fn finish(&mut self) -> bool {
        self.state = State::Done;
        false
    }

    /// Makes room for more input: slides the pending bytes down, or grows
    /// the buffer when it is full.
    fn make_room(&mut self) -> Result<(), Error> {
        if self.start > 0 && (self.end == self.buf.len() || self.start > self.buf.len() / 2) {
            self.buf.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }
        if self.end < self.buf.len() {
            return Ok(());
        }

        let limit = self.limit();
        if self.buf.len() >= limit {
            return Err(Error::TokenTooLong);
        }
        let size = match (self.buf.len(), self.initial_capacity) {
            (0, 0) => START_SCAN_BUF_SIZE,
            (0, initial) => initial,
            (len, _) => len.saturating_mul(2),
        }
        .min(limit);
        debug!(from = self.buf.len(), to = size, "growing scan buffer");
        self.buf.resize(size, 0);
        Ok(())
    }
}

impl<S: Source, F: Split> Scanner<S, F> {
    /// Advances to the next token, which is then available through
    /// [`bytes`](Self::bytes) and [`text`](Self::text).
    ///
    /// Returns `false` when the scan is over, either because the input is
    /// exhausted or because of an error reported by [`err`](Self::err).
    pub fn scan(&mut self) -> bool {
        if self.state == State::Done {
            return false;
        }
        self.state = State::Scanning;

        loop {
            #[cfg(any(test, feature = "fuzzing"))]
            assert!(
                self.start <= self.end && self.end <= self.buf.len(),
                "Internal error: scanner window {}..{} outside a buffer of {}",
                self.start,
                self.end,
                self.buf.len()
            );
            if self.end > self.start || self.err.is_some() {
                let at_eof = self.err.is_some();
                let data = &self.buf[self.start..self.end];
                let outcome = match self.split.split(data, at_eof) {
                    Ok(Step { advance, .. }) if advance > data.len() => {
                        Outcome::Fail(Error::AdvanceTooFar)
                    }
                    Ok(Step {
                        advance,
                        token: Some(token),
                    }) => {
                        self.token.clear();
                        self.token.extend_from_slice(&token);
                        Outcome::Token(advance)
                    }
                    Ok(Step {
                        advance,
                        token: None,
                    }) => Outcome::Skip(advance),
                    Err(Stop::Final(token)) => {
                        self.token.clear();
                        if let Some(token) = &token {
                            self.token.extend_from_slice(token);
                        }
                        Outcome::Final {
                            token: token.is_some(),
                        }
                    }
                    Err(Stop::Fail(err)) => Outcome::Fail(err),
                };

                match outcome {
                    Outcome::Skip(advance) => self.start += advance,
                    Outcome::Token(advance) => {
                        self.start += advance;
                        if self.err.is_none() || advance > 0 {
                            self.empties = 0;
                        } else {
                            self.empties += 1;
                            if self.empties > MAX_CONSECUTIVE_EMPTY_READS {
                                self.set_err(Error::TooManyEmptyTokens);
                                return self.finish();
                            }
                        }
                        return true;
                    }
                    Outcome::Final { token } => {
                        trace!(token, "split function stopped the scan");
                        self.state = State::Done;
                        return token;
                    }
                    Outcome::Fail(err) => {
                        self.set_err(err);
                        return self.finish();
                    }
                }
            }

            if self.err.is_some() {
                self.start = 0;
                self.end = 0;
                return self.finish();
            }

            if let Err(err) = self.make_room() {
                self.set_err(err);
                return self.finish();
            }
            self.read();
        }
    }

    /// Iterates over the remaining tokens as owned copies.
    pub fn tokens(&mut self) -> Tokens<'_, S, F> {
        Tokens { scanner: self }
    }

    /// Reads once into the free tail of the buffer.
    fn read(&mut self) {
        let room = self.buf.len() - self.end;
        for _ in 0..MAX_CONSECUTIVE_EMPTY_READS {
            match self
                .source
                .fill(&mut self.buf[self.end..])
                .and_then(|n| checked_count(n, room))
            {
                Ok(0) => {}
                Ok(n) => {
                    trace!(n, pending = self.end + n - self.start, "filled scan buffer");
                    self.end += n;
                    self.empties = 0;
                    return;
                }
                Err(err) => {
                    self.set_err(err);
                    return;
                }
            }
        }
        self.set_err(Error::NoProgress);
    }
}

/// Iterator over the remaining tokens of a [`Scanner`], returned by
/// [`Scanner::tokens`].
///
/// Yields owned tokens, then the terminal error if there was one.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Tokens<'a, S, F> {
    scanner: &'a mut Scanner<S, F>,
}

impl<S: Source, F: Split> Iterator for Tokens<'_, S, F> {
    type Item = Result<Vec<u8>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let scanner = &mut *self.scanner;
        if scanner.scan() {
            return Some(Ok(scanner.token.clone()));
        }
        if scanner.err_yielded {
            return None;
        }
        scanner.err_yielded = true;
        scanner.err().cloned().map(Err)
    }
}

impl<S: fmt::Debug, F> fmt::Debug for Scanner<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("source", &self.source)
            .field("state", &self.state)
            .field("buffer", &format_args!("{}/{}", self.end - self.start, self.buf.len()))
            .field("token", &self.text())
            .field("err", &self.err())
            .finish_non_exhaustive()
    }
}
