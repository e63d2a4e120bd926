//! The split protocol and the built-in strategies.
//!
//! A split function is handed the unconsumed bytes and whether the source
//! has ended, and answers with one of:
//! - [`Step`] with `token: None`: consume `advance` bytes (possibly zero,
//!   meaning "need more data") and keep going.
//! - [`Step`] with `token: Some(..)`: consume `advance` bytes and hand the
//!   token to the caller. The token is independent of `advance`; it may be
//!   a view of `data` or freshly built bytes.
//! - [`Stop::Final`]: hand over the optional token and end the scan
//!   cleanly.
//! - [`Stop::Fail`]: end the scan with an error. [`Error::EndOfData`] here
//!   ends it without reporting anything.
//!
//! `advance` must never exceed `data.len()`.

use alloc::{borrow::Cow, vec::Vec};

use bstr::ByteSlice;

use crate::{Error, utf8};

/// What a split function returns.
pub type SplitResult<'d> = Result<Step<'d>, Stop<'d>>;

/// The split function signature as a plain function pointer; the default
/// strategy type of a [`Scanner`](crate::Scanner).
pub type SplitFn = for<'d> fn(&'d [u8], bool) -> SplitResult<'d>;

/// Continue scanning after consuming `advance` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step<'d> {
    /// Bytes to consume from the front of `data`.
    pub advance: usize,
    /// The token to return to the caller, if one is ready.
    pub token: Option<Cow<'d, [u8]>>,
}

impl<'d> Step<'d> {
    /// Nothing consumed, no token: the split function wants more data.
    #[must_use]
    pub const fn need_more() -> Self {
        Self {
            advance: 0,
            token: None,
        }
    }

    /// Consume `advance` bytes without producing a token.
    #[must_use]
    pub const fn skip(advance: usize) -> Self {
        Self {
            advance,
            token: None,
        }
    }

    /// Consume `advance` bytes and produce `token`, a view of the input.
    #[must_use]
    pub const fn token(advance: usize, token: &'d [u8]) -> Self {
        Self {
            advance,
            token: Some(Cow::Borrowed(token)),
        }
    }

    /// Consume `advance` bytes and produce a token built by the split
    /// function.
    #[must_use]
    pub fn owned(advance: usize, token: impl Into<Vec<u8>>) -> Self {
        Self {
            advance,
            token: Some(Cow::Owned(token.into())),
        }
    }
}

/// End the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stop<'d> {
    /// Stop cleanly after delivering the token, if any. No error is
    /// reported.
    Final(Option<Cow<'d, [u8]>>),
    /// Stop with an error, which becomes the scanner's terminal error.
    Fail(Error),
}

impl From<Error> for Stop<'_> {
    fn from(err: Error) -> Self {
        Self::Fail(err)
    }
}

/// A strategy carving tokens out of buffered input.
///
/// Implemented for every `FnMut(&[u8], bool) -> SplitResult` closure, so a
/// closure can be handed to [`Scanner::split`](crate::Scanner::split)
/// directly; [`split_fn`] helps the compiler infer its signature.
pub trait Split {
    /// Inspects `data` (the unconsumed input) and decides what to do.
    /// `at_eof` is set once the source has nothing more to give.
    ///
    /// # Errors
    ///
    /// A [`Stop`] ends the scan.
    fn split<'d>(&mut self, data: &'d [u8], at_eof: bool) -> SplitResult<'d>;
}

impl<F> Split for F
where
    F: for<'d> FnMut(&'d [u8], bool) -> SplitResult<'d>,
{
    fn split<'d>(&mut self, data: &'d [u8], at_eof: bool) -> SplitResult<'d> {
        self(data, at_eof)
    }
}

/// Pins a closure to the split signature.
///
/// Closures whose return value borrows their argument need an explicit
/// higher-ranked signature; passing the closure through here provides it.
///
/// ```rust
/// use bufio::{Scanner, Step, split_fn};
///
/// let pipes = split_fn(|data, at_eof| {
///     match data.iter().position(|&b| b == b'|') {
///         Some(i) => Ok(Step::token(i + 1, &data[..i])),
///         None if at_eof && !data.is_empty() => Ok(Step::token(data.len(), data)),
///         None => Ok(Step::need_more()),
///     }
/// });
/// let mut scanner = Scanner::new(&b"foo|bar"[..]).split(pipes);
/// assert!(scanner.scan());
/// assert_eq!(scanner.text(), "foo");
/// ```
pub fn split_fn<F>(f: F) -> F
where
    F: for<'d> FnMut(&'d [u8], bool) -> SplitResult<'d>,
{
    f
}

/// Splits into lines, dropping the `\n` and an optional `\r` before it.
/// The last line need not end with a newline; an empty last line is not
/// reported.
///
/// # Errors
///
/// Never fails.
pub fn scan_lines(data: &[u8], at_eof: bool) -> SplitResult<'_> {
    if at_eof && data.is_empty() {
        return Ok(Step::need_more());
    }
    if let Some(i) = data.find_byte(b'\n') {
        return Ok(Step::token(i + 1, drop_cr(&data[..i])));
    }
    if at_eof {
        return Ok(Step::token(data.len(), drop_cr(data)));
    }
    Ok(Step::need_more())
}

fn drop_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Splits into runs of non-whitespace, skipping the Unicode whitespace
/// between them.
///
/// # Errors
///
/// Never fails.
pub fn scan_words(data: &[u8], at_eof: bool) -> SplitResult<'_> {
    let mut start = 0;
    while let Some((ch, width)) = utf8::decode(&data[start..]) {
        if !ch.is_whitespace() {
            break;
        }
        start += width;
    }

    let mut i = start;
    while let Some((ch, width)) = utf8::decode(&data[i..]) {
        if ch.is_whitespace() {
            return Ok(Step::token(i + width, &data[start..i]));
        }
        i += width;
    }

    if at_eof && data.len() > start {
        return Ok(Step::token(data.len(), &data[start..]));
    }
    // Drop the leading whitespace now; wait for the rest of the word.
    Ok(Step::skip(start))
}

/// Splits into single UTF-8 encoded scalar values. Each invalid byte comes
/// out as the encoding of `U+FFFD`.
///
/// # Errors
///
/// Never fails.
pub fn scan_runes(data: &[u8], at_eof: bool) -> SplitResult<'_> {
    let Some(&first) = data.first() else {
        return Ok(Step::need_more());
    };
    if first.is_ascii() {
        return Ok(Step::token(1, &data[..1]));
    }
    if let Some((_, width)) = utf8::decode(data).filter(|&(_, width)| width > 1) {
        return Ok(Step::token(width, &data[..width]));
    }
    if !at_eof && !utf8::full_rune(data) {
        return Ok(Step::need_more());
    }
    Ok(Step::token(1, REPLACEMENT_BYTES))
}

const REPLACEMENT_BYTES: &[u8] = "\u{FFFD}".as_bytes();

/// Splits into single bytes.
///
/// # Errors
///
/// Never fails.
pub fn scan_bytes(data: &[u8], _at_eof: bool) -> SplitResult<'_> {
    if data.is_empty() {
        return Ok(Step::need_more());
    }
    Ok(Step::token(1, &data[..1]))
}
