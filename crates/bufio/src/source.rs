//! The two capabilities the buffering layer is built on.
//!
//! A [`Source`] produces bytes on demand and a [`Sink`] accepts them. They
//! are deliberately smaller than `std::io::Read`/`Write` so that the crate
//! works without `std`; adapters for the standard traits live in
//! [`crate::io`] behind the `std` feature.

use alloc::{boxed::Box, vec::Vec};

use crate::Error;

/// A capability producing bytes on demand.
///
/// Contract for [`fill`](Source::fill):
/// - `Ok(n)` with `n > 0`: `buf[..n]` now holds the next `n` bytes.
/// - `Ok(0)` for a non-empty `buf`: nothing was produced this time. Doing
///   this repeatedly is a protocol violation, reported by the buffering
///   layer as [`Error::NoProgress`].
/// - `Err(Error::EndOfData)`: the source is exhausted. A source that reaches
///   its end while producing data returns the data first and `EndOfData` on
///   the next call.
/// - any other `Err`: the source failed.
///
/// The source never keeps a reference to `buf`.
pub trait Source {
    /// Fills a prefix of `buf` with the next bytes of the stream.
    ///
    /// # Errors
    ///
    /// [`Error::EndOfData`] at the end of the stream, or whatever error the
    /// underlying producer reports.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, Error>;
}

/// A capability accepting bytes on demand.
///
/// [`accept`](Sink::accept) returns how many bytes of `bytes` were taken. A
/// short count without an error is reported by the buffering layer as
/// [`Error::ShortWrite`].
pub trait Sink {
    /// Takes (a prefix of) `bytes`.
    ///
    /// # Errors
    ///
    /// Whatever error the underlying consumer reports.
    fn accept(&mut self, bytes: &[u8]) -> Result<usize, Error>;
}

impl Source for &[u8] {
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        if self.is_empty() {
            return if buf.is_empty() {
                Ok(0)
            } else {
                Err(Error::EndOfData)
            };
        }
        let n = buf.len().min(self.len());
        let (head, tail) = self.split_at(n);
        buf[..n].copy_from_slice(head);
        *self = tail;
        Ok(n)
    }
}

impl<S: Source + ?Sized> Source for &mut S {
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        (**self).fill(buf)
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        (**self).fill(buf)
    }
}

impl Sink for Vec<u8> {
    fn accept(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        self.extend_from_slice(bytes);
        Ok(bytes.len())
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn accept(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        (**self).accept(bytes)
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn accept(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        (**self).accept(bytes)
    }
}

/// A sink that accepts and drops everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Discard;

impl Sink for Discard {
    fn accept(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        Ok(bytes.len())
    }
}

/// Checks a count reported by a source or sink against the slice it was
/// handed.
pub(crate) fn checked_count(n: usize, len: usize) -> Result<usize, Error> {
    if n > len { Err(Error::BadCount) } else { Ok(n) }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn slice_source_drains_then_reports_end_of_data() {
        let mut src: &[u8] = b"abcde";
        let mut buf = [0u8; 3];
        assert_eq!(src.fill(&mut buf), Ok(3));
        assert_eq!(&buf, b"abc");
        assert_eq!(src.fill(&mut buf), Ok(2));
        assert_eq!(&buf[..2], b"de");
        assert_eq!(src.fill(&mut buf), Err(Error::EndOfData));
        assert_eq!(src.fill(&mut []), Ok(0));
    }

    #[test]
    fn forwarding_impls_reach_the_inner_endpoint() {
        let mut out = Vec::new();
        {
            let mut sink: Box<dyn Sink + '_> = Box::new(&mut out);
            assert_eq!(sink.accept(b"xy"), Ok(2));
        }
        assert_eq!(out, b"xy");
        assert_eq!(Discard.accept(&[0; 7]), Ok(7));

        let mut src: &[u8] = b"q";
        let mut boxed: Box<dyn Source + '_> = Box::new(&mut src);
        let mut buf = vec![0u8; 4];
        assert_eq!(boxed.fill(&mut buf), Ok(1));
        assert_eq!(boxed.fill(&mut buf), Err(Error::EndOfData));
    }

    #[test]
    fn counts_larger_than_the_slice_are_rejected() {
        assert_eq!(checked_count(3, 3), Ok(3));
        assert_eq!(checked_count(4, 3), Err(Error::BadCount));
    }
}
