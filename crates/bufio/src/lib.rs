//! Buffered I/O over minimal byte capabilities.
//!
//! Three components sit on top of two tiny traits, [`Source`] (produces
//! bytes) and [`Sink`] (accepts bytes):
//!
//! - [`BufReader`] serves reads from a refillable buffer and adds `peek`,
//!   `discard`, byte and rune rollback, and delimiter-scanning reads.
//! - [`BufWriter`] collects writes and hands them to the sink in
//!   buffer-sized pieces, latching the first sink failure.
//! - [`Scanner`] carves tokens out of a growing buffer with a pluggable
//!   [`Split`] strategy (lines, words, runes, bytes, or your own).
//!
//! The crate is `no_std` with `alloc`. The `std` feature (on by default)
//! adds adapters to and from `std::io`.
//!
//! ```rust
//! use bufio::{BufReader, BufWriter, Scanner, scan_words};
//!
//! let mut out = BufWriter::with_capacity(8, Vec::<u8>::new());
//! out.write_str("to be or\nnot to be").unwrap();
//! let written = out.into_inner().unwrap();
//!
//! let mut reader = BufReader::with_capacity(16, written.as_slice());
//! assert_eq!(reader.read_line().unwrap().bytes, b"to be or");
//!
//! let mut words = Scanner::new(written.as_slice()).split(scan_words);
//! assert_eq!(words.tokens().count(), 6);
//! ```

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod macros;

mod error;
mod options;
mod reader;
mod scanner;
mod source;
mod utf8;
mod writer;

#[cfg(feature = "std")]
mod io;


pub use error::{Error, Partial};
#[cfg(feature = "std")]
pub use io::{IoSink, IoSource};
pub use options::{
    DEFAULT_BUF_SIZE, MAX_SCAN_TOKEN_SIZE, MIN_READ_BUF_SIZE, START_SCAN_BUF_SIZE, ScannerOptions,
};
pub use reader::{BufReader, Line};
pub use scanner::{
    Scanner, Split, SplitFn, SplitResult, Step, Stop, Tokens, scan_bytes, scan_lines,
    scan_runes, scan_words, split_fn,
};
pub use source::{Discard, Sink, Source};
pub use writer::BufWriter;
