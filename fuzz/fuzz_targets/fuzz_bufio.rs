#![no_main]

use arbitrary::Arbitrary;
use bufio::{BufReader, BufWriter, Error, Scanner, Source, scan_bytes, scan_lines, scan_runes, scan_words};
use libfuzzer_sys::fuzz_target;

/// Hands out `data` in pieces whose sizes cycle through `chunks`.
struct Chunked<'a> {
    data: &'a [u8],
    chunks: &'a [u8],
    turn: usize,
}

impl Source for Chunked<'_> {
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        if self.data.is_empty() {
            return Err(Error::EndOfData);
        }
        let step = self.chunks.get(self.turn % self.chunks.len().max(1)).copied().unwrap_or(0);
        self.turn += 1;
        let n = (1 + usize::from(step % 16)).min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

#[derive(Arbitrary, Debug)]
enum ReadOp {
    Read(u8),
    Peek(u8),
    Discard(u8),
    Byte,
    UnreadByte,
    Rune,
    UnreadRune,
    Slice(u8),
    Bytes(u8),
    Line,
}

#[derive(Arbitrary, Debug)]
enum SplitKind {
    Lines,
    Words,
    Runes,
    Bytes,
}

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    data: &'a [u8],
    chunks: &'a [u8],
    capacity: u8,
    ops: Vec<ReadOp>,
    writes: Vec<u8>,
    split: SplitKind,
    initial: u8,
}

fuzz_target!(|input: Input<'_>| {
    let source = || Chunked {
        data: input.data,
        chunks: input.chunks,
        turn: 0,
    };

    // Every operation keeps the reader consistent with the bytes consumed.
    let mut reader = BufReader::with_capacity(usize::from(input.capacity), source());
    let mut consumed = Vec::new();
    for op in &input.ops {
        match *op {
            ReadOp::Read(n) => {
                let mut dst = vec![0u8; usize::from(n)];
                if let Ok(k) = reader.read(&mut dst) {
                    consumed.extend_from_slice(&dst[..k]);
                }
            }
            ReadOp::Peek(n) => {
                let rest = &input.data[consumed.len()..];
                match reader.peek(usize::from(n)) {
                    Ok(view) => assert_eq!(view, &rest[..usize::from(n)]),
                    Err(partial) => assert!(rest.starts_with(partial.data)),
                }
            }
            ReadOp::Discard(n) => {
                let k = reader.discard(usize::from(n)).unwrap_or_else(|partial| partial.data);
                let at = consumed.len();
                consumed.extend_from_slice(&input.data[at..at + k]);
            }
            ReadOp::Byte => {
                if let Ok(b) = reader.read_byte() {
                    consumed.push(b);
                }
            }
            ReadOp::UnreadByte => {
                if reader.unread_byte().is_ok() {
                    consumed.pop();
                }
            }
            ReadOp::Rune => {
                if let Ok((_, width)) = reader.read_rune() {
                    let at = consumed.len();
                    consumed.extend_from_slice(&input.data[at..at + width]);
                }
            }
            ReadOp::UnreadRune => {
                let before = reader.buffered();
                if reader.unread_rune().is_ok() {
                    let width = reader.buffered() - before;
                    consumed.truncate(consumed.len() - width);
                }
            }
            ReadOp::Slice(delim) => match reader.read_slice(delim) {
                Ok(slice) => consumed.extend_from_slice(slice),
                Err(partial) => consumed.extend_from_slice(partial.data),
            },
            ReadOp::Bytes(delim) => match reader.read_bytes(delim) {
                Ok(bytes) => consumed.extend_from_slice(&bytes),
                Err(partial) => consumed.extend_from_slice(&partial.data),
            },
            ReadOp::Line => {
                if let Ok(line) = reader.read_line() {
                    consumed.extend_from_slice(line.bytes);
                    if !line.is_prefix {
                        let rest = &input.data[consumed.len()..];
                        let terminator = if rest.starts_with(b"\r\n") {
                            2
                        } else {
                            usize::from(rest.starts_with(b"\n"))
                        };
                        consumed.extend_from_slice(&rest[..terminator]);
                    }
                }
            }
        }
        assert!(input.data.starts_with(&consumed));
    }
    let mut rest = Vec::new();
    if reader.write_to(&mut rest).is_ok() {
        consumed.extend_from_slice(&rest);
        assert_eq!(consumed, input.data);
    }

    // Whatever the write sizes, the sink sees the input unchanged.
    let mut writer = BufWriter::with_capacity(usize::from(input.capacity), Vec::<u8>::new());
    let mut tail = input.data;
    for &w in &input.writes {
        let (piece, next) = tail.split_at(usize::from(w).min(tail.len()));
        assert_eq!(writer.write(piece), Ok(piece.len()));
        tail = next;
    }
    assert_eq!(writer.write(tail), Ok(tail.len()));
    match writer.into_inner() {
        Ok(out) => assert_eq!(out, input.data),
        Err(partial) => panic!("flush into a Vec failed: {}", partial.error),
    }

    // Chunking never changes the token stream.
    let tokens = |chunked: bool| -> Vec<Result<Vec<u8>, Error>> {
        let initial = usize::from(input.initial);
        macro_rules! run {
            ($split:expr) => {
                if chunked {
                    Scanner::new(source()).split($split).buffer(initial, 4096).tokens().collect()
                } else {
                    Scanner::new(input.data).split($split).buffer(initial, 4096).tokens().collect()
                }
            };
        }
        match input.split {
            SplitKind::Lines => run!(scan_lines),
            SplitKind::Words => run!(scan_words),
            SplitKind::Runes => run!(scan_runes),
            SplitKind::Bytes => run!(scan_bytes),
        }
    };
    assert_eq!(tokens(true), tokens(false));
});
