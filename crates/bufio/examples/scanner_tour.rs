//! Tokenizes text with the built-in split strategies and with a custom one.
//!
//! The input comes through `IoSource`, so anything implementing
//! `std::io::Read` works the same way; here it is an in-memory cursor.
//! Pass a file path as the first argument to scan that file instead.
//!
//! Run with
//!
//! ```bash
//! cargo run -p bufio --example scanner_tour [path]
//! ```

use std::{fs::File, io::Cursor};

use bstr::ByteSlice;
use bufio::{
    Error, IoSource, Scanner, Source, Step, Stop, scan_lines, scan_runes, scan_words, split_fn,
};

const SAMPLE: &str = "name,city,visits\r\nAda,London,3\nGrace,Arlington,12\nLinus,Helsinki,\n";

fn open() -> Result<Box<dyn Source>, Error> {
    Ok(match std::env::args().nth(1) {
        Some(path) => Box::new(IoSource::new(File::open(path).map_err(Error::from)?)),
        None => Box::new(IoSource::new(Cursor::new(SAMPLE))),
    })
}

fn main() -> Result<(), Error> {
    let mut lines = Scanner::new(open()?).split(scan_lines);
    let mut count = 0;
    while lines.scan() {
        count += 1;
        println!("line {count}: {}", lines.text());
    }
    if let Some(err) = lines.err() {
        return Err(err.clone());
    }

    let words = Scanner::new(open()?).split(scan_words).tokens().count();
    let runes = Scanner::new(open()?).split(scan_runes).tokens().count();
    println!("{words} words, {runes} runes");

    // Comma-separated fields; an empty trailing field still counts, and a
    // line starting with `#` ends the scan.
    let fields = split_fn(|data, at_eof| {
        if data.starts_with(b"#") {
            return Err(Stop::Final(None));
        }
        if let Some(i) = data.find_byteset(b",\n") {
            let field = data[..i].strip_suffix(b"\r").unwrap_or(&data[..i]);
            return Ok(Step::token(i + 1, field));
        }
        if at_eof && !data.is_empty() {
            return Ok(Step::token(data.len(), data));
        }
        Ok(Step::need_more())
    });
    let mut scanner = Scanner::new(open()?).split(fields).buffer(4, 64);
    while scanner.scan() {
        println!("field {:?}", scanner.text());
    }
    match scanner.err() {
        Some(err) => Err(err.clone()),
        None => Ok(()),
    }
}
