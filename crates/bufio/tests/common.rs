#![allow(missing_docs, dead_code)]

use std::{cell::RefCell, fmt::Display, rc::Rc};

use bstr::ByteSlice;
use bufio::{Error, Sink, Source};

/// Lines logged by the endpoints and by the test body, in call order.
#[derive(Debug, Clone, Default)]
pub struct Transcript(Rc<RefCell<Vec<String>>>);

impl Transcript {
    pub fn line(&self, line: impl Display) {
        self.0.borrow_mut().push(line.to_string());
    }

    pub fn blank(&self) {
        self.line("");
    }

    pub fn take(&self) -> String {
        self.0.take().join("\n")
    }
}

/// Quotes bytes the way the transcripts show them.
pub fn quoted(bytes: &[u8]) -> String {
    format!("{:?}", bytes.as_bstr())
}

/// Announces every fill and always produces the same sixteen letters.
pub struct Alphabet {
    log: Transcript,
}

impl Alphabet {
    pub fn new(log: &Transcript) -> Self {
        Self { log: log.clone() }
    }
}

impl Source for Alphabet {
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        const LETTERS: &[u8] = b"abcdefghijklmnop";
        self.log.line("fill");
        let n = buf.len().min(LETTERS.len());
        buf[..n].copy_from_slice(&LETTERS[..n]);
        Ok(n)
    }
}

/// Numbers its fills; produces `abcdefg` ten times, then ends.
pub struct Sevens {
    log: Transcript,
    fills: usize,
}

impl Sevens {
    pub fn new(log: &Transcript) -> Self {
        Self {
            log: log.clone(),
            fills: 0,
        }
    }
}

impl Source for Sevens {
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        self.log.line(format_args!("fill #{}", self.fills));
        if self.fills >= 10 {
            return Err(Error::EndOfData);
        }
        buf[..7].copy_from_slice(b"abcdefg");
        self.fills += 1;
        Ok(7)
    }
}

/// Logs every write under its name and accepts all of it.
pub struct Printer {
    name: &'static str,
    log: Transcript,
}

impl Printer {
    pub fn new(name: &'static str, log: &Transcript) -> Self {
        Self {
            name,
            log: log.clone(),
        }
    }
}

impl Sink for Printer {
    fn accept(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        self.log
            .line(format_args!("{}: len {} {}", self.name, bytes.len(), quoted(bytes)));
        Ok(bytes.len())
    }
}

/// Logs every write and fails it.
pub struct Bomb {
    log: Transcript,
}

impl Bomb {
    pub fn new(log: &Transcript) -> Self {
        Self { log: log.clone() }
    }
}

impl Sink for Bomb {
    fn accept(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        self.log.line(format_args!("write {}", quoted(bytes)));
        Err(Error::other("bomb"))
    }
}

/// Renders an operation outcome on one line.
pub fn outcome<T: std::fmt::Debug, E: Display>(result: &Result<T, E>) -> String {
    match result {
        Ok(value) => format!("ok {value:?}"),
        Err(err) => format!("err: {err}"),
    }
}
