//! Walks a `BufReader` through a small record stream that arrives in
//! irregular pieces, the way bytes trickle in from a socket.
//!
//! Each record is `key=value` on its own line. The reader peeks at the first
//! byte to skip comment lines, splits the key off with `read_slice`, and
//! takes the value with `read_line`. Whatever is left after a `--` marker is
//! copied straight to stdout with `write_to`.
//!
//! Run with
//!
//! ```bash
//! cargo run -p bufio --example reader_tour
//! ```

use bufio::{BufReader, Error, IoSink, Source};

/// Hands out the next piece of a fixed script on every fill.
struct Trickle {
    pieces: std::slice::Iter<'static, &'static str>,
    pending: &'static [u8],
}

impl Trickle {
    fn new(pieces: &'static [&'static str]) -> Self {
        Self {
            pieces: pieces.iter(),
            pending: &[],
        }
    }
}

impl Source for Trickle {
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        if self.pending.is_empty() {
            self.pending = self.pieces.next().ok_or(Error::EndOfData)?.as_bytes();
        }
        let n = buf.len().min(self.pending.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending = &self.pending[n..];
        Ok(n)
    }
}

fn main() -> Result<(), Error> {
    let stream = Trickle::new(&[
        "# settings\nna",
        "me=bufio\nvers",
        "ion=0.1\r\n# end\n",
        "--\nfree-form tail ",
        "copied as is\n",
    ]);
    let mut reader = BufReader::with_capacity(16, stream);

    loop {
        match reader.peek(2)? {
            b"--" => break,
            [b'#', ..] => {
                let comment = reader.read_line()?;
                println!("skipped comment {:?}", String::from_utf8_lossy(comment.bytes));
                continue;
            }
            _ => {}
        }
        let key = reader.read_slice(b'=')?;
        let key = String::from_utf8_lossy(&key[..key.len() - 1]).into_owned();
        let value = reader.read_line()?;
        println!("{key} = {:?}", String::from_utf8_lossy(value.bytes));
    }

    reader.read_line()?;
    println!("tail:");
    let copied = reader.write_to(&mut IoSink::new(std::io::stdout()))?;
    println!("({copied} bytes)");
    Ok(())
}
