//! Shows how a `BufWriter` batches small writes and what happens when the
//! sink underneath it starts failing.
//!
//! The sink is a pretend network link that prints each batch it receives
//! and drops the connection after a fixed number of batches. After the
//! failure every write reports the same error until `reset` moves the
//! writer onto a fresh link.
//!
//! Run with
//!
//! ```bash
//! cargo run -p bufio --example writer_tour
//! ```

use bufio::{BufWriter, Error, Sink};

/// Prints every batch and fails once `budget` batches went through.
struct Link {
    name: &'static str,
    budget: usize,
}

impl Sink for Link {
    fn accept(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        if self.budget == 0 {
            println!("[{}] connection dropped", self.name);
            return Err(Error::other("connection dropped"));
        }
        self.budget -= 1;
        println!("[{}] batch of {}: {:?}", self.name, bytes.len(), String::from_utf8_lossy(bytes));
        Ok(bytes.len())
    }
}

fn main() {
    let mut writer = BufWriter::with_capacity(
        8,
        Link {
            name: "primary",
            budget: 2,
        },
    );

    for word in ["alpha ", "beta ", "gamma ", "delta ", "epsilon "] {
        match writer.write_str(word) {
            Ok(n) => println!("wrote {n}, {} buffered", writer.buffered()),
            Err(err) => println!("write {word:?} failed: {err}"),
        }
    }
    if let Err(err) = writer.flush() {
        println!("flush failed: {err}, {} bytes still buffered", writer.buffered());
    }

    writer.reset(Link {
        name: "backup",
        budget: usize::MAX,
    });
    if let Err(err) = writer.write_str("Ω recovered\n") {
        println!("write failed again: {err}");
    }
    match writer.into_inner() {
        Ok(link) => println!("done on {}", link.name),
        Err(partial) => println!("final flush failed: {}", partial.error),
    }
}
