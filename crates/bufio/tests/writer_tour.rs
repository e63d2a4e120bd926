#![expect(missing_docs)]

mod common;

use bufio::BufWriter;

use crate::common::{Bomb, Printer, Transcript, outcome};

#[test]
fn small_writes_are_collected() {
    let log = Transcript::default();
    let mut writer = BufWriter::with_capacity(3, Printer::new("out", &log));
    for byte in *b"bcd" {
        writer.write(&[byte]).unwrap();
    }
    log.line("flush");
    writer.flush().unwrap();

    insta::assert_snapshot!(log.take(), @r#"
    flush
    out: len 3 "bcd"
    "#);
}

#[test]
fn sink_failure_sticks() {
    let log = Transcript::default();
    let mut writer = BufWriter::with_capacity(3, Bomb::new(&log));
    for (i, byte) in b"abcde".iter().enumerate() {
        let result = writer.write(&[*byte]);
        log.line(format_args!("{} {}", i + 1, outcome(&result)));
    }
    let result = writer.flush();
    log.line(format_args!("flush {}", outcome(&result)));
    log.line(format_args!("buffered {}", writer.buffered()));

    insta::assert_snapshot!(log.take(), @r#"
    1 ok 1
    2 ok 1
    3 ok 1
    write "abc"
    4 err: bomb
    5 err: bomb
    flush err: bomb
    buffered 3
    "#);
}

#[test]
fn buffered_counts_pending_bytes() {
    let log = Transcript::default();
    let mut writer = BufWriter::with_capacity(3, Printer::new("out", &log));
    log.line(format_args!("buffered {}", writer.buffered()));
    writer.write(b"a").unwrap();
    log.line(format_args!("buffered {}", writer.buffered()));

    insta::assert_snapshot!(log.take(), @r"
    buffered 0
    buffered 1
    ");
}

#[test]
fn oversized_write_goes_straight_through() {
    let log = Transcript::default();
    let mut writer = BufWriter::with_capacity(4, Printer::new("out", &log));
    let n = writer.write(b"abcdefghijklmnopq").unwrap();
    log.line(format_args!("accepted {n}, buffered {}", writer.buffered()));

    insta::assert_snapshot!(log.take(), @r#"
    out: len 17 "abcdefghijklmnopq"
    accepted 17, buffered 0
    "#);
}

#[test]
fn reset_moves_the_buffer_to_another_sink() {
    let log = Transcript::default();
    let mut writer = BufWriter::with_capacity(3, Printer::new("one", &log));
    writer.write(b"abc").unwrap();
    writer.write(b"efg").unwrap();
    writer.flush().unwrap();

    writer.reset(Printer::new("two", &log));
    writer.write(b"xzv").unwrap();
    writer.flush().unwrap();

    // Pending bytes do not survive a reset.
    writer.write(b"lo").unwrap();
    writer.reset(Printer::new("three", &log));
    writer.flush().unwrap();
    log.line(format_args!("buffered {}", writer.buffered()));

    insta::assert_snapshot!(log.take(), @r#"
    one: len 3 "abc"
    one: len 3 "efg"
    two: len 3 "xzv"
    buffered 0
    "#);
}

#[test]
fn byte_rune_and_string_writes() {
    let log = Transcript::default();
    let mut writer = BufWriter::with_capacity(10, Printer::new("out", &log));
    log.line(format_args!("buffered {}", writer.buffered()));
    writer.write_byte(b'a').unwrap();
    log.line(format_args!("buffered {}", writer.buffered()));
    writer.write_rune('我').unwrap();
    log.line(format_args!("buffered {}", writer.buffered()));
    writer.write_str("abc好").unwrap();
    log.line(format_args!("buffered {}", writer.buffered()));

    insta::assert_snapshot!(log.take(), @r"
    buffered 0
    buffered 1
    buffered 4
    buffered 10
    ");
}

#[test]
fn read_from_pulls_the_source_through_the_buffer() {
    let log = Transcript::default();
    let mut writer = BufWriter::with_capacity(3, Printer::new("out", &log));
    let moved = writer.read_from(&mut &b"onetwothree"[..]).unwrap();
    log.line(format_args!("read {moved}"));
    writer.flush().unwrap();

    insta::assert_snapshot!(log.take(), @r#"
    out: len 3 "one"
    out: len 3 "two"
    out: len 3 "thr"
    read 11
    out: len 2 "ee"
    "#);
}
