use alloc::{vec, vec::Vec};

use rstest::rstest;

use super::*;
use crate::tests::endpoints::{Chunked, FailAfter, Limited, Recording, Stalled};

#[test]
fn small_writes_reach_the_sink_in_one_piece() {
    let mut w = BufWriter::with_capacity(3, Recording::default());
    for byte in [b'b', b'c', b'd'] {
        assert_eq!(w.write(&[byte]), Ok(1));
    }
    assert!(w.get_ref().writes.is_empty());
    w.flush().unwrap();
    assert_eq!(w.get_ref().writes, vec![b"bcd".to_vec()]);
}

#[test]
fn sink_error_is_sticky() {
    let mut w = BufWriter::with_capacity(3, Limited::failing("bomb"));
    let bomb = Error::other("bomb");
    assert_eq!(w.write(b"a"), Ok(1));
    assert_eq!(w.write(b"b"), Ok(1));
    assert_eq!(w.write(b"c"), Ok(1));
    // The buffer is full: making room hits the sink.
    assert_eq!(w.write(b"d"), Err(bomb.clone()));
    assert_eq!(w.write(b"e"), Err(bomb.clone()));
    assert_eq!(w.flush(), Err(bomb.clone()));
    assert_eq!(w.write_byte(b'f'), Err(bomb));
    // Only the first failure touched the sink.
    assert_eq!(w.get_ref().calls, 1);
    assert_eq!(w.buffered(), 3);
}

#[test]
fn buffered_counts_pending_bytes() {
    let mut w = BufWriter::with_capacity(3, Recording::default());
    assert_eq!(w.buffered(), 0);
    w.write(b"a").unwrap();
    assert_eq!(w.buffered(), 1);
    assert_eq!(w.available(), 2);
    assert_eq!(w.size(), 3);
}

#[test]
fn oversized_payload_skips_the_buffer() {
    let mut w = BufWriter::with_capacity(4, Recording::default());
    assert_eq!(w.write(b"abcdefghijklmnopq"), Ok(17));
    assert_eq!(w.buffered(), 0);
    assert_eq!(w.get_ref().writes, vec![b"abcdefghijklmnopq".to_vec()]);
}

#[test]
fn oversized_payload_flushes_pending_bytes_first() {
    let mut w = BufWriter::with_capacity(4, Recording::default());
    w.write(b"xy").unwrap();
    w.write(b"abcdefghij").unwrap();
    assert_eq!(
        w.get_ref().writes,
        vec![b"xy".to_vec(), b"abcdefghij".to_vec()]
    );
}

#[test]
fn write_that_does_not_fit_flushes_then_buffers() {
    let mut w = BufWriter::with_capacity(3, Recording::default());
    w.write(b"abc").unwrap();
    w.write(b"efg").unwrap();
    assert_eq!(w.get_ref().writes, vec![b"abc".to_vec()]);
    assert_eq!(w.buffered(), 3);
}

#[test]
fn direct_write_retries_short_counts() {
    let mut w = BufWriter::with_capacity(4, Limited::short(5));
    assert_eq!(w.write(b"0123456789ab"), Ok(12));
    // 5 + 5 went straight through; the last 2 fit in the buffer.
    assert_eq!(w.get_ref().calls, 2);
    assert_eq!(w.buffered(), 2);
    w.flush().unwrap();
    assert_eq!(w.into_inner().unwrap().taken, b"0123456789ab");
}

#[test]
fn direct_write_failing_midway_reports_accepted_prefix() {
    struct TakeThenFail(usize);
    impl Sink for TakeThenFail {
        fn accept(&mut self, bytes: &[u8]) -> Result<usize, Error> {
            self.0 += 1;
            if self.0 == 1 {
                Ok(bytes.len().min(6))
            } else {
                Err(Error::other("gone"))
            }
        }
    }

    let mut w = BufWriter::with_capacity(4, TakeThenFail(0));
    assert_eq!(w.write(b"0123456789ab"), Ok(6));
    assert_eq!(w.write(b"z"), Err(Error::other("gone")));
}

#[test]
fn short_flush_keeps_the_remainder_counted() {
    let mut w = BufWriter::with_capacity(8, Limited::short(2));
    w.write(b"abcde").unwrap();
    assert_eq!(w.flush(), Err(Error::ShortWrite));
    assert_eq!(w.buffered(), 3);
    assert_eq!(w.get_ref().taken, b"ab");
    // Latched: no second attempt.
    assert_eq!(w.flush(), Err(Error::ShortWrite));
    assert_eq!(w.get_ref().calls, 1);
}

#[test]
fn reset_switches_sink_and_drops_pending_bytes() {
    let mut w = BufWriter::with_capacity(3, Recording::default());
    w.write(b"abc").unwrap();
    w.write(b"efg").unwrap();
    w.flush().unwrap();
    let first = w.reset(Recording::default());
    assert_eq!(first.writes, vec![b"abc".to_vec(), b"efg".to_vec()]);

    w.write(b"xzv").unwrap();
    w.flush().unwrap();
    assert_eq!(w.get_ref().writes, vec![b"xzv".to_vec()]);

    w.write(b"lo").unwrap();
    let second = w.reset(Recording::default());
    assert_eq!(second.concat(), b"xzv");
    assert_eq!(w.buffered(), 0);
    w.flush().unwrap();
    assert!(w.get_ref().writes.is_empty());
}

#[test]
fn reset_clears_the_latched_error() {
    let mut w = BufWriter::with_capacity(2, Limited::failing("bomb"));
    w.write(b"ab").unwrap();
    assert!(w.flush().is_err());
    w.reset(Limited::short(8));
    w.write(b"ok").unwrap();
    assert_eq!(w.flush(), Ok(()));
    assert_eq!(w.get_ref().taken, b"ok");
}

#[test]
fn byte_rune_and_string_writes() {
    let mut w = BufWriter::with_capacity(10, Vec::<u8>::new());
    assert_eq!(w.buffered(), 0);
    w.write_byte(b'a').unwrap();
    assert_eq!(w.buffered(), 1);
    assert_eq!(w.write_rune('我'), Ok(3));
    assert_eq!(w.buffered(), 4);
    assert_eq!(w.write_str("abc好"), Ok(6));
    assert_eq!(w.buffered(), 10);
    assert_eq!(w.into_inner().unwrap(), "a我abc好".as_bytes());
}

#[rstest]
#[case('a', 1)]
#[case('é', 2)]
#[case('我', 3)]
#[case('🦀', 4)]
fn write_rune_reports_encoded_width(#[case] ch: char, #[case] width: usize) {
    let mut w = BufWriter::new(Vec::<u8>::new());
    assert_eq!(w.write_rune(ch), Ok(width));
    assert_eq!(w.buffered(), width);
}

#[test]
fn write_byte_flushes_a_full_buffer() {
    let mut w = BufWriter::with_capacity(2, Recording::default());
    w.write_byte(b'x').unwrap();
    w.write_byte(b'y').unwrap();
    w.write_byte(b'z').unwrap();
    assert_eq!(w.get_ref().writes, vec![b"xy".to_vec()]);
}

#[test]
fn read_from_flushes_each_full_buffer() {
    let mut w = BufWriter::with_capacity(3, Recording::default());
    assert_eq!(w.read_from(&mut &b"onetwothree"[..]), Ok(11));
    assert_eq!(w.buffered(), 2);
    w.flush().unwrap();
    assert_eq!(
        w.get_ref().writes,
        vec![
            b"one".to_vec(),
            b"two".to_vec(),
            b"thr".to_vec(),
            b"ee".to_vec()
        ]
    );
}

#[test]
fn read_from_flushes_an_exactly_full_buffer_at_end() {
    let mut w = BufWriter::with_capacity(3, Recording::default());
    assert_eq!(w.read_from(&mut Chunked::new(&b"onetwo"[..], 2)), Ok(6));
    assert_eq!(w.buffered(), 0);
    assert_eq!(w.get_ref().concat(), b"onetwo");
}

#[test]
fn read_from_reports_source_errors() {
    let mut w = BufWriter::with_capacity(8, Vec::<u8>::new());
    let mut src = FailAfter {
        data: b"abc",
        msg: "unplugged",
    };
    let partial = w.read_from(&mut src).unwrap_err();
    assert_eq!(partial.error, Error::other("unplugged"));
    assert_eq!(partial.data, 3);
    // A source failure is not the writer's failure.
    assert_eq!(w.flush(), Ok(()));
    assert_eq!(w.get_ref(), b"abc");
}

#[test]
fn read_from_stalled_source_is_no_progress() {
    let mut w = BufWriter::with_capacity(8, Vec::<u8>::new());
    let mut src = Stalled::default();
    let partial = w.read_from(&mut src).unwrap_err();
    assert_eq!(partial.error, Error::NoProgress);
    assert_eq!(src.fills, MAX_CONSECUTIVE_EMPTY_READS);
}

#[test]
fn into_inner_hands_back_the_writer_on_failure() {
    let mut w = BufWriter::with_capacity(4, Limited::failing("bomb"));
    w.write(b"ab").unwrap();
    let partial = w.into_inner().unwrap_err();
    assert_eq!(partial.error, Error::other("bomb"));
    let w = partial.data;
    assert_eq!(w.buffered(), 2);
}

#[test]
fn zero_capacity_means_default() {
    let w = BufWriter::with_capacity(0, Vec::<u8>::new());
    assert_eq!(w.size(), DEFAULT_BUF_SIZE);
}

#[test]
fn debug_shows_fill_level() {
    let mut w = BufWriter::with_capacity(4, Vec::<u8>::new());
    w.write(b"ab").unwrap();
    let shown = alloc::format!("{w:?}");
    assert!(shown.contains("2/4"), "{shown}");
}
